//! HTTP routes for the coupon back-office screens.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    browse_coupons, create_coupon, create_form, read_coupon, update_coupon, update_form,
    CouponHandlers,
};

/// Creates the coupon router, to be nested under `/admin/coupon`.
pub fn coupon_routes(handlers: CouponHandlers) -> Router {
    Router::new()
        .route("/", get(browse_coupons))
        .route("/create", get(create_form).post(create_coupon))
        .route("/update/:id", get(update_form).post(update_coupon))
        .route("/read/:id", get(read_coupon))
        .with_state(handlers)
}
