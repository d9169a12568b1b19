//! HTTP adapter for the coupon back-office screens.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CouponFormView, CouponListView, CouponReadView, CouponResponse, CouponSummaryResponse,
    ErrorResponse, FieldViolation, LangQuery, ListCouponsParams,
};
pub use handlers::{
    CouponHandlers, CouponScreenSettings, INPUT_ERROR_MESSAGE, UNEXPECTED_ERROR_MESSAGE,
};
pub use routes::coupon_routes;
