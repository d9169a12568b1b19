//! Application layer - Commands, Queries, Handlers and the admin form.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod coupon_form;
pub mod handlers;

pub use coupon_form::{CouponForm, FormValidationError, DEFAULT_SUCCESS_URL};
pub use handlers::{
    CreateCouponCommand, CreateCouponHandler, CreateCouponResult, GetCouponHandler,
    GetCouponQuery, ListCouponsHandler, ListCouponsQuery, UpdateCouponCommand,
    UpdateCouponHandler, UpdateCouponResult,
};
