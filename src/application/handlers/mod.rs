//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod coupon;

pub use coupon::{
    CreateCouponCommand, CreateCouponHandler, CreateCouponResult, GetCouponHandler,
    GetCouponQuery, ListCouponsHandler, ListCouponsQuery, UpdateCouponCommand,
    UpdateCouponHandler, UpdateCouponResult,
};
