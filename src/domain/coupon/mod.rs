//! Coupon domain module.
//!
//! Discount coupons managed from the back office: the aggregate, its value
//! objects and the events published when an admin creates or edits one.
//!
//! # Events
//!
//! - `CouponCreated` - Published when a coupon is created
//! - `CouponUpdated` - Published when a coupon is edited

mod aggregate;
mod code;
pub(crate) mod draft;
mod effect;
mod errors;
mod events;
mod rules;

pub use aggregate::Coupon;
pub use code::{CouponCode, MAX_CODE_LENGTH};
pub use draft::{
    CouponDraft, MAX_AMOUNT, MAX_AMOUNT_SCALE, MAX_PERCENTAGE, MAX_SHORT_DESCRIPTION_LENGTH,
    MAX_TITLE_LENGTH, UNLIMITED_USAGE,
};
pub use effect::CouponEffect;
pub use errors::CouponError;
pub use events::{CouponCreated, CouponUpdated};
pub use rules::CouponRuleCollection;
