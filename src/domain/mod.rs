//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `coupon` - Coupon aggregate, value objects and events

pub mod coupon;
pub mod foundation;
