//! HTTP adapters - the back-office REST surface.

pub mod coupon;
pub mod middleware;
mod router;

pub use coupon::{coupon_routes, CouponHandlers, CouponScreenSettings};
pub use router::{build_router, HttpSettings};
