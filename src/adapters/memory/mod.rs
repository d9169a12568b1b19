//! In-memory adapters for the coupon and admin log ports.

mod admin_log;
mod coupon_store;

pub use admin_log::InMemoryAdminLog;
pub use coupon_store::InMemoryCouponStore;
