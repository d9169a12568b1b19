//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresCouponRepository` - Coupon aggregate persistence
//! - `PostgresCouponReader` - Paginated coupon listings
//! - `PostgresAdminLog` - Admin audit log

mod admin_log;
mod coupon_reader;
mod coupon_repository;

pub use admin_log::PostgresAdminLog;
pub use coupon_reader::PostgresCouponReader;
pub use coupon_repository::PostgresCouponRepository;
