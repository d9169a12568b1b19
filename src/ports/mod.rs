//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Coupon Ports
//!
//! - `CouponRepository` - Coupon aggregate persistence (write side)
//! - `CouponReader` - Coupon listings (read side)
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Back-office Ports
//!
//! - `AdminLogWriter` - Admin audit log
//! - `SessionValidator` - Access token validation

mod admin_log;
mod coupon_reader;
mod coupon_repository;
mod event_publisher;
mod event_subscriber;
mod session_validator;

pub use admin_log::{AdminAction, AdminLogEntry, AdminLogWriter};
pub use coupon_reader::{CouponList, CouponReader, CouponSummary, ListOptions};
pub use coupon_repository::CouponRepository;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventHandler, EventSubscriber};
pub use session_validator::SessionValidator;
