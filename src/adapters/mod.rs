//! Adapters - Implementations of the ports.
//!
//! - `auth` - Session validators (OIDC, mock)
//! - `events` - In-process event bus and event log
//! - `http` - axum router, middleware and coupon screens
//! - `memory` - In-memory coupon store and admin log
//! - `postgres` - PostgreSQL coupon store and admin log

pub mod auth;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;
