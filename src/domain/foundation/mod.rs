//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and the event and
//! command plumbing used across the coupon back office.

mod auth;
mod authorization;
mod command;
mod errors;
mod events;
mod ids;
mod locale;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use authorization::{AdminPermission, AuthorizationResult, WILDCARD_PERMISSION};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, EventId, EventMetadata};
pub use ids::{CouponId, UserId};
pub use locale::Lang;
pub use timestamp::Timestamp;
