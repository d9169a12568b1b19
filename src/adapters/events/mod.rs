//! Event bus adapters.
//!
//! - `InMemoryEventBus` - Synchronous, in-process bus
//! - `EventLogHandler` - Structured log record for each coupon event

mod event_log;
mod in_memory;

pub use event_log::{EventLogHandler, COUPON_EVENT_TYPES};
pub use in_memory::InMemoryEventBus;
