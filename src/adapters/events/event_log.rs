//! Structured log of coupon events.

use async_trait::async_trait;

use crate::domain::coupon::{CouponCreated, CouponUpdated};
use crate::domain::foundation::{DomainError, DomainEvent, EventEnvelope};
use crate::ports::EventHandler;

/// Event types the log handler subscribes to.
pub const COUPON_EVENT_TYPES: [&str; 2] = [CouponCreated::EVENT_TYPE, CouponUpdated::EVENT_TYPE];

/// Writes one structured `tracing` record per coupon event.
#[derive(Debug, Default)]
pub struct EventLogHandler;

impl EventLogHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventHandler for EventLogHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::info!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            aggregate_type = %event.aggregate_type,
            aggregate_id = %event.aggregate_id,
            correlation_id = event.metadata.correlation_id.as_deref().unwrap_or("-"),
            user_id = event.metadata.user_id.as_deref().unwrap_or("-"),
            code = event.payload["draft"]["code"].as_str().unwrap_or("-"),
            "Domain event"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "EventLogHandler"
    }
}
