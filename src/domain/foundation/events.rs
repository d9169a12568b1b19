//! Domain event plumbing.
//!
//! Coupon events implement `DomainEvent`. Publishers and subscribers only
//! ever see the `EventEnvelope` built from them.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::Timestamp;

/// An event emitted by an aggregate.
///
/// `EVENT_TYPE` ends in `.vN`; the envelope's schema version is read from it.
pub trait DomainEvent: Serialize + Send + Sync {
    const EVENT_TYPE: &'static str;
    const AGGREGATE_TYPE: &'static str;

    fn event_id(&self) -> &EventId;

    fn aggregate_id(&self) -> String;

    fn occurred_at(&self) -> Timestamp;

    /// Wraps the event, serialized as the payload, for publishing.
    fn to_envelope(&self) -> Result<EventEnvelope, serde_json::Error> {
        let payload = serde_json::to_value(self)?;
        let mut envelope = EventEnvelope::new(
            Self::EVENT_TYPE,
            self.aggregate_id(),
            Self::AGGREGATE_TYPE,
            payload,
        );
        envelope.event_id = self.event_id().clone();
        envelope.occurred_at = self.occurred_at();
        Ok(envelope)
    }
}

/// Identifies one published event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request context copied onto an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Request id of the admin action that produced the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    /// Admin who triggered the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// What travels through the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    /// Routing key, e.g. `coupon.updated.v1`.
    pub event_type: String,
    pub schema_version: u32,
    pub aggregate_id: String,
    pub aggregate_type: String,
    pub occurred_at: Timestamp,
    pub payload: JsonValue,
    pub metadata: EventMetadata,
}

impl EventEnvelope {
    pub fn new(
        event_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        payload: JsonValue,
    ) -> Self {
        let event_type = event_type.into();
        Self {
            event_id: EventId::new(),
            schema_version: schema_version_of(&event_type),
            event_type,
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            occurred_at: Timestamp::now(),
            payload,
            metadata: EventMetadata::default(),
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.correlation_id = Some(id.into());
        self
    }

    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.user_id = Some(id.into());
        self
    }
}

/// Version from a `.vN` suffix; 1 when there is none.
fn schema_version_of(event_type: &str) -> u32 {
    event_type
        .rsplit_once(".v")
        .and_then(|(_, version)| version.parse().ok())
        .unwrap_or(1)
}
