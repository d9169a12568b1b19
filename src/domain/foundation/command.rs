//! Request context handed to command handlers.

use uuid::Uuid;

use super::{EventEnvelope, UserId};

/// Who issued a command and which request it belongs to.
///
/// Handlers stamp both onto the events they publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMetadata {
    pub user_id: UserId,
    correlation_id: String,
}

impl CommandMetadata {
    /// Context with a freshly generated correlation id.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: Uuid::new_v4().to_string(),
        }
    }

    /// Ties the command to an existing request id. Blank ids are ignored.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !id.trim().is_empty() {
            self.correlation_id = id;
        }
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn stamp(&self, envelope: EventEnvelope) -> EventEnvelope {
        envelope
            .with_correlation_id(self.correlation_id.as_str())
            .with_user_id(self.user_id.as_str())
    }
}
