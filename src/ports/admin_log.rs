//! Admin audit log port.
//!
//! Every successful back-office change appends a human-readable line
//! naming the acting admin and the touched resource.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// Kind of change recorded in the admin log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    Create,
    Update,
}

impl AdminAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::Create => "create",
            AdminAction::Update => "update",
        }
    }
}

/// One line of the admin audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLogEntry {
    pub admin_id: UserId,

    /// Resource family, e.g. "coupon".
    pub resource: String,

    pub resource_id: Option<String>,

    pub action: AdminAction,

    pub message: String,

    pub created_at: Timestamp,
}

impl AdminLogEntry {
    pub fn new(
        admin_id: UserId,
        resource: impl Into<String>,
        action: AdminAction,
        message: impl Into<String>,
    ) -> Self {
        Self {
            admin_id,
            resource: resource.into(),
            resource_id: None,
            action,
            message: message.into(),
            created_at: Timestamp::now(),
        }
    }

    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }
}

/// Port for appending to the admin audit log.
#[async_trait]
pub trait AdminLogWriter: Send + Sync {
    async fn append(&self, entry: AdminLogEntry) -> Result<(), DomainError>;
}
