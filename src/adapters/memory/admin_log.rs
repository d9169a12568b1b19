//! In-memory admin audit log.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{AdminLogEntry, AdminLogWriter};

#[derive(Debug, Default)]
pub struct InMemoryAdminLog {
    entries: Mutex<Vec<AdminLogEntry>>,
    /// Oldest entries are dropped beyond this many.
    history_limit: Option<usize>,
}

impl InMemoryAdminLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `limit` entries.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Kept entries in append order.
    pub fn entries(&self) -> Vec<AdminLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AdminLogWriter for InMemoryAdminLog {
    async fn append(&self, entry: AdminLogEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push(entry);
        if let Some(limit) = self.history_limit {
            let excess = entries.len().saturating_sub(limit);
            entries.drain(..excess);
        }
        Ok(())
    }
}
