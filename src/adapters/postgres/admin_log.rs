//! PostgreSQL implementation of AdminLogWriter.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{AdminLogEntry, AdminLogWriter};

#[derive(Clone)]
pub struct PostgresAdminLog {
    pool: PgPool,
}

impl PostgresAdminLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminLogWriter for PostgresAdminLog {
    async fn append(&self, entry: AdminLogEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO admin_logs (admin_id, resource, resource_id, action, message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.admin_id.as_str())
        .bind(&entry.resource)
        .bind(entry.resource_id.as_deref())
        .bind(entry.action.as_str())
        .bind(&entry.message)
        .bind(entry.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to append admin log: {}", e),
            )
        })?;

        Ok(())
    }
}
