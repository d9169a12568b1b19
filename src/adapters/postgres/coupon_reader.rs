//! PostgreSQL implementation of CouponReader.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::coupon_repository::{row_to_coupon, COUPON_COLUMNS};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{CouponList, CouponReader, CouponSummary, ListOptions};

#[derive(Clone)]
pub struct PostgresCouponReader {
    pool: PgPool,
}

impl PostgresCouponReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, options: &ListOptions) -> Result<u64, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM coupons");
        push_filters(&mut query, options);

        let count: i64 = query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to count coupons: {}", e),
                )
            })?;

        Ok(count.max(0) as u64)
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, options: &ListOptions) {
    if let Some(enabled) = options.enabled {
        query.push(" WHERE is_enabled = ").push_bind(enabled);
    }
}

#[async_trait]
impl CouponReader for PostgresCouponReader {
    async fn list(&self, options: &ListOptions) -> Result<CouponList, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM coupons", COUPON_COLUMNS));
        push_filters(&mut query, options);
        query.push(" ORDER BY created_at DESC, code ASC");

        if let Some(limit) = options.limit {
            query.push(" LIMIT ").push_bind(i64::from(limit));
        }
        if let Some(offset) = options.offset {
            query.push(" OFFSET ").push_bind(i64::from(offset));
        }

        let rows = query.build().fetch_all(&self.pool).await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list coupons: {}", e),
            )
        })?;

        let items = rows
            .into_iter()
            .map(|row| row_to_coupon(row).map(|c| CouponSummary::from(&c)))
            .collect::<Result<Vec<_>, _>>()?;

        let total = self.count(options).await?;
        let offset = options.offset.unwrap_or(0) as u64;
        let has_more = offset + (items.len() as u64) < total;

        Ok(CouponList {
            items,
            total,
            has_more,
        })
    }
}
