//! PostgreSQL implementation of CouponRepository.
//!
//! One row per coupon in `coupons`. Rules are stored serialized in
//! `serialized_rules`; the code column carries a unique index.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::coupon::{Coupon, CouponCode, CouponDraft, CouponEffect, CouponRuleCollection};
use crate::domain::foundation::{CouponId, DomainError, ErrorCode, Timestamp};
use crate::ports::CouponRepository;

pub(super) const COUPON_COLUMNS: &str = r#"
    id, code, title, amount, effect, short_description, description,
    is_enabled, expiration_date, is_available_on_special_offers,
    is_cumulative, is_removing_postage, max_usage, serialized_rules,
    locale, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PostgresCouponRepository {
    pool: PgPool,
}

impl PostgresCouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

/// Maps a unique violation on the code column to `CouponCodeAlreadyExists`.
fn write_error(context: &str, coupon: &Coupon, e: sqlx::Error) -> DomainError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DomainError::new(
            ErrorCode::CouponCodeAlreadyExists,
            format!("Coupon code already exists: {}", coupon.code()),
        )
        .with_detail("code", coupon.code().as_str()),
        other => database_error(context, other),
    }
}

#[async_trait]
impl CouponRepository for PostgresCouponRepository {
    async fn save(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let rules = coupon
            .rules()
            .to_storage()
            .map_err(|e| database_error("Failed to serialize coupon rules", e))?;

        sqlx::query(
            r#"
            INSERT INTO coupons (
                id, code, title, amount, effect, short_description, description,
                is_enabled, expiration_date, is_available_on_special_offers,
                is_cumulative, is_removing_postage, max_usage, serialized_rules,
                locale, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(coupon.id().as_uuid())
        .bind(coupon.code().as_str())
        .bind(coupon.title())
        .bind(coupon.amount())
        .bind(coupon.effect().as_str())
        .bind(coupon.short_description())
        .bind(coupon.description())
        .bind(coupon.is_enabled())
        .bind(coupon.expiration_date().as_datetime())
        .bind(coupon.is_available_on_special_offers())
        .bind(coupon.is_cumulative())
        .bind(coupon.is_removing_postage())
        .bind(coupon.max_usage())
        .bind(rules)
        .bind(coupon.locale())
        .bind(coupon.created_at().as_datetime())
        .bind(coupon.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Failed to insert coupon", coupon, e))?;

        Ok(())
    }

    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let rules = coupon
            .rules()
            .to_storage()
            .map_err(|e| database_error("Failed to serialize coupon rules", e))?;

        let result = sqlx::query(
            r#"
            UPDATE coupons SET
                code = $2,
                title = $3,
                amount = $4,
                effect = $5,
                short_description = $6,
                description = $7,
                is_enabled = $8,
                expiration_date = $9,
                is_available_on_special_offers = $10,
                is_cumulative = $11,
                is_removing_postage = $12,
                max_usage = $13,
                serialized_rules = $14,
                locale = $15,
                updated_at = $16
            WHERE id = $1
            "#,
        )
        .bind(coupon.id().as_uuid())
        .bind(coupon.code().as_str())
        .bind(coupon.title())
        .bind(coupon.amount())
        .bind(coupon.effect().as_str())
        .bind(coupon.short_description())
        .bind(coupon.description())
        .bind(coupon.is_enabled())
        .bind(coupon.expiration_date().as_datetime())
        .bind(coupon.is_available_on_special_offers())
        .bind(coupon.is_cumulative())
        .bind(coupon.is_removing_postage())
        .bind(coupon.max_usage())
        .bind(rules)
        .bind(coupon.locale())
        .bind(coupon.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Failed to update coupon", coupon, e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CouponNotFound,
                format!("Coupon not found: {}", coupon.id()),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM coupons WHERE id = $1", COUPON_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("Failed to fetch coupon", e))?;

        row.map(row_to_coupon).transpose()
    }

    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM coupons WHERE code = $1",
            COUPON_COLUMNS
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to fetch coupon by code", e))?;

        row.map(row_to_coupon).transpose()
    }

    async fn exists(&self, id: &CouponId) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM coupons WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error("Failed to check coupon existence", e))?;

        Ok(exists)
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| database_error(&format!("Invalid coupon column '{}'", name), e))
}

pub(super) fn row_to_coupon(row: PgRow) -> Result<Coupon, DomainError> {
    let id: Uuid = column(&row, "id")?;
    let code: String = column(&row, "code")?;
    let effect: String = column(&row, "effect")?;
    let rules: String = column(&row, "serialized_rules")?;
    let expiration_date: chrono::DateTime<chrono::Utc> = column(&row, "expiration_date")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = column(&row, "updated_at")?;
    let amount: Decimal = column(&row, "amount")?;

    let draft = CouponDraft {
        code: CouponCode::try_new(&code)
            .map_err(|e| database_error("Invalid stored coupon code", e))?,
        title: column(&row, "title")?,
        amount,
        effect: effect
            .parse::<CouponEffect>()
            .map_err(|e| database_error("Invalid stored coupon effect", e))?,
        short_description: column(&row, "short_description")?,
        description: column(&row, "description")?,
        is_enabled: column(&row, "is_enabled")?,
        expiration_date: Timestamp::from_datetime(expiration_date),
        is_available_on_special_offers: column(&row, "is_available_on_special_offers")?,
        is_cumulative: column(&row, "is_cumulative")?,
        is_removing_postage: column(&row, "is_removing_postage")?,
        max_usage: column(&row, "max_usage")?,
        rules: CouponRuleCollection::from_storage(&rules)
            .map_err(|e| database_error("Invalid stored coupon rules", e))?,
        locale: column(&row, "locale")?,
    };

    Ok(Coupon::reconstitute(
        CouponId::from_uuid(id),
        draft,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
