//! Coupon reader port (read side / CQRS queries).
//!
//! Serves the back-office coupon list.

use crate::domain::coupon::{Coupon, CouponEffect};
use crate::domain::foundation::{CouponId, DomainError, Timestamp};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reader port for coupon listings.
#[async_trait]
pub trait CouponReader: Send + Sync {
    /// List coupons, newest first.
    async fn list(&self, options: &ListOptions) -> Result<CouponList, DomainError>;
}

/// Options for listing coupons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Maximum number of results to return.
    pub limit: Option<u32>,

    /// Number of results to skip.
    pub offset: Option<u32>,

    /// Only enabled (`Some(true)`) or disabled (`Some(false)`) coupons.
    pub enabled: Option<bool>,
}

impl ListOptions {
    /// Create options for a 1-based page.
    pub fn paginated(page: u32, per_page: u32) -> Self {
        Self {
            limit: Some(per_page),
            offset: Some(page.saturating_sub(1).saturating_mul(per_page)),
            enabled: None,
        }
    }

    /// Filter on the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

/// Paginated list of coupons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponList {
    pub items: Vec<CouponSummary>,

    /// Total number of matching coupons.
    pub total: u64,

    pub has_more: bool,
}

/// Summary view of a coupon for lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponSummary {
    pub id: CouponId,
    pub code: String,
    pub title: String,
    pub effect: CouponEffect,
    pub amount: Decimal,
    pub is_enabled: bool,
    pub expiration_date: Timestamp,
    pub max_usage: i32,
    pub created_at: Timestamp,
}

impl From<&Coupon> for CouponSummary {
    fn from(coupon: &Coupon) -> Self {
        Self {
            id: *coupon.id(),
            code: coupon.code().to_string(),
            title: coupon.title().to_string(),
            effect: coupon.effect(),
            amount: coupon.amount(),
            is_enabled: coupon.is_enabled(),
            expiration_date: *coupon.expiration_date(),
            max_usage: coupon.max_usage(),
            created_at: *coupon.created_at(),
        }
    }
}
