//! Coupon repository port (write side).

use crate::domain::coupon::{Coupon, CouponCode};
use crate::domain::foundation::{CouponId, DomainError};
use async_trait::async_trait;

/// Repository port for Coupon aggregate persistence.
///
/// Implementations must keep coupon codes unique and report a clash as
/// `CouponCodeAlreadyExists` with the code in the `code` detail.
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Save a new coupon.
    ///
    /// # Errors
    ///
    /// - `CouponCodeAlreadyExists` if the code is taken
    /// - `DatabaseError` on persistence failure
    async fn save(&self, coupon: &Coupon) -> Result<(), DomainError>;

    /// Update an existing coupon.
    ///
    /// # Errors
    ///
    /// - `CouponNotFound` if the coupon doesn't exist
    /// - `CouponCodeAlreadyExists` if the new code belongs to another coupon
    /// - `DatabaseError` on persistence failure
    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError>;

    /// Find a coupon by its ID.
    async fn find_by_id(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError>;

    /// Find a coupon by its (normalized) code.
    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DomainError>;

    async fn exists(&self, id: &CouponId) -> Result<bool, DomainError>;
}
