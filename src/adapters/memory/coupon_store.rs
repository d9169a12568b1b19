//! In-memory coupon store.
//!
//! Implements both the write-side repository and the read-side listing
//! over one shared map. Used by tests and when no database is configured.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::coupon::{Coupon, CouponCode};
use crate::domain::foundation::{CouponId, DomainError, ErrorCode};
use crate::ports::{CouponList, CouponReader, CouponRepository, CouponSummary, ListOptions};

#[derive(Debug, Default)]
pub struct InMemoryCouponStore {
    coupons: RwLock<HashMap<CouponId, Coupon>>,
}

impl InMemoryCouponStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.coupons
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn code_taken(code: &CouponCode) -> DomainError {
    DomainError::new(
        ErrorCode::CouponCodeAlreadyExists,
        format!("Coupon code already exists: {}", code),
    )
    .with_detail("code", code.as_str())
}

fn owner_of<'a>(coupons: &'a HashMap<CouponId, Coupon>, code: &CouponCode) -> Option<&'a Coupon> {
    coupons.values().find(|c| c.code() == code)
}

#[async_trait]
impl CouponRepository for InMemoryCouponStore {
    async fn save(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let mut coupons = self.coupons.write().unwrap_or_else(PoisonError::into_inner);

        if owner_of(&coupons, coupon.code()).is_some() {
            return Err(code_taken(coupon.code()));
        }

        coupons.insert(*coupon.id(), coupon.clone());
        Ok(())
    }

    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let mut coupons = self.coupons.write().unwrap_or_else(PoisonError::into_inner);

        if !coupons.contains_key(coupon.id()) {
            return Err(DomainError::new(
                ErrorCode::CouponNotFound,
                format!("Coupon not found: {}", coupon.id()),
            ));
        }

        if let Some(owner) = owner_of(&coupons, coupon.code()) {
            if owner.id() != coupon.id() {
                return Err(code_taken(coupon.code()));
            }
        }

        coupons.insert(*coupon.id(), coupon.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError> {
        Ok(self
            .coupons
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }

    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DomainError> {
        let coupons = self.coupons.read().unwrap_or_else(PoisonError::into_inner);
        Ok(owner_of(&coupons, code).cloned())
    }

    async fn exists(&self, id: &CouponId) -> Result<bool, DomainError> {
        Ok(self
            .coupons
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id))
    }
}

#[async_trait]
impl CouponReader for InMemoryCouponStore {
    async fn list(&self, options: &ListOptions) -> Result<CouponList, DomainError> {
        let coupons = self.coupons.read().unwrap_or_else(PoisonError::into_inner);

        let mut matching: Vec<&Coupon> = coupons
            .values()
            .filter(|c| options.enabled.map_or(true, |e| c.is_enabled() == e))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(a.created_at())
                .then_with(|| a.code().as_str().cmp(b.code().as_str()))
        });

        let total = matching.len() as u64;
        let offset = options.offset.unwrap_or(0) as usize;
        let limit = options.limit.map_or(usize::MAX, |l| l as usize);

        let items: Vec<CouponSummary> = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(CouponSummary::from)
            .collect();
        let has_more = (offset + items.len()) < total as usize;

        Ok(CouponList {
            items,
            total,
            has_more,
        })
    }
}
