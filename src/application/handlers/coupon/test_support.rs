//! Mock ports shared by the coupon handler tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::coupon::{Coupon, CouponCode};
use crate::domain::foundation::{CommandMetadata, CouponId, DomainError, ErrorCode, EventEnvelope, UserId};
use crate::ports::{CouponRepository, EventPublisher};

pub struct MockCouponRepository {
    coupons: Mutex<Vec<Coupon>>,
    fail_writes: bool,
}

impl MockCouponRepository {
    pub fn new() -> Self {
        Self {
            coupons: Mutex::new(Vec::new()),
            fail_writes: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            coupons: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub fn with_coupon(self, coupon: Coupon) -> Self {
        self.coupons.lock().unwrap().push(coupon);
        self
    }

    pub fn coupons(&self) -> Vec<Coupon> {
        self.coupons.lock().unwrap().clone()
    }
}

#[async_trait]
impl CouponRepository for MockCouponRepository {
    async fn save(&self, coupon: &Coupon) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated save failure",
            ));
        }
        self.coupons.lock().unwrap().push(coupon.clone());
        Ok(())
    }

    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated update failure",
            ));
        }
        let mut coupons = self.coupons.lock().unwrap();
        match coupons.iter_mut().find(|c| c.id() == coupon.id()) {
            Some(existing) => {
                *existing = coupon.clone();
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::CouponNotFound, "Coupon not found")),
        }
    }

    async fn find_by_id(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError> {
        Ok(self
            .coupons
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id() == id)
            .cloned())
    }

    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DomainError> {
        Ok(self
            .coupons
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.code() == code)
            .cloned())
    }

    async fn exists(&self, id: &CouponId) -> Result<bool, DomainError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

pub struct MockEventPublisher {
    published_events: Mutex<Vec<EventEnvelope>>,
    fail_publish: bool,
}

impl MockEventPublisher {
    pub fn new() -> Self {
        Self {
            published_events: Mutex::new(Vec::new()),
            fail_publish: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            published_events: Mutex::new(Vec::new()),
            fail_publish: true,
        }
    }

    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published_events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for MockEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.fail_publish {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Simulated publish failure",
            ));
        }
        self.published_events.lock().unwrap().push(event);
        Ok(())
    }
}

pub fn test_metadata() -> CommandMetadata {
    CommandMetadata::new(UserId::new("admin-42").unwrap()).with_correlation_id("test-correlation")
}
