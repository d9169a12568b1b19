//! Coupon domain events.
//!
//! - `CouponCreated` - a coupon was created from the admin form
//! - `CouponUpdated` - a coupon's editable fields were replaced

use serde::{Deserialize, Serialize};

use super::CouponDraft;
use crate::domain::foundation::{CouponId, DomainEvent, EventId, Timestamp, UserId};

const COUPON_AGGREGATE: &str = "Coupon";

/// Published when a new coupon is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponCreated {
    pub event_id: EventId,

    pub coupon_id: CouponId,

    /// Admin who created the coupon.
    pub created_by: UserId,

    /// Field values the coupon was created with.
    pub draft: CouponDraft,

    pub created_at: Timestamp,
}

impl DomainEvent for CouponCreated {
    const EVENT_TYPE: &'static str = "coupon.created.v1";
    const AGGREGATE_TYPE: &'static str = COUPON_AGGREGATE;

    fn event_id(&self) -> &EventId {
        &self.event_id
    }

    fn aggregate_id(&self) -> String {
        self.coupon_id.to_string()
    }

    fn occurred_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Published when a coupon's fields are replaced from the edit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponUpdated {
    pub event_id: EventId,

    pub coupon_id: CouponId,

    pub updated_by: UserId,

    /// Field values after the update.
    pub draft: CouponDraft,

    pub updated_at: Timestamp,
}

impl DomainEvent for CouponUpdated {
    const EVENT_TYPE: &'static str = "coupon.updated.v1";
    const AGGREGATE_TYPE: &'static str = COUPON_AGGREGATE;

    fn event_id(&self) -> &EventId {
        &self.event_id
    }

    fn aggregate_id(&self) -> String {
        self.coupon_id.to_string()
    }

    fn occurred_at(&self) -> Timestamp {
        self.updated_at
    }
}
