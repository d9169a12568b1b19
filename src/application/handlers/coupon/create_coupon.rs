//! CreateCouponHandler - Command handler for creating coupons.

use std::sync::Arc;

use super::publish_committed;
use crate::domain::coupon::{Coupon, CouponCreated, CouponDraft, CouponError};
use crate::domain::foundation::{CommandMetadata, CouponId, EventId};
use crate::ports::{CouponRepository, EventPublisher};

/// Command to create a coupon from a validated draft.
#[derive(Debug, Clone)]
pub struct CreateCouponCommand {
    pub draft: CouponDraft,
}

/// Result of successful coupon creation.
#[derive(Debug, Clone)]
pub struct CreateCouponResult {
    pub coupon: Coupon,
    pub event: CouponCreated,
}

/// Handler for creating coupons.
pub struct CreateCouponHandler {
    repository: Arc<dyn CouponRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateCouponHandler {
    pub fn new(
        repository: Arc<dyn CouponRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCouponCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateCouponResult, CouponError> {
        // 1. Codes are unique
        if self.repository.find_by_code(&cmd.draft.code).await?.is_some() {
            return Err(CouponError::code_already_exists(cmd.draft.code.as_str()));
        }

        // 2. Build and persist the aggregate
        let coupon = Coupon::new(CouponId::new(), cmd.draft)?;
        self.repository.save(&coupon).await?;

        // 3. Publish; the coupon is stored from here on
        let event = CouponCreated {
            event_id: EventId::new(),
            coupon_id: *coupon.id(),
            created_by: metadata.user_id.clone(),
            draft: coupon.draft().clone(),
            created_at: *coupon.created_at(),
        };
        publish_committed(self.event_publisher.as_ref(), &event, &metadata).await;

        tracing::info!(
            coupon_id = %coupon.id(),
            code = %coupon.code(),
            "Coupon created"
        );

        Ok(CreateCouponResult { coupon, event })
    }
}
