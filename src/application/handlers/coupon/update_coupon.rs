//! UpdateCouponHandler - Command handler for editing coupons.

use std::sync::Arc;

use super::publish_committed;
use crate::domain::coupon::{Coupon, CouponDraft, CouponError, CouponUpdated};
use crate::domain::foundation::{CommandMetadata, CouponId, EventId};
use crate::ports::{CouponRepository, EventPublisher};

/// Command to replace a coupon's editable fields.
#[derive(Debug, Clone)]
pub struct UpdateCouponCommand {
    pub coupon_id: CouponId,
    pub draft: CouponDraft,
}

/// Result of successful coupon update.
#[derive(Debug, Clone)]
pub struct UpdateCouponResult {
    pub coupon: Coupon,
    pub event: CouponUpdated,
}

/// Handler for updating coupons.
pub struct UpdateCouponHandler {
    repository: Arc<dyn CouponRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateCouponHandler {
    pub fn new(
        repository: Arc<dyn CouponRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    /// Fails with `NotFound` unless the coupon is stored.
    ///
    /// Lets callers reject a submission for an unknown coupon before
    /// looking at the submitted values.
    pub async fn ensure_exists(&self, coupon_id: CouponId) -> Result<(), CouponError> {
        if self.repository.exists(&coupon_id).await? {
            Ok(())
        } else {
            Err(CouponError::not_found(coupon_id))
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateCouponCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateCouponResult, CouponError> {
        let mut coupon = self
            .repository
            .find_by_id(&cmd.coupon_id)
            .await?
            .ok_or_else(|| CouponError::not_found(cmd.coupon_id))?;

        // The code may stay the same, but must not collide with another coupon
        if let Some(other) = self.repository.find_by_code(&cmd.draft.code).await? {
            if other.id() != coupon.id() {
                return Err(CouponError::code_already_exists(cmd.draft.code.as_str()));
            }
        }

        coupon.apply(cmd.draft)?;
        self.repository.update(&coupon).await?;

        let event = CouponUpdated {
            event_id: EventId::new(),
            coupon_id: *coupon.id(),
            updated_by: metadata.user_id.clone(),
            draft: coupon.draft().clone(),
            updated_at: *coupon.updated_at(),
        };

        publish_committed(self.event_publisher.as_ref(), &event, &metadata).await;

        tracing::info!(coupon_id = %coupon.id(), code = %coupon.code(), "Coupon updated");

        Ok(UpdateCouponResult { coupon, event })
    }
}
