//! Coupon command and query handlers.

use crate::domain::foundation::{CommandMetadata, DomainEvent};
use crate::ports::EventPublisher;

mod create_coupon;
mod get_coupon;
mod list_coupons;
mod update_coupon;

#[cfg(test)]
pub(crate) mod test_support;

pub use create_coupon::{CreateCouponCommand, CreateCouponHandler, CreateCouponResult};
pub use get_coupon::{GetCouponHandler, GetCouponQuery};
pub use list_coupons::{ListCouponsHandler, ListCouponsQuery, MAX_PER_PAGE};
pub use update_coupon::{UpdateCouponCommand, UpdateCouponHandler, UpdateCouponResult};

/// Publishes the event of a change that is already stored.
///
/// The coupon stays saved whatever happens here, so failures only warn.
async fn publish_committed<E: DomainEvent>(
    publisher: &dyn EventPublisher,
    event: &E,
    metadata: &CommandMetadata,
) {
    let envelope = match event.to_envelope() {
        Ok(envelope) => metadata.stamp(envelope),
        Err(e) => {
            tracing::warn!(
                event_type = E::EVENT_TYPE,
                aggregate_id = %event.aggregate_id(),
                error = %e,
                "Failed to serialize coupon event"
            );
            return;
        }
    };

    if let Err(e) = publisher.publish(envelope).await {
        tracing::warn!(
            event_type = E::EVENT_TYPE,
            aggregate_id = %event.aggregate_id(),
            error = %e,
            "Coupon event not delivered"
        );
    }
}
