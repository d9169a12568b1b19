//! GetCouponHandler - Query handler for a single coupon.

use std::sync::Arc;

use crate::domain::coupon::{Coupon, CouponError};
use crate::domain::foundation::CouponId;
use crate::ports::CouponRepository;

/// Query to get a coupon by ID.
#[derive(Debug, Clone)]
pub struct GetCouponQuery {
    pub coupon_id: CouponId,
}

/// Handler for retrieving a coupon.
pub struct GetCouponHandler {
    repository: Arc<dyn CouponRepository>,
}

impl GetCouponHandler {
    pub fn new(repository: Arc<dyn CouponRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetCouponQuery) -> Result<Coupon, CouponError> {
        self.repository
            .find_by_id(&query.coupon_id)
            .await?
            .ok_or_else(|| CouponError::not_found(query.coupon_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::coupon::test_support::MockCouponRepository;
    use crate::domain::coupon::draft::test_support::draft;

    #[tokio::test]
    async fn returns_stored_coupon() {
        let coupon = Coupon::new(CouponId::new(), draft("SPRING")).unwrap();
        let id = *coupon.id();
        let handler = GetCouponHandler::new(Arc::new(MockCouponRepository::new().with_coupon(coupon)));

        let found = handler.handle(GetCouponQuery { coupon_id: id }).await.unwrap();
        assert_eq!(found.id(), &id);
    }

    #[tokio::test]
    async fn returns_not_found_for_unknown_id() {
        let handler = GetCouponHandler::new(Arc::new(MockCouponRepository::new()));
        let id = CouponId::new();

        let result = handler.handle(GetCouponQuery { coupon_id: id }).await;
        assert_eq!(result.unwrap_err(), CouponError::not_found(id));
    }
}
