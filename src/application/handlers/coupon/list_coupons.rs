//! ListCouponsHandler - Query handler for the back-office coupon list.

use std::sync::Arc;

use crate::domain::coupon::CouponError;
use crate::ports::{CouponList, CouponReader, ListOptions};

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

/// Query to list coupons.
#[derive(Debug, Clone, Default)]
pub struct ListCouponsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub enabled: Option<bool>,
}

impl ListCouponsQuery {
    /// Create a paginated query.
    pub fn paginated(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            enabled: None,
        }
    }

    fn to_list_options(&self, default_per_page: u32) -> ListOptions {
        let per_page = self
            .per_page
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PER_PAGE);
        let mut options = ListOptions::paginated(self.page.unwrap_or(1).max(1), per_page);

        if let Some(enabled) = self.enabled {
            options = options.with_enabled(enabled);
        }

        options
    }
}

/// Handler for listing coupons.
pub struct ListCouponsHandler {
    reader: Arc<dyn CouponReader>,
    default_per_page: u32,
}

impl ListCouponsHandler {
    pub fn new(reader: Arc<dyn CouponReader>, default_per_page: u32) -> Self {
        Self {
            reader,
            default_per_page,
        }
    }

    pub async fn handle(&self, query: ListCouponsQuery) -> Result<CouponList, CouponError> {
        let options = query.to_list_options(self.default_per_page);
        let list = self.reader.list(&options).await?;
        Ok(list)
    }
}
