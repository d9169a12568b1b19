//! HTTP DTOs for the coupon back-office screens.
//!
//! Each screen is answered with a JSON view model naming the screen it
//! stands for (`coupon-list`, `coupon-create`, `coupon-update`, `coupon-read`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::CouponForm;
use crate::domain::coupon::{Coupon, CouponEffect};
use crate::domain::foundation::{Lang, ValidationError};
use crate::ports::{CouponList, CouponSummary};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Query parameters accepted by every coupon screen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Option<String>,
}

/// Query parameters for the coupon list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCouponsParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub lang: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl From<&ValidationError> for FieldViolation {
    fn from(err: &ValidationError) -> Self {
        Self {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Create and edit screens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponFormView {
    pub view: &'static str,
    pub form_action: String,
    pub lang: Lang,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_date: Option<String>,
    pub form: CouponForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

impl CouponFormView {
    pub fn create(lang: Lang, form: CouponForm, default_date: String) -> Self {
        Self {
            view: "coupon-create",
            form_action: "admin/coupon/create".to_string(),
            lang,
            coupon_id: None,
            default_date: Some(default_date),
            form,
            general_error: None,
            violations: Vec::new(),
        }
    }

    pub fn update(lang: Lang, coupon_id: String, form: CouponForm) -> Self {
        Self {
            view: "coupon-update",
            form_action: format!("admin/coupon/update/{}", coupon_id),
            lang,
            coupon_id: Some(coupon_id),
            default_date: None,
            form,
            general_error: None,
            violations: Vec::new(),
        }
    }

    pub fn with_error(
        mut self,
        general_error: impl Into<String>,
        violations: Vec<FieldViolation>,
    ) -> Self {
        self.general_error = Some(general_error.into());
        self.violations = violations;
        self
    }
}

/// Full coupon detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub id: String,
    pub code: String,
    pub title: String,
    pub amount: Decimal,
    pub effect: CouponEffect,
    pub short_description: String,
    pub description: String,
    pub is_enabled: bool,
    /// Expiration date in the admin's date format.
    pub expiration_date: String,
    pub is_available_on_special_offers: bool,
    pub is_cumulative: bool,
    pub is_removing_postage: bool,
    pub max_usage: i32,
    pub rules: serde_json::Value,
    pub locale: String,
    pub created_at: String,
    pub updated_at: String,
}

impl CouponResponse {
    pub fn from_coupon(coupon: &Coupon, lang: Lang) -> Self {
        Self {
            id: coupon.id().to_string(),
            code: coupon.code().to_string(),
            title: coupon.title().to_string(),
            amount: coupon.amount(),
            effect: coupon.effect(),
            short_description: coupon.short_description().to_string(),
            description: coupon.description().to_string(),
            is_enabled: coupon.is_enabled(),
            expiration_date: lang.format_date(coupon.expiration_date()),
            is_available_on_special_offers: coupon.is_available_on_special_offers(),
            is_cumulative: coupon.is_cumulative(),
            is_removing_postage: coupon.is_removing_postage(),
            max_usage: coupon.max_usage(),
            rules: serde_json::Value::Array(coupon.rules().conditions().to_vec()),
            locale: coupon.locale().to_string(),
            created_at: coupon.created_at().as_datetime().to_rfc3339(),
            updated_at: coupon.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Read screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponReadView {
    pub view: &'static str,
    pub coupon_id: String,
    pub coupon: CouponResponse,
}

impl CouponReadView {
    pub fn new(coupon: &Coupon, lang: Lang) -> Self {
        Self {
            view: "coupon-read",
            coupon_id: coupon.id().to_string(),
            coupon: CouponResponse::from_coupon(coupon, lang),
        }
    }
}

/// Coupon summary for the list screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponSummaryResponse {
    pub id: String,
    pub code: String,
    pub title: String,
    pub effect: CouponEffect,
    pub amount: Decimal,
    pub is_enabled: bool,
    pub expiration_date: String,
    pub max_usage: i32,
}

impl CouponSummaryResponse {
    fn from_summary(summary: CouponSummary, lang: Lang) -> Self {
        Self {
            id: summary.id.to_string(),
            code: summary.code,
            title: summary.title,
            effect: summary.effect,
            amount: summary.amount,
            is_enabled: summary.is_enabled,
            expiration_date: lang.format_date(&summary.expiration_date),
            max_usage: summary.max_usage,
        }
    }
}

/// List screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponListView {
    pub view: &'static str,
    pub items: Vec<CouponSummaryResponse>,
    pub total: u64,
    pub has_more: bool,
}

impl CouponListView {
    pub fn new(list: CouponList, lang: Lang) -> Self {
        Self {
            view: "coupon-list",
            items: list
                .items
                .into_iter()
                .map(|s| CouponSummaryResponse::from_summary(s, lang))
                .collect(),
            total: list.total,
            has_more: list.has_more,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            code: "FORBIDDEN".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
