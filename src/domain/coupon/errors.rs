//! Coupon-specific error types.

use crate::domain::foundation::{CouponId, DomainError, ErrorCode};

/// Coupon-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponError {
    /// Coupon was not found.
    NotFound(CouponId),
    /// Another coupon already uses this code.
    CodeAlreadyExists(String),
    /// Admin lacks the required permission.
    Forbidden,
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl CouponError {
    pub fn not_found(id: CouponId) -> Self {
        CouponError::NotFound(id)
    }
    pub fn code_already_exists(code: impl Into<String>) -> Self {
        CouponError::CodeAlreadyExists(code.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CouponError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        CouponError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            CouponError::NotFound(_) => ErrorCode::CouponNotFound,
            CouponError::CodeAlreadyExists(_) => ErrorCode::CouponCodeAlreadyExists,
            CouponError::Forbidden => ErrorCode::Forbidden,
            CouponError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CouponError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            CouponError::NotFound(id) => format!("Coupon not found: {}", id),
            CouponError::CodeAlreadyExists(code) => {
                format!("A coupon with code '{}' already exists", code)
            }
            CouponError::Forbidden => "Permission denied".to_string(),
            CouponError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            CouponError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true for errors caused by the submitted values.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CouponError::ValidationFailed { .. } | CouponError::CodeAlreadyExists(_)
        )
    }
}

impl std::fmt::Display for CouponError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CouponError {}

impl From<DomainError> for CouponError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden | ErrorCode::Unauthorized => CouponError::Forbidden,
            ErrorCode::CouponCodeAlreadyExists => CouponError::CodeAlreadyExists(
                err.details.get("code").cloned().unwrap_or_default(),
            ),
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => CouponError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => CouponError::Infrastructure(err.to_string()),
        }
    }
}
