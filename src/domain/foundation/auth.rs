//! Authentication types for the domain layer.
//!
//! An `AuthenticatedUser` is the back-office admin extracted from a validated
//! access token. Any OIDC provider can populate it through the
//! `SessionValidator` port.

use super::{AdminPermission, AuthorizationResult, DomainError, UserId};
use thiserror::Error;

/// Authenticated admin extracted from a validated JWT.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    pub email: String,

    /// Display name if available (`name` or `preferred_username` claim).
    pub display_name: Option<String>,

    pub email_verified: bool,

    /// Back-office permission names granted to this admin.
    pub permissions: Vec<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user without any permission.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        email_verified: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            email_verified,
            permissions: Vec::new(),
        }
    }

    /// Builder: replaces the granted permission names.
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_permission(&self, permission: AdminPermission) -> bool {
        permission.is_granted_by(&self.permissions)
    }

    /// Checks a permission, returning `Forbidden` when it is missing.
    pub fn authorize(&self, permission: AdminPermission) -> Result<(), DomainError> {
        AuthorizationResult::evaluate(&self.id, &self.permissions, permission).into_result()
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("admin-123").unwrap(),
            "admin@shop.example",
            Some("Alice".to_string()),
            true,
        )
    }

    #[test]
    fn new_user_has_no_permissions() {
        let user = admin();
        assert!(user.permissions.is_empty());
        assert!(!user.has_permission(AdminPermission::CouponView));
    }

    #[test]
    fn authorize_passes_with_matching_permission() {
        let user = admin().with_permissions(["admin.coupon.create"]);
        assert!(user.authorize(AdminPermission::CouponCreate).is_ok());
    }

    #[test]
    fn authorize_fails_with_forbidden_when_missing() {
        let user = admin().with_permissions(["admin.coupon.view"]);
        let err = user.authorize(AdminPermission::CouponUpdate).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn auth_error_service_unavailable_displays_message() {
        let err = AuthError::service_unavailable("Connection refused");
        assert_eq!(format!("{}", err), "Auth service unavailable: Connection refused");
    }
}
