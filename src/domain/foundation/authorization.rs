//! Back-office permissions and authorization results.
//!
//! Admin actions are guarded by named permissions (`admin.coupon.view`, ...)
//! carried by the authenticated admin. The wildcard `*` grants everything.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DomainError, ErrorCode, UserId};

/// Wildcard permission granting every admin action.
pub const WILDCARD_PERMISSION: &str = "*";

/// Permission required by an admin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminPermission {
    /// Browse the coupon list.
    CouponView,
    /// Open the create form and submit it.
    CouponCreate,
    /// Open the edit form and submit it.
    CouponUpdate,
    /// Show a coupon's details.
    CouponRead,
}

impl AdminPermission {
    /// Returns the permission name as carried in access tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminPermission::CouponView => "admin.coupon.view",
            AdminPermission::CouponCreate => "admin.coupon.create",
            AdminPermission::CouponUpdate => "admin.coupon.update",
            AdminPermission::CouponRead => "admin.coupon.read",
        }
    }

    /// Returns true if one of the granted permission names covers this one.
    pub fn is_granted_by<S: AsRef<str>>(&self, granted: &[S]) -> bool {
        granted
            .iter()
            .any(|p| p.as_ref() == WILDCARD_PERMISSION || p.as_ref() == self.as_str())
    }
}

impl fmt::Display for AdminPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an authorization check.
///
/// Carries the decision along with the context needed for audit logging.
#[derive(Debug, Clone)]
pub struct AuthorizationResult {
    pub granted: bool,
    pub permission: AdminPermission,
    pub user_id: String,
}

impl AuthorizationResult {
    /// Evaluates `permission` against the names granted to `user_id`.
    pub fn evaluate<S: AsRef<str>>(
        user_id: &UserId,
        granted: &[S],
        permission: AdminPermission,
    ) -> Self {
        Self {
            granted: permission.is_granted_by(granted),
            permission,
            user_id: user_id.to_string(),
        }
    }

    /// Converts this result to a `Result<(), DomainError>`.
    ///
    /// Returns `Ok(())` if granted, `Err(Forbidden)` if denied.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.granted {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                format!("Missing permission {}", self.permission),
            )
            .with_detail("permission", self.permission.as_str())
            .with_detail("user_id", self.user_id))
        }
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> UserId {
        UserId::new("admin-1").unwrap()
    }

    #[test]
    fn permission_names_are_namespaced_by_resource() {
        assert_eq!(AdminPermission::CouponView.as_str(), "admin.coupon.view");
        assert_eq!(AdminPermission::CouponCreate.as_str(), "admin.coupon.create");
        assert_eq!(AdminPermission::CouponUpdate.as_str(), "admin.coupon.update");
        assert_eq!(AdminPermission::CouponRead.as_str(), "admin.coupon.read");
    }

    #[test]
    fn exact_permission_is_granted() {
        let granted = ["admin.coupon.view"];
        assert!(AdminPermission::CouponView.is_granted_by(&granted));
        assert!(!AdminPermission::CouponCreate.is_granted_by(&granted));
    }

    #[test]
    fn wildcard_grants_every_permission() {
        let granted = vec!["*".to_string()];
        assert!(AdminPermission::CouponUpdate.is_granted_by(&granted));
        assert!(AdminPermission::CouponRead.is_granted_by(&granted));
    }

    #[test]
    fn empty_grant_list_denies() {
        let granted: [&str; 0] = [];
        assert!(!AdminPermission::CouponView.is_granted_by(&granted));
    }

    #[test]
    fn denied_result_converts_to_forbidden_error() {
        let result =
            AuthorizationResult::evaluate(&admin(), &["admin.coupon.view"], AdminPermission::CouponUpdate);
        assert!(!result.is_granted());

        let err = result.into_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(
            err.details.get("permission"),
            Some(&"admin.coupon.update".to_string())
        );
        assert_eq!(err.details.get("user_id"), Some(&"admin-1".to_string()));
    }

    #[test]
    fn granted_result_converts_to_ok() {
        let result = AuthorizationResult::evaluate(&admin(), &["*"], AdminPermission::CouponCreate);
        assert!(result.into_result().is_ok());
    }
}
