//! Role and tenant access guards.
//!
//! Every tenant- or role-scoped service operation funnels through these
//! two checks.

use sceau_common::{AppError, AppResult};
use sceau_db::entities::user;

use crate::roles::Role;

/// Parse the actor's stored role.
pub fn actor_role(user: &user::Model) -> AppResult<Role> {
    user.role
        .parse()
        .map_err(|_| AppError::Internal(format!("User {} has unknown role {}", user.id, user.role)))
}

/// Require the actor to hold one of the allowed roles.
pub fn require_role(user: &user::Model, allowed: &[Role]) -> AppResult<Role> {
    let role = actor_role(user)?;
    if allowed.contains(&role) {
        Ok(role)
    } else {
        Err(AppError::Forbidden(
            "Insufficient role for this operation".to_string(),
        ))
    }
}

/// Require the actor to belong to the resource's tenant.
///
/// SUPER_ADMIN bypasses the check; everyone else needs an exact match.
pub fn require_tenant(user: &user::Model, resource_tenant_id: &str) -> AppResult<()> {
    if user.role == Role::SuperAdmin.as_str() {
        return Ok(());
    }
    if user.tenant_id == resource_tenant_id {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Resource belongs to another tenant".to_string(),
    ))
}

/// Resolve the tenant a call targets.
///
/// A requested tenant goes through [`require_tenant`], so only
/// SUPER_ADMIN can name a tenant other than their own. Absent a
/// request, the actor's tenant is used.
pub fn resolve_tenant(user: &user::Model, requested: Option<&str>) -> AppResult<String> {
    match requested {
        Some(tenant_id) => {
            require_tenant(user, tenant_id)?;
            Ok(tenant_id.to_string())
        }
        None => Ok(user.tenant_id.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user(role: &str, tenant_id: &str) -> user::Model {
        user::Model {
            id: "user-1".to_string(),
            email: "someone@uni.test".to_string(),
            full_name: "Someone".to_string(),
            password_hash: String::new(),
            role: role.to_string(),
            tenant_id: tenant_id.to_string(),
            status: "ACTIVE".to_string(),
            last_login: None,
            signature_img: None,
            stamp_img: None,
            official_title: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_require_role_allows_listed() {
        let user = test_user("ADMIN", "tenant-1");
        assert!(require_role(&user, &[Role::Admin, Role::SuperAdmin]).is_ok());
    }

    #[test]
    fn test_require_role_rejects_unlisted() {
        let user = test_user("VIEWER", "tenant-1");
        let err = require_role(&user, &[Role::Admin]).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_require_tenant_exact_match() {
        let user = test_user("ADMIN", "tenant-1");
        assert!(require_tenant(&user, "tenant-1").is_ok());
        assert!(require_tenant(&user, "tenant-2").is_err());
    }

    #[test]
    fn test_require_tenant_super_admin_bypass() {
        let user = test_user("SUPER_ADMIN", "tenant-1");
        assert!(require_tenant(&user, "tenant-2").is_ok());
    }

    #[test]
    fn test_resolve_tenant_defaults_to_actor() {
        let user = test_user("ADMIN", "tenant-1");
        assert_eq!(resolve_tenant(&user, None).unwrap(), "tenant-1");
    }

    #[test]
    fn test_resolve_tenant_cross_tenant_needs_super_admin() {
        let admin = test_user("ADMIN", "tenant-1");
        let err = resolve_tenant(&admin, Some("tenant-2")).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let root = test_user("SUPER_ADMIN", "tenant-1");
        assert_eq!(resolve_tenant(&root, Some("tenant-2")).unwrap(), "tenant-2");
    }
}
