//! Ownership and admin checks shared by the mutating services

use discover_core::UserKey;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Allow the resource owner or the admin identity
pub fn require_owner_or_admin(
    ctx: &ServiceContext,
    viewer: &UserKey,
    owner: &UserKey,
    action: &str,
) -> ServiceResult<()> {
    if viewer == owner || ctx.is_admin(viewer) {
        Ok(())
    } else {
        tracing::debug!(viewer = %viewer, owner = %owner, action, "Permission denied");
        Err(ServiceError::permission_denied(action))
    }
}

/// Allow only the admin identity
pub fn require_admin(ctx: &ServiceContext, viewer: &UserKey, action: &str) -> ServiceResult<()> {
    if ctx.is_admin(viewer) {
        Ok(())
    } else {
        tracing::debug!(viewer = %viewer, action, "Admin-only operation refused");
        Err(ServiceError::permission_denied(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::TestEnv;

    #[test]
    fn test_owner_admin_and_stranger() {
        let env = TestEnv::new();
        let ctx = &env.ctx;

        assert!(require_owner_or_admin(ctx, &env.alice, &env.alice, "edit").is_ok());
        assert!(require_owner_or_admin(ctx, &env.admin, &env.alice, "edit").is_ok());
        let err = require_owner_or_admin(ctx, &env.bob, &env.alice, "edit").unwrap_err();
        assert!(err.is_permission_denied());

        assert!(require_admin(ctx, &env.admin, "broadcast").is_ok());
        assert!(require_admin(ctx, &env.alice, "broadcast").is_err());
    }
}
