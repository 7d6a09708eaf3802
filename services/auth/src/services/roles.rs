//! Role promotion and demotion

use common::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{Role, UserResponse},
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{models::RoleChangeRequest, repositories::UserStore};

#[derive(Clone)]
pub struct RoleService {
    users: Arc<dyn UserStore>,
}

impl RoleService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Give the user registered under `req.email` a new role; admins only
    pub async fn update_user_role(
        &self,
        caller: &AuthUser,
        req: RoleChangeRequest,
    ) -> AppResult<UserResponse> {
        if let Err(err) = caller.require_any(&[Role::Admin]) {
            warn!(caller = %caller.id, "Role change by a non-admin");
            return Err(err);
        }

        let target = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with email {} is not found!", req.email)))?;

        info!(user_id = %target.id, role = %req.role, "Updating role");

        let updated = self
            .users
            .update_role(target.id, req.role)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with email {} is not found!", req.email)))?;

        Ok(UserResponse::from(&updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::InMemoryUserStore;
    use crate::services::testing::seed_user;
    use uuid::Uuid;

    fn caller(id: Uuid, role: Role) -> AuthUser {
        AuthUser {
            id,
            name: "caller".to_string(),
            role,
        }
    }

    fn promote(email: &str) -> RoleChangeRequest {
        RoleChangeRequest {
            email: email.to_string(),
            role: Role::Staff,
        }
    }

    #[tokio::test]
    async fn non_admins_are_forbidden() {
        let store = Arc::new(InMemoryUserStore::new());
        let staff = seed_user(&store, "staff@example.com", Role::Staff).await;
        seed_user(&store, "user@example.com", Role::User).await;

        let err = RoleService::new(store.clone())
            .update_user_role(&caller(staff, Role::Staff), promote("user@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let unchanged = store.find_by_email("user@example.com").await.unwrap().unwrap();
        assert_eq!(unchanged.role, Role::User);
    }

    #[tokio::test]
    async fn unknown_target_is_not_found() {
        let store = Arc::new(InMemoryUserStore::new());
        let admin = seed_user(&store, "admin@example.com", Role::Admin).await;

        let err = RoleService::new(store.clone())
            .update_user_role(&caller(admin, Role::Admin), promote("ghost@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn admin_changes_role() {
        let store = Arc::new(InMemoryUserStore::new());
        let admin = seed_user(&store, "admin@example.com", Role::Admin).await;
        let user = seed_user(&store, "user@example.com", Role::User).await;

        let updated = RoleService::new(store.clone())
            .update_user_role(&caller(admin, Role::Admin), promote("user@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.id, user);
        assert_eq!(updated.role, Some(Role::Staff));

        let stored = store.find_by_id(user).await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Staff);
    }
}
