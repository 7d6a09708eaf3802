//! Read and administer user profiles

use common::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{Role, UserResponse},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::repositories::UserStore;

#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserStore>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// The user behind the caller's token
    pub async fn current_user(&self, caller: &AuthUser) -> AppResult<UserResponse> {
        self.get_user(caller.id).await
    }

    pub async fn list_users(&self, caller: &AuthUser) -> AppResult<Vec<UserResponse>> {
        caller.require_any(&[Role::Admin])?;

        let users = self.users.list().await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    pub async fn get_user_by_id(&self, caller: &AuthUser, id: Uuid) -> AppResult<UserResponse> {
        caller.require_any(&[Role::Admin])?;
        self.get_user(id).await
    }

    /// Remove a user together with their orders
    pub async fn delete_user_by_id(&self, caller: &AuthUser, id: Uuid) -> AppResult<UserResponse> {
        caller.require_any(&[Role::Admin])?;
        info!(user_id = %id, admin = %caller.id, "Deleting user");

        let removed = self
            .users
            .delete(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(UserResponse::from(&removed))
    }

    async fn get_user(&self, id: Uuid) -> AppResult<UserResponse> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(UserResponse::from(&user))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("User with id {} is not found!", id))
}
