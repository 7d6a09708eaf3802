//! In-memory user store for service tests

use async_trait::async_trait;
use chrono::Utc;
use common::{
    error::{DatabaseError, DatabaseResult},
    models::{Role, User},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::UserStore;
use crate::models::{NewUser, ProfileChanges};

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn modify(&self, id: Uuid, apply: impl FnOnce(&mut User)) -> Option<User> {
        let mut users = self.users.lock().expect("user store lock");
        users.get_mut(&id).map(|user| {
            apply(user);
            user.updated_at = Utc::now();
            user.clone()
        })
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut users = self.users.lock().expect("user store lock");
        if users.values().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::Conflict("Record already exists".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            phone: new_user.phone.clone(),
            image: new_user.image.clone(),
            address: new_user.address.clone(),
            gender: new_user.gender,
            role: new_user.role,
            password_hash: new_user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.lock().expect("user store lock");
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        Ok(self.users.lock().expect("user store lock").get(&id).cloned())
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .expect("user store lock")
            .values()
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> DatabaseResult<Option<User>> {
        Ok(self.modify(id, |user| {
            user.name = changes.name.clone();
            user.phone = changes.phone.clone();
            user.image = changes.image.clone();
            user.address = changes.address.clone();
            user.gender = changes.gender;
        }))
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> DatabaseResult<Option<User>> {
        Ok(self.modify(id, |user| user.password_hash = password_hash.to_string()))
    }

    async fn update_role(&self, id: Uuid, role: Role) -> DatabaseResult<Option<User>> {
        Ok(self.modify(id, |user| user.role = role))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        Ok(self.users.lock().expect("user store lock").remove(&id))
    }
}
