//! User persistence
//!
//! Services depend on [`UserStore`] so they can run against PostgreSQL in
//! production and an in-memory map in tests.

use async_trait::async_trait;
use common::{
    error::DatabaseResult,
    models::{Role, User},
};
use uuid::Uuid;

use crate::models::{NewUser, ProfileChanges};

#[cfg(test)]
pub mod memory;
pub mod user;

pub use user::UserRepository;

/// Storage operations on user records
///
/// Mutations return `None` when no user has the given id.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; a taken email yields [`common::error::DatabaseError::Conflict`]
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    async fn list(&self) -> DatabaseResult<Vec<User>>;

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> DatabaseResult<Option<User>>;

    async fn update_password(&self, id: Uuid, password_hash: &str)
    -> DatabaseResult<Option<User>>;

    async fn update_role(&self, id: Uuid, role: Role) -> DatabaseResult<Option<User>>;

    /// Remove a user, cascading to their orders; returns the removed record
    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<User>>;
}
