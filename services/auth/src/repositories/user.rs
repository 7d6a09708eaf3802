//! User repository for database operations

use async_trait::async_trait;
use common::{
    error::DatabaseResult,
    models::{Role, USER_COLUMNS, User},
};
use sqlx::{PgPool, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::UserStore;
use crate::models::{NewUser, ProfileChanges};

/// PostgreSQL backed [`UserStore`]
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn optional_user(row: Option<PgRow>) -> DatabaseResult<Option<User>> {
    row.as_ref().map(User::from_row).transpose()
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.email);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, name, email, phone, image, address, gender, role, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.phone)
        .bind(&new_user.image)
        .bind(&new_user.address)
        .bind(new_user.gender.as_str())
        .bind(new_user.role.as_str())
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        User::from_row(&row)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        optional_user(row)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        optional_user(row)
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(User::from_row).collect()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> DatabaseResult<Option<User>> {
        info!("Updating profile of user {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET name = $2, phone = $3, image = $4, address = $5, gender = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.phone)
        .bind(&changes.image)
        .bind(&changes.address)
        .bind(changes.gender.as_str())
        .fetch_optional(&self.pool)
        .await?;

        optional_user(row)
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> DatabaseResult<Option<User>> {
        info!("Updating password of user {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE users SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        optional_user(row)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> DatabaseResult<Option<User>> {
        info!("Setting role of user {} to {}", id, role);

        let row = sqlx::query(&format!(
            r#"
            UPDATE users SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;

        optional_user(row)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        info!("Deleting user {}", id);

        let row = sqlx::query(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        optional_user(row)
    }
}
