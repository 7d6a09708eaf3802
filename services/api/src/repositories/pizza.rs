//! Pizza repository for database operations

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::PizzaStore;
use crate::models::Pizza;

const PIZZA_COLUMNS: &str =
    "id, name, topping, price, quantity, image, description, user_id, created_at, updated_at";

#[derive(Clone)]
pub struct PizzaRepository {
    pool: PgPool,
}

impl PizzaRepository {
    /// Create a new pizza repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn pizza_from_row(row: &PgRow) -> Pizza {
    Pizza {
        id: row.get("id"),
        name: row.get("name"),
        topping: row.get("topping"),
        price: row.get("price"),
        quantity: row.get("quantity"),
        image: row.get("image"),
        description: row.get("description"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl PizzaStore for PizzaRepository {
    async fn create(&self, pizza: &Pizza) -> DatabaseResult<Pizza> {
        info!("Creating pizza: {}", pizza.name);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO pizzas (id, name, topping, price, quantity, image, description, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PIZZA_COLUMNS}
            "#
        ))
        .bind(pizza.id)
        .bind(&pizza.name)
        .bind(&pizza.topping)
        .bind(pizza.price)
        .bind(pizza.quantity)
        .bind(&pizza.image)
        .bind(&pizza.description)
        .bind(pizza.user_id)
        .bind(pizza.created_at)
        .bind(pizza.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(pizza_from_row(&row))
    }

    async fn find(&self, id: Uuid) -> DatabaseResult<Option<Pizza>> {
        let row = sqlx::query(&format!("SELECT {PIZZA_COLUMNS} FROM pizzas WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(pizza_from_row))
    }

    async fn list(&self) -> DatabaseResult<Vec<Pizza>> {
        let rows = sqlx::query(&format!(
            "SELECT {PIZZA_COLUMNS} FROM pizzas ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(pizza_from_row).collect())
    }

    async fn update(&self, pizza: &Pizza) -> DatabaseResult<Option<Pizza>> {
        info!("Updating pizza {}", pizza.id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE pizzas
            SET name = $2, topping = $3, price = $4, quantity = $5, image = $6,
                description = $7, updated_at = $8
            WHERE id = $1
            RETURNING {PIZZA_COLUMNS}
            "#
        ))
        .bind(pizza.id)
        .bind(&pizza.name)
        .bind(&pizza.topping)
        .bind(pizza.price)
        .bind(pizza.quantity)
        .bind(&pizza.image)
        .bind(&pizza.description)
        .bind(pizza.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(pizza_from_row))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<Pizza>> {
        info!("Deleting pizza {}", id);

        let row = sqlx::query(&format!(
            "DELETE FROM pizzas WHERE id = $1 RETURNING {PIZZA_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(pizza_from_row))
    }
}
