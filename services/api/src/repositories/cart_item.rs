//! Cart item repository for database operations

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use super::CartItemStore;
use crate::models::CartItem;

pub(crate) const CART_ITEM_COLUMNS: &str = "id, name, price, quantity, pizza_id, order_id";

#[derive(Clone)]
pub struct CartItemRepository {
    pool: PgPool,
}

impl CartItemRepository {
    /// Create a new cart item repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn cart_item_from_row(row: &PgRow) -> CartItem {
    CartItem {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        quantity: row.get("quantity"),
        pizza_id: row.get("pizza_id"),
        order_id: row.get("order_id"),
    }
}

#[async_trait]
impl CartItemStore for CartItemRepository {
    async fn create(&self, item: &CartItem) -> DatabaseResult<CartItem> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO cart_items (id, name, price, quantity, pizza_id, order_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CART_ITEM_COLUMNS}
            "#
        ))
        .bind(item.id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .bind(item.pizza_id)
        .bind(item.order_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(cart_item_from_row(&row))
    }

    async fn find(&self, id: Uuid) -> DatabaseResult<Option<CartItem>> {
        let row = sqlx::query(&format!(
            "SELECT {CART_ITEM_COLUMNS} FROM cart_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(cart_item_from_row))
    }

    async fn list(&self) -> DatabaseResult<Vec<CartItem>> {
        let rows = sqlx::query(&format!("SELECT {CART_ITEM_COLUMNS} FROM cart_items"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(cart_item_from_row).collect())
    }

    async fn update(&self, item: &CartItem) -> DatabaseResult<Option<CartItem>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE cart_items SET name = $2, price = $3, quantity = $4, pizza_id = $5
            WHERE id = $1
            RETURNING {CART_ITEM_COLUMNS}
            "#
        ))
        .bind(item.id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .bind(item.pizza_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(cart_item_from_row))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<CartItem>> {
        let row = sqlx::query(&format!(
            "DELETE FROM cart_items WHERE id = $1 RETURNING {CART_ITEM_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(cart_item_from_row))
    }
}
