//! Order repository for database operations
//!
//! Order and item writes share one transaction. Item writes lock the order
//! row first, so concurrent edits of one order are applied one after the
//! other and totals are always computed from the items actually stored.

use async_trait::async_trait;
use common::{
    error::{DatabaseError, DatabaseResult},
    models::{USER_COLUMNS, User, UserResponse},
};
use sqlx::{PgConnection, PgPool, Row, postgres::PgRow};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use super::{
    OrderStore,
    cart_item::{CART_ITEM_COLUMNS, cart_item_from_row},
};
use crate::models::{CartItem, DeleteOutcome, Order, OrderDetail, adjust_totals};

const ORDER_COLUMNS: &str = "id, user_id, payment_id, order_date, status, shipping_date, delivery_date, total_price, total_quantity";

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn order_from_row(row: &PgRow) -> DatabaseResult<Order> {
    let status: String = row.get("status");

    Ok(Order {
        id: row.get("id"),
        user_id: row.get("user_id"),
        payment_id: row.get("payment_id"),
        order_date: row.get("order_date"),
        status: status.parse().map_err(DatabaseError::Decode)?,
        shipping_date: row.get("shipping_date"),
        delivery_date: row.get("delivery_date"),
        total_price: row.get("total_price"),
        total_quantity: row.get("total_quantity"),
    })
}

/// Load the items and owners of `orders` with one query each
async fn attach_details(
    conn: &mut PgConnection,
    orders: Vec<Order>,
) -> DatabaseResult<Vec<OrderDetail>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let user_ids: Vec<Uuid> = orders.iter().map(|o| o.user_id).collect();

    let item_rows = sqlx::query(&format!(
        "SELECT {CART_ITEM_COLUMNS} FROM cart_items WHERE order_id = ANY($1) ORDER BY name"
    ))
    .bind(&order_ids)
    .fetch_all(&mut *conn)
    .await?;

    let user_rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
    ))
    .bind(&user_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut items_by_order: HashMap<Uuid, Vec<CartItem>> = HashMap::new();
    for row in &item_rows {
        let item = cart_item_from_row(row);
        if let Some(order_id) = item.order_id {
            items_by_order.entry(order_id).or_default().push(item);
        }
    }

    let mut users: HashMap<Uuid, UserResponse> = HashMap::new();
    for row in &user_rows {
        let user = User::from_row(row)?;
        users.insert(user.id, UserResponse::from(&user));
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            let user = users.get(&order.user_id).cloned();
            OrderDetail::new(order, items, user)
        })
        .collect())
}

async fn insert_item(conn: &mut PgConnection, item: &CartItem) -> DatabaseResult<()> {
    sqlx::query(
        r#"
        INSERT INTO cart_items (id, name, price, quantity, pizza_id, order_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(item.id)
    .bind(&item.name)
    .bind(item.price)
    .bind(item.quantity)
    .bind(item.pizza_id)
    .bind(item.order_id)
    .execute(conn)
    .await?;

    Ok(())
}

async fn update_totals(conn: &mut PgConnection, order: &Order) -> DatabaseResult<()> {
    sqlx::query("UPDATE orders SET total_price = $2, total_quantity = $3 WHERE id = $1")
        .bind(order.id)
        .bind(order.total_price)
        .bind(order.total_quantity)
        .execute(conn)
        .await?;

    Ok(())
}

/// Lock the order row until the transaction ends
async fn lock_order(conn: &mut PgConnection, id: Uuid) -> DatabaseResult<Option<Order>> {
    let row = sqlx::query(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(order_from_row).transpose()
}

/// Recompute a locked order's totals from its stored items
///
/// An order without items is deleted instead.
async fn settle_totals(
    conn: &mut PgConnection,
    mut order: Order,
) -> DatabaseResult<DeleteOutcome> {
    let rows = sqlx::query(&format!(
        "SELECT {CART_ITEM_COLUMNS} FROM cart_items WHERE order_id = $1"
    ))
    .bind(order.id)
    .fetch_all(&mut *conn)
    .await?;
    let items: Vec<CartItem> = rows.iter().map(cart_item_from_row).collect();

    if items.is_empty() {
        info!("Order {} has no items left, deleting it", order.id);
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order.id)
            .execute(&mut *conn)
            .await?;
        return Ok(DeleteOutcome::OrderDeleted { order_id: order.id });
    }

    order.apply_totals(adjust_totals(&items)?);
    update_totals(conn, &order).await?;

    attach_details(conn, vec![order])
        .await?
        .pop()
        .map(DeleteOutcome::Updated)
        .ok_or_else(|| DatabaseError::Decode("locked order vanished".to_string()))
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn insert(&self, order: &Order, items: &[CartItem]) -> DatabaseResult<OrderDetail> {
        info!("Creating order {} with {} item(s)", order.id, items.len());

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, payment_id, order_date, status, shipping_date,
                                delivery_date, total_price, total_quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(&order.payment_id)
        .bind(order.order_date)
        .bind(order.status.as_str())
        .bind(order.shipping_date)
        .bind(order.delivery_date)
        .bind(order.total_price)
        .bind(order.total_quantity)
        .execute(&mut *tx)
        .await?;

        for item in items {
            insert_item(&mut tx, item).await?;
        }

        let mut details = attach_details(&mut tx, vec![order.clone()]).await?;
        tx.commit().await?;

        details
            .pop()
            .ok_or_else(|| DatabaseError::Decode("inserted order vanished".to_string()))
    }

    async fn find(&self, id: Uuid) -> DatabaseResult<Option<OrderDetail>> {
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => {
                let order = order_from_row(&row)?;
                Ok(attach_details(&mut conn, vec![order]).await?.pop())
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> DatabaseResult<Vec<OrderDetail>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_date DESC"
        ))
        .fetch_all(&mut *conn)
        .await?;

        let orders = rows.iter().map(order_from_row).collect::<DatabaseResult<Vec<_>>>()?;
        attach_details(&mut conn, orders).await
    }

    async fn list_by_user(&self, user_id: Uuid) -> DatabaseResult<Vec<OrderDetail>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY order_date DESC"
        ))
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        let orders = rows.iter().map(order_from_row).collect::<DatabaseResult<Vec<_>>>()?;
        attach_details(&mut conn, orders).await
    }

    async fn update(&self, order: &Order) -> DatabaseResult<Option<Order>> {
        info!("Updating order {} ({})", order.id, order.status);

        let row = sqlx::query(&format!(
            r#"
            UPDATE orders
            SET payment_id = $2, status = $3, shipping_date = $4, delivery_date = $5
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.id)
        .bind(&order.payment_id)
        .bind(order.status.as_str())
        .bind(order.shipping_date)
        .bind(order.delivery_date)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(order_from_row).transpose()
    }

    async fn save_items(
        &self,
        order_id: Uuid,
        items: &[CartItem],
    ) -> DatabaseResult<Option<OrderDetail>> {
        let mut tx = self.pool.begin().await?;

        let Some(order) = lock_order(&mut tx, order_id).await? else {
            return Ok(None);
        };

        for item in items {
            let result = sqlx::query(
                r#"
                UPDATE cart_items SET name = $3, price = $4, quantity = $5, pizza_id = $6
                WHERE id = $1 AND order_id = $2
                "#,
            )
            .bind(item.id)
            .bind(order_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity)
            .bind(item.pizza_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DatabaseError::Conflict(format!(
                    "Cart item {} does not belong to order {}",
                    item.id, order_id
                )));
            }
        }

        let outcome = settle_totals(&mut tx, order).await?;
        tx.commit().await?;
        Ok(outcome.into_updated())
    }

    async fn attach_item(
        &self,
        order_id: Uuid,
        item: &CartItem,
    ) -> DatabaseResult<Option<OrderDetail>> {
        let mut tx = self.pool.begin().await?;

        let Some(order) = lock_order(&mut tx, order_id).await? else {
            return Ok(None);
        };

        let item = CartItem {
            order_id: Some(order_id),
            ..item.clone()
        };
        insert_item(&mut tx, &item).await?;

        let outcome = settle_totals(&mut tx, order).await?;
        tx.commit().await?;
        Ok(outcome.into_updated())
    }

    async fn remove_item(
        &self,
        order_id: Uuid,
        item_id: Uuid,
    ) -> DatabaseResult<Option<DeleteOutcome>> {
        let mut tx = self.pool.begin().await?;

        let Some(order) = lock_order(&mut tx, order_id).await? else {
            return Ok(None);
        };

        let removed = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND order_id = $2")
            .bind(item_id)
            .bind(order_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            return Ok(None);
        }

        let outcome = settle_totals(&mut tx, order).await?;
        tx.commit().await?;
        Ok(Some(outcome))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<OrderDetail>> {
        info!("Deleting order {}", id);

        let mut tx = self.pool.begin().await?;

        let Some(order) = lock_order(&mut tx, id).await? else {
            return Ok(None);
        };

        let snapshot = attach_details(&mut tx, vec![order]).await?.pop();

        sqlx::query("DELETE FROM cart_items WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(snapshot)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> DatabaseResult<u64> {
        info!("Deleting all orders of user {}", user_id);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM cart_items WHERE order_id IN (SELECT id FROM orders WHERE user_id = $1)",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let removed = sqlx::query("DELETE FROM orders WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(removed)
    }

    async fn find_user(&self, user_id: Uuid) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(User::from_row).transpose()
    }
}
