//! Repositories for database operations
//!
//! Services hold the store traits behind `Arc<dyn ...>`; PostgreSQL is the
//! production backend and tests use [`memory::MemoryStore`].

use async_trait::async_trait;
use common::{
    error::{DatabaseError, DatabaseResult},
    models::User,
};
use uuid::Uuid;

use crate::models::{CartItem, DeleteOutcome, Order, OrderDetail, Pizza, TotalsOverflow};

pub mod cart_item;
#[cfg(test)]
pub mod memory;
pub mod order;
pub mod pizza;

pub use cart_item::CartItemRepository;
pub use order::OrderRepository;
pub use pizza::PizzaRepository;

impl From<TotalsOverflow> for DatabaseError {
    fn from(err: TotalsOverflow) -> Self {
        DatabaseError::OutOfRange(err.to_string())
    }
}

/// Catalog storage
#[async_trait]
pub trait PizzaStore: Send + Sync {
    async fn create(&self, pizza: &Pizza) -> DatabaseResult<Pizza>;

    async fn find(&self, id: Uuid) -> DatabaseResult<Option<Pizza>>;

    async fn list(&self) -> DatabaseResult<Vec<Pizza>>;

    async fn update(&self, pizza: &Pizza) -> DatabaseResult<Option<Pizza>>;

    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<Pizza>>;
}

/// Storage of individual cart items
///
/// Writes here never touch order totals; items attached to an order are
/// mutated through [`OrderStore`].
#[async_trait]
pub trait CartItemStore: Send + Sync {
    async fn create(&self, item: &CartItem) -> DatabaseResult<CartItem>;

    async fn find(&self, id: Uuid) -> DatabaseResult<Option<CartItem>>;

    async fn list(&self) -> DatabaseResult<Vec<CartItem>>;

    async fn update(&self, item: &CartItem) -> DatabaseResult<Option<CartItem>>;

    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<CartItem>>;
}

/// Orders together with their items
///
/// Every method that writes both an order and its items is atomic. Item
/// writes lock the order, recompute its totals from the items stored after
/// the write and remove the order once no item is left.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert an order and its items
    async fn insert(&self, order: &Order, items: &[CartItem]) -> DatabaseResult<OrderDetail>;

    async fn find(&self, id: Uuid) -> DatabaseResult<Option<OrderDetail>>;

    async fn list(&self) -> DatabaseResult<Vec<OrderDetail>>;

    async fn list_by_user(&self, user_id: Uuid) -> DatabaseResult<Vec<OrderDetail>>;

    /// Persist payment reference, status and dates; totals are left alone
    async fn update(&self, order: &Order) -> DatabaseResult<Option<Order>>;

    /// Overwrite `items`, which must belong to the order; `None` if the order is gone
    async fn save_items(
        &self,
        order_id: Uuid,
        items: &[CartItem],
    ) -> DatabaseResult<Option<OrderDetail>>;

    /// Add `item` to the order; `None` if the order is gone
    async fn attach_item(
        &self,
        order_id: Uuid,
        item: &CartItem,
    ) -> DatabaseResult<Option<OrderDetail>>;

    /// Delete one item; `None` if the order or the item is gone
    async fn remove_item(
        &self,
        order_id: Uuid,
        item_id: Uuid,
    ) -> DatabaseResult<Option<DeleteOutcome>>;

    /// Delete an order and its items, returning the removed snapshot
    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<OrderDetail>>;

    /// Delete every order of a user with their items; returns the number of orders removed
    async fn delete_by_user(&self, user_id: Uuid) -> DatabaseResult<u64>;

    async fn find_user(&self, user_id: Uuid) -> DatabaseResult<Option<User>>;
}
