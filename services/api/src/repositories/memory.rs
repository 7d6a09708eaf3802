//! In-memory stores for service and router tests

use async_trait::async_trait;
use common::{
    error::{DatabaseError, DatabaseResult},
    models::{User, UserResponse},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::{CartItemStore, OrderStore, PizzaStore};
use crate::models::{CartItem, DeleteOutcome, Order, OrderDetail, Pizza, adjust_totals};

#[derive(Debug, Default)]
struct State {
    pizzas: HashMap<Uuid, Pizza>,
    items: HashMap<Uuid, CartItem>,
    orders: HashMap<Uuid, Order>,
    users: HashMap<Uuid, User>,
}

impl State {
    fn detail(&self, order: &Order) -> OrderDetail {
        let mut items: Vec<CartItem> = self
            .items
            .values()
            .filter(|item| item.order_id == Some(order.id))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));

        let user = self.users.get(&order.user_id).map(UserResponse::from);
        OrderDetail::new(order.clone(), items, user)
    }

    fn details<'a>(&self, orders: impl Iterator<Item = &'a Order>) -> Vec<OrderDetail> {
        let mut details: Vec<OrderDetail> = orders.map(|order| self.detail(order)).collect();
        details.sort_by(|a, b| b.order.order_date.cmp(&a.order.order_date));
        details
    }

    /// Recompute totals from the stored items, dropping the order when none are left
    fn settle_totals(&mut self, order_id: Uuid) -> DatabaseResult<DeleteOutcome> {
        let items: Vec<CartItem> = self
            .items
            .values()
            .filter(|item| item.order_id == Some(order_id))
            .cloned()
            .collect();

        if items.is_empty() {
            self.orders.remove(&order_id);
            return Ok(DeleteOutcome::OrderDeleted { order_id });
        }

        let totals = adjust_totals(&items)?;
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| DatabaseError::Decode("order vanished".to_string()))?;
        order.apply_totals(totals);
        let order = order.clone();

        Ok(DeleteOutcome::Updated(self.detail(&order)))
    }

    fn remove_order(&mut self, id: Uuid) -> Option<OrderDetail> {
        let order = self.orders.get(&id)?.clone();
        let snapshot = self.detail(&order);
        self.items.retain(|_, item| item.order_id != Some(id));
        self.orders.remove(&id);
        Some(snapshot)
    }
}

/// One shared state implementing every api store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store lock")
    }

    pub fn add_user(&self, user: User) {
        self.state().users.insert(user.id, user);
    }

    pub fn order_count(&self) -> usize {
        self.state().orders.len()
    }

    pub fn item_count(&self) -> usize {
        self.state().items.len()
    }
}

#[async_trait]
impl PizzaStore for MemoryStore {
    async fn create(&self, pizza: &Pizza) -> DatabaseResult<Pizza> {
        self.state().pizzas.insert(pizza.id, pizza.clone());
        Ok(pizza.clone())
    }

    async fn find(&self, id: Uuid) -> DatabaseResult<Option<Pizza>> {
        Ok(self.state().pizzas.get(&id).cloned())
    }

    async fn list(&self) -> DatabaseResult<Vec<Pizza>> {
        Ok(self.state().pizzas.values().cloned().collect())
    }

    async fn update(&self, pizza: &Pizza) -> DatabaseResult<Option<Pizza>> {
        let mut state = self.state();
        Ok(state.pizzas.get_mut(&pizza.id).map(|stored| {
            *stored = pizza.clone();
            stored.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<Pizza>> {
        Ok(self.state().pizzas.remove(&id))
    }
}

#[async_trait]
impl CartItemStore for MemoryStore {
    async fn create(&self, item: &CartItem) -> DatabaseResult<CartItem> {
        self.state().items.insert(item.id, item.clone());
        Ok(item.clone())
    }

    async fn find(&self, id: Uuid) -> DatabaseResult<Option<CartItem>> {
        Ok(self.state().items.get(&id).cloned())
    }

    async fn list(&self) -> DatabaseResult<Vec<CartItem>> {
        Ok(self.state().items.values().cloned().collect())
    }

    async fn update(&self, item: &CartItem) -> DatabaseResult<Option<CartItem>> {
        let mut state = self.state();
        Ok(state.items.get_mut(&item.id).map(|stored| {
            *stored = item.clone();
            stored.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<CartItem>> {
        Ok(self.state().items.remove(&id))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert(&self, order: &Order, items: &[CartItem]) -> DatabaseResult<OrderDetail> {
        let mut state = self.state();
        state.orders.insert(order.id, order.clone());
        for item in items {
            state.items.insert(item.id, item.clone());
        }
        Ok(state.detail(order))
    }

    async fn find(&self, id: Uuid) -> DatabaseResult<Option<OrderDetail>> {
        let state = self.state();
        Ok(state.orders.get(&id).map(|order| state.detail(order)))
    }

    async fn list(&self) -> DatabaseResult<Vec<OrderDetail>> {
        let state = self.state();
        Ok(state.details(state.orders.values()))
    }

    async fn list_by_user(&self, user_id: Uuid) -> DatabaseResult<Vec<OrderDetail>> {
        let state = self.state();
        Ok(state.details(state.orders.values().filter(|o| o.user_id == user_id)))
    }

    async fn update(&self, order: &Order) -> DatabaseResult<Option<Order>> {
        let mut state = self.state();
        Ok(state.orders.get_mut(&order.id).map(|stored| {
            stored.payment_id = order.payment_id.clone();
            stored.status = order.status;
            stored.shipping_date = order.shipping_date;
            stored.delivery_date = order.delivery_date;
            stored.clone()
        }))
    }

    async fn save_items(
        &self,
        order_id: Uuid,
        items: &[CartItem],
    ) -> DatabaseResult<Option<OrderDetail>> {
        let mut state = self.state();
        if !state.orders.contains_key(&order_id) {
            return Ok(None);
        }
        if items
            .iter()
            .any(|item| state.items.get(&item.id).and_then(|i| i.order_id) != Some(order_id))
        {
            return Err(DatabaseError::Conflict(
                "Cart item does not belong to the order".to_string(),
            ));
        }

        for item in items {
            state.items.insert(
                item.id,
                CartItem {
                    order_id: Some(order_id),
                    ..item.clone()
                },
            );
        }
        Ok(state.settle_totals(order_id)?.into_updated())
    }

    async fn attach_item(
        &self,
        order_id: Uuid,
        item: &CartItem,
    ) -> DatabaseResult<Option<OrderDetail>> {
        let mut state = self.state();
        if !state.orders.contains_key(&order_id) {
            return Ok(None);
        }

        state.items.insert(
            item.id,
            CartItem {
                order_id: Some(order_id),
                ..item.clone()
            },
        );
        Ok(state.settle_totals(order_id)?.into_updated())
    }

    async fn remove_item(
        &self,
        order_id: Uuid,
        item_id: Uuid,
    ) -> DatabaseResult<Option<DeleteOutcome>> {
        let mut state = self.state();
        if !state.orders.contains_key(&order_id)
            || state.items.get(&item_id).and_then(|item| item.order_id) != Some(order_id)
        {
            return Ok(None);
        }

        state.items.remove(&item_id);
        state.settle_totals(order_id).map(Some)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<Option<OrderDetail>> {
        Ok(self.state().remove_order(id))
    }

    async fn delete_by_user(&self, user_id: Uuid) -> DatabaseResult<u64> {
        let mut state = self.state();
        let ids: Vec<Uuid> = state
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .map(|o| o.id)
            .collect();
        for id in &ids {
            state.remove_order(*id);
        }
        Ok(ids.len() as u64)
    }

    async fn find_user(&self, user_id: Uuid) -> DatabaseResult<Option<User>> {
        Ok(self.state().users.get(&user_id).cloned())
    }
}
