//! Order aggregation
//!
//! Keeps every order's cached totals equal to the sum over its items and
//! removes an order once its last item is gone.

use chrono::Utc;
use common::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::Role,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    models::{
        CartItem, CreateOrderRequest, DeleteOutcome, EditOrderRequest, Order, OrderDetail,
        TotalsOverflow, TransitionError, adjust_totals,
    },
    repositories::OrderStore,
};

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<TotalsOverflow> for AppError {
    fn from(err: TotalsOverflow) -> Self {
        AppError::Validation(err.to_string())
    }
}

fn order_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Order with id {} is not found!", id))
}

fn item_not_in_order(item_id: Uuid, order_id: Uuid) -> AppError {
    AppError::NotFound(format!(
        "Cart item with id {} is not part of order {}!",
        item_id, order_id
    ))
}

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    async fn load(&self, id: Uuid) -> AppResult<OrderDetail> {
        self.orders
            .find(id)
            .await?
            .ok_or_else(|| order_not_found(id))
    }

    /// Load an order the caller owns, or any order for admin and staff
    pub(crate) async fn load_for(&self, caller: &AuthUser, id: Uuid) -> AppResult<OrderDetail> {
        let detail = self.load(id).await?;
        caller.require_self_or_staff(detail.order.user_id)?;
        Ok(detail)
    }

    /// Place an order with its items in one write
    pub async fn create_order(
        &self,
        caller: &AuthUser,
        req: CreateOrderRequest,
    ) -> AppResult<OrderDetail> {
        let user_id = req.user_id.unwrap_or(caller.id);
        caller.require_self_or_staff(user_id)?;

        if req.cart_items.is_empty() {
            return Err(AppError::Validation(
                "An order must contain at least one cart item!".to_string(),
            ));
        }

        if self.orders.find_user(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "User with id {} is not found!",
                user_id
            )));
        }

        let mut order = Order::new(user_id, req.payment_id, Utc::now());
        let items: Vec<CartItem> = req
            .cart_items
            .into_iter()
            .map(|item| CartItem {
                id: Uuid::new_v4(),
                name: item.name,
                price: item.price,
                quantity: item.quantity,
                pizza_id: item.pizza_id,
                order_id: Some(order.id),
            })
            .collect();
        order.apply_totals(adjust_totals(&items)?);

        info!(order_id = %order.id, user_id = %user_id, total = %order.total_price, "Creating order");
        Ok(self.orders.insert(&order, &items).await?)
    }

    /// Overwrite items already on the order and recompute its totals
    ///
    /// Items of the order that are not supplied keep their current values.
    pub async fn edit_all_cart_items(
        &self,
        caller: &AuthUser,
        order_id: Uuid,
        cart_items: Vec<CartItem>,
    ) -> AppResult<OrderDetail> {
        let detail = self.load_for(caller, order_id).await?;

        if cart_items.is_empty() {
            return Err(AppError::Validation(
                "At least one cart item must be supplied!".to_string(),
            ));
        }
        if let Some(stranger) = cart_items
            .iter()
            .find(|item| !detail.cart_items.iter().any(|existing| existing.id == item.id))
        {
            return Err(item_not_in_order(stranger.id, order_id));
        }

        info!(order_id = %order_id, items = cart_items.len(), "Editing cart items");
        self.orders
            .save_items(order_id, &cart_items)
            .await?
            .ok_or_else(|| order_not_found(order_id))
    }

    /// Remove one item; deletes the order when it was the last one
    ///
    /// The store decides under the order's lock whether any item is left.
    pub async fn delete_one_cart_item(
        &self,
        caller: &AuthUser,
        order_id: Uuid,
        cart_item_id: Uuid,
    ) -> AppResult<DeleteOutcome> {
        self.load_for(caller, order_id).await?;

        let outcome = self
            .orders
            .remove_item(order_id, cart_item_id)
            .await?
            .ok_or_else(|| item_not_in_order(cart_item_id, order_id))?;

        if let DeleteOutcome::OrderDeleted { .. } = outcome {
            info!(order_id = %order_id, "Last cart item removed, order deleted");
        }
        Ok(outcome)
    }

    /// Empty the cart, which removes the order
    pub async fn delete_all_cart_items(
        &self,
        caller: &AuthUser,
        order_id: Uuid,
    ) -> AppResult<OrderDetail> {
        self.load_for(caller, order_id).await?;
        info!(order_id = %order_id, "Deleting all cart items");

        self.orders
            .delete(order_id)
            .await?
            .ok_or_else(|| order_not_found(order_id))
    }

    pub async fn delete_order(&self, caller: &AuthUser, id: Uuid) -> AppResult<OrderDetail> {
        self.load_for(caller, id).await?;
        info!(order_id = %id, "Deleting order");

        self.orders
            .delete(id)
            .await?
            .ok_or_else(|| order_not_found(id))
    }

    /// Delete every order of `user_id`; succeeds when there are none.
    ///
    /// An unknown user is reported as UNAUTHORIZED with the credential error
    /// message, matching what the auth service answers for the same user.
    pub async fn delete_orders_by_user(&self, caller: &AuthUser, user_id: Uuid) -> AppResult<u64> {
        caller.require_self_or_staff(user_id)?;

        if self.orders.find_user(user_id).await?.is_none() {
            warn!(user_id = %user_id, "Bulk order deletion for unknown user");
            return Err(AppError::Unauthorized("Invalid credentials!".to_string()));
        }

        let removed = self.orders.delete_by_user(user_id).await?;
        info!(user_id = %user_id, removed, "Deleted orders of user");
        Ok(removed)
    }

    pub async fn ship_order(&self, caller: &AuthUser, id: Uuid) -> AppResult<OrderDetail> {
        caller.require_any(&[Role::Admin, Role::Staff])?;
        self.transition(id, |order| order.ship(Utc::now())).await
    }

    pub async fn deliver_order(&self, caller: &AuthUser, id: Uuid) -> AppResult<OrderDetail> {
        caller.require_any(&[Role::Admin, Role::Staff])?;
        self.transition(id, |order| order.deliver(Utc::now())).await
    }

    async fn transition(
        &self,
        id: Uuid,
        step: impl FnOnce(&mut Order) -> Result<(), TransitionError>,
    ) -> AppResult<OrderDetail> {
        let detail = self.load(id).await?;
        let mut order = detail.order;

        if let Err(err) = step(&mut order) {
            warn!(order_id = %id, status = %order.status, "Rejected transition: {}", err);
            return Err(err.into());
        }

        info!(order_id = %id, status = %order.status, "Order status changed");
        let updated = self
            .orders
            .update(&order)
            .await?
            .ok_or_else(|| order_not_found(id))?;

        Ok(OrderDetail::new(updated, detail.cart_items, detail.user))
    }

    pub async fn get_order(&self, caller: &AuthUser, id: Uuid) -> AppResult<OrderDetail> {
        self.load_for(caller, id).await
    }

    pub async fn list_orders(&self, caller: &AuthUser) -> AppResult<Vec<OrderDetail>> {
        caller.require_any(&[Role::Admin, Role::Staff])?;
        Ok(self.orders.list().await?)
    }

    pub async fn list_orders_by_user(
        &self,
        caller: &AuthUser,
        user_id: Uuid,
    ) -> AppResult<Vec<OrderDetail>> {
        caller.require_self_or_staff(user_id)?;
        Ok(self.orders.list_by_user(user_id).await?)
    }

    /// Update the payment reference; status and totals have their own paths
    pub async fn edit_order(
        &self,
        caller: &AuthUser,
        id: Uuid,
        req: EditOrderRequest,
    ) -> AppResult<OrderDetail> {
        let detail = self.load_for(caller, id).await?;

        let mut order = detail.order;
        order.payment_id = req.payment_id;

        let updated = self
            .orders
            .update(&order)
            .await?
            .ok_or_else(|| order_not_found(id))?;

        Ok(OrderDetail::new(updated, detail.cart_items, detail.user))
    }

    /// Add a new item to an existing order
    pub(crate) async fn attach_cart_item(
        &self,
        caller: &AuthUser,
        order_id: Uuid,
        item: CartItem,
    ) -> AppResult<CartItem> {
        self.load_for(caller, order_id).await?;

        let item_id = item.id;
        let detail = self
            .orders
            .attach_item(order_id, &item)
            .await?
            .ok_or_else(|| order_not_found(order_id))?;

        detail
            .cart_items
            .into_iter()
            .find(|candidate| candidate.id == item_id)
            .ok_or_else(|| item_not_in_order(item_id, order_id))
    }

    /// Persist an edited item of an order together with the new totals
    pub(crate) async fn update_cart_item(
        &self,
        caller: &AuthUser,
        order_id: Uuid,
        item: CartItem,
    ) -> AppResult<CartItem> {
        let item_id = item.id;
        let detail = self.edit_all_cart_items(caller, order_id, vec![item]).await?;
        detail
            .cart_items
            .into_iter()
            .find(|candidate| candidate.id == item_id)
            .ok_or_else(|| item_not_in_order(item_id, order_id))
    }
}
