//! Cart items
//!
//! Items attached to an order are changed through [`OrderService`] so the
//! order's totals follow, and only the order's owner or staff may see them.
//! Loose items belong to no customer and are managed by admin and staff.

use common::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::Role,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::OrderService;
use crate::{
    models::{CartItem, CartItemInput, CartItemPatch},
    repositories::CartItemStore,
};

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("CartItem with id {} is not found!", id))
}

fn require_staff(caller: &AuthUser) -> AppResult<()> {
    caller.require_any(&[Role::Admin, Role::Staff])
}

#[derive(Clone)]
pub struct CartService {
    items: Arc<dyn CartItemStore>,
    orders: OrderService,
}

impl CartService {
    pub fn new(items: Arc<dyn CartItemStore>, orders: OrderService) -> Self {
        Self { items, orders }
    }

    async fn find(&self, id: Uuid) -> AppResult<CartItem> {
        self.items.find(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn create_cart_item(
        &self,
        caller: &AuthUser,
        input: CartItemInput,
    ) -> AppResult<CartItem> {
        let item = CartItem::from(input);
        info!(cart_item_id = %item.id, order_id = ?item.order_id, "Creating cart item");

        match item.order_id {
            Some(order_id) => self.orders.attach_cart_item(caller, order_id, item).await,
            None => {
                require_staff(caller)?;
                Ok(self.items.create(&item).await?)
            }
        }
    }

    pub async fn edit_cart_item(
        &self,
        caller: &AuthUser,
        id: Uuid,
        patch: CartItemPatch,
    ) -> AppResult<CartItem> {
        let mut item = self.find(id).await?;
        item.apply(patch);

        match item.order_id {
            Some(order_id) => self.orders.update_cart_item(caller, order_id, item).await,
            None => {
                require_staff(caller)?;
                self.items.update(&item).await?.ok_or_else(|| not_found(id))
            }
        }
    }

    /// Delete an item; removing the last item of an order removes the order
    pub async fn delete_cart_item(&self, caller: &AuthUser, id: Uuid) -> AppResult<CartItem> {
        let item = self.find(id).await?;

        match item.order_id {
            Some(order_id) => {
                self.orders
                    .delete_one_cart_item(caller, order_id, id)
                    .await?;
                Ok(item)
            }
            None => {
                require_staff(caller)?;
                self.items.delete(id).await?.ok_or_else(|| not_found(id))
            }
        }
    }

    pub async fn get_cart_item(&self, caller: &AuthUser, id: Uuid) -> AppResult<CartItem> {
        let item = self.find(id).await?;

        match item.order_id {
            Some(order_id) => {
                self.orders.load_for(caller, order_id).await?;
            }
            None => require_staff(caller)?,
        }
        Ok(item)
    }

    /// Every stored item across all orders
    pub async fn list_cart_items(&self, caller: &AuthUser) -> AppResult<Vec<CartItem>> {
        require_staff(caller)?;
        Ok(self.items.list().await?)
    }
}
