//! Order line items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product at a unit price and quantity, optionally attached to an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub pizza_id: Uuid,
    pub order_id: Option<Uuid>,
}

impl CartItem {
    /// Line total, `price * quantity`; `None` if it does not fit a `Decimal`
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub pizza_id: Uuid,
    pub order_id: Option<Uuid>,
}

impl From<CartItemInput> for CartItem {
    fn from(input: CartItemInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            price: input.price,
            quantity: input.quantity,
            pizza_id: input.pizza_id,
            order_id: input.order_id,
        }
    }
}

/// Partial edit; an item cannot be moved to another order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub pizza_id: Option<Uuid>,
}

impl CartItem {
    pub fn apply(&mut self, patch: CartItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(pizza_id) = patch.pizza_id {
            self.pizza_id = pizza_id;
        }
    }
}
