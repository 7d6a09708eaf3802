//! Orders, their status machine and aggregate totals

use chrono::{DateTime, Utc};
use common::models::UserResponse;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use super::CartItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// Rejected status transition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Order must be shipped before delivery, please ship the order!")]
    NotShipped,

    #[error("Order has already been shipped!")]
    AlreadyShipped,

    #[error("Order has already been delivered!")]
    AlreadyDelivered,
}

/// Cached aggregates of an order's items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub total_price: Decimal,
    pub total_quantity: i64,
}

/// The sum over an order's items does not fit its numeric types
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Order total is out of range!")]
pub struct TotalsOverflow;

/// `(Σ price·qty, Σ qty)` over `items`; zero for an empty set
pub fn adjust_totals(items: &[CartItem]) -> Result<Totals, TotalsOverflow> {
    items.iter().try_fold(Totals::default(), |acc, item| {
        let total_price = item
            .subtotal()
            .and_then(|subtotal| acc.total_price.checked_add(subtotal))
            .ok_or(TotalsOverflow)?;
        let total_quantity = acc
            .total_quantity
            .checked_add(i64::from(item.quantity))
            .ok_or(TotalsOverflow)?;

        Ok(Totals {
            total_price,
            total_quantity,
        })
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_id: Option<String>,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub shipping_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub total_price: Decimal,
    pub total_quantity: i64,
}

impl Order {
    /// A pending order placed at `now`, totals not yet computed
    pub fn new(user_id: Uuid, payment_id: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            payment_id,
            order_date: now,
            status: OrderStatus::Pending,
            shipping_date: None,
            delivery_date: None,
            total_price: Decimal::ZERO,
            total_quantity: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn is_shipped(&self) -> bool {
        matches!(self.status, OrderStatus::Shipped | OrderStatus::Delivered)
    }

    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered
    }

    pub fn apply_totals(&mut self, totals: Totals) {
        self.total_price = totals.total_price;
        self.total_quantity = totals.total_quantity;
    }

    /// `Pending -> Shipped`
    pub fn ship(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        match self.status {
            OrderStatus::Pending => {
                self.status = OrderStatus::Shipped;
                self.shipping_date = Some(now);
                Ok(())
            }
            OrderStatus::Shipped => Err(TransitionError::AlreadyShipped),
            OrderStatus::Delivered => Err(TransitionError::AlreadyDelivered),
        }
    }

    /// `Shipped -> Delivered`
    pub fn deliver(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        match self.status {
            OrderStatus::Shipped => {
                self.status = OrderStatus::Delivered;
                self.delivery_date = Some(now);
                Ok(())
            }
            OrderStatus::Pending => Err(TransitionError::NotShipped),
            OrderStatus::Delivered => Err(TransitionError::AlreadyDelivered),
        }
    }
}

/// An order with its items and owner, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub is_pending: bool,
    pub is_shipped: bool,
    pub is_delivered: bool,
    pub cart_items: Vec<CartItem>,
    pub user: Option<UserResponse>,
}

impl OrderDetail {
    pub fn new(order: Order, cart_items: Vec<CartItem>, user: Option<UserResponse>) -> Self {
        Self {
            is_pending: order.is_pending(),
            is_shipped: order.is_shipped(),
            is_delivered: order.is_delivered(),
            order,
            cart_items,
            user,
        }
    }
}

/// Result of removing one item from an order
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// Items remain; the order carries the recomputed totals
    Updated(OrderDetail),
    /// The removed item was the last one, so the order is gone too
    OrderDeleted { order_id: Uuid },
}

impl DeleteOutcome {
    /// The surviving order, if any
    pub fn into_updated(self) -> Option<OrderDetail> {
        match self {
            DeleteOutcome::Updated(detail) => Some(detail),
            DeleteOutcome::OrderDeleted { .. } => None,
        }
    }
}

/// Line item of a new order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub pizza_id: Uuid,
}

/// Checkout payload
///
/// `user_id` defaults to the caller; placing an order for someone else
/// requires staff or admin.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Option<Uuid>,
    pub payment_id: Option<String>,
    pub cart_items: Vec<NewOrderItem>,
}

/// Replacement values for items already on an order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCartItemsRequest {
    pub cart_items: Vec<CartItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOrderRequest {
    pub payment_id: Option<String>,
}
