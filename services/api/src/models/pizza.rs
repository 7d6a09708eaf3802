//! Catalog entries

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pizza {
    pub id: Uuid,
    pub name: String,
    pub topping: String,
    pub price: Decimal,
    /// Units available
    pub quantity: i32,
    pub image: String,
    pub description: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New catalog entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PizzaInput {
    pub name: String,
    pub topping: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image: String,
    pub description: String,
    pub user_id: Option<Uuid>,
}

/// Partial edit; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PizzaPatch {
    pub name: Option<String>,
    pub topping: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl Pizza {
    pub fn new(input: PizzaInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            topping: input.topping,
            price: input.price,
            quantity: input.quantity,
            image: input.image,
            description: input.description,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: PizzaPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(topping) = patch.topping {
            self.topping = topping;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.updated_at = now;
    }
}
