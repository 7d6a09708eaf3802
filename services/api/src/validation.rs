//! Schema checks for api payloads

use common::validation::{Validate, ValidationErrors};
use rust_decimal::Decimal;

use crate::models::{
    CartItem, CartItemInput, CartItemPatch, CreateOrderRequest, EditCartItemsRequest,
    EditOrderRequest, PaymentIntentRequest, PizzaInput, PizzaPatch,
};

/// Prices are stored as `NUMERIC(12, 2)`
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: i64 = 10_000_000_000;

fn check_price(errors: &mut ValidationErrors, field: &str, price: Decimal) {
    if price.is_sign_negative() {
        errors.add(field, format!("{} must not be negative", field));
    } else if price.normalize().scale() > PRICE_SCALE {
        errors.add(
            field,
            format!("{} must not have more than {} decimal places", field, PRICE_SCALE),
        );
    } else if price >= Decimal::from(PRICE_LIMIT) {
        errors.add(field, format!("{} must be less than {}", field, PRICE_LIMIT));
    }
}

fn check_quantity(errors: &mut ValidationErrors, field: &str, quantity: i32) {
    if quantity <= 0 {
        errors.add(field, format!("{} must be at least 1", field));
    }
}

fn check_optional(errors: &mut ValidationErrors, field: &str, value: Option<&String>) {
    if let Some(value) = value {
        errors.require(field, value);
    }
}

impl Validate for PizzaInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors.require("topping", &self.topping);
        errors.require("image", &self.image);
        errors.require("description", &self.description);
        check_price(&mut errors, "price", self.price);
        if self.quantity < 0 {
            errors.add("quantity", "quantity must not be negative");
        }
        errors.finish()
    }
}

impl Validate for PizzaPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_optional(&mut errors, "name", self.name.as_ref());
        check_optional(&mut errors, "topping", self.topping.as_ref());
        check_optional(&mut errors, "image", self.image.as_ref());
        check_optional(&mut errors, "description", self.description.as_ref());
        if let Some(price) = self.price {
            check_price(&mut errors, "price", price);
        }
        if self.quantity.is_some_and(|quantity| quantity < 0) {
            errors.add("quantity", "quantity must not be negative");
        }
        errors.finish()
    }
}

impl Validate for CartItemInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        check_price(&mut errors, "price", self.price);
        check_quantity(&mut errors, "quantity", self.quantity);
        errors.finish()
    }
}

impl Validate for CartItemPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_optional(&mut errors, "name", self.name.as_ref());
        if let Some(price) = self.price {
            check_price(&mut errors, "price", price);
        }
        if let Some(quantity) = self.quantity {
            check_quantity(&mut errors, "quantity", quantity);
        }
        errors.finish()
    }
}

fn check_items<'a>(
    errors: &mut ValidationErrors,
    items: impl Iterator<Item = (&'a str, Decimal, i32)>,
) {
    for (index, (name, price, quantity)) in items.enumerate() {
        errors.require(&format!("cartItems[{}].name", index), name);
        check_price(errors, &format!("cartItems[{}].price", index), price);
        check_quantity(errors, &format!("cartItems[{}].quantity", index), quantity);
    }
}

/// An empty item list is a business rule violation reported by the service
impl Validate for CreateOrderRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_items(
            &mut errors,
            self.cart_items
                .iter()
                .map(|item| (item.name.as_str(), item.price, item.quantity)),
        );
        errors.finish()
    }
}

impl Validate for EditCartItemsRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_items(
            &mut errors,
            self.cart_items
                .iter()
                .map(|item: &CartItem| (item.name.as_str(), item.price, item.quantity)),
        );
        errors.finish()
    }
}

impl Validate for EditOrderRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_optional(&mut errors, "paymentId", self.payment_id.as_ref());
        errors.finish()
    }
}

/// The amount is checked by the payment service
impl Validate for PaymentIntentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("description", &self.description);
        errors.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewOrderItem;
    use uuid::Uuid;

    #[test]
    fn pizza_needs_every_text_field() {
        let input = PizzaInput {
            name: "Margherita".to_string(),
            topping: String::new(),
            price: Decimal::new(-100, 2),
            quantity: 1,
            image: "m.png".to_string(),
            description: "Classic".to_string(),
            user_id: None,
        };

        let errors = input.validate().unwrap_err();
        let fields: Vec<&str> = errors.fields().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["topping", "price"]);
    }

    fn cart_item(price: Decimal) -> CartItemInput {
        CartItemInput {
            name: "Margherita".to_string(),
            price,
            quantity: 2,
            pizza_id: Uuid::new_v4(),
            order_id: None,
        }
    }

    #[test]
    fn prices_must_fit_two_decimal_places() {
        assert!(cart_item(Decimal::new(1999, 2)).validate().is_ok());
        assert!(cart_item(Decimal::new(10000, 3)).validate().is_ok());

        let errors = cart_item(Decimal::new(5, 3)).validate().unwrap_err();
        assert_eq!(errors.fields()[0].field, "price");
        assert_eq!(
            errors.fields()[0].message,
            "price must not have more than 2 decimal places"
        );
    }

    #[test]
    fn prices_are_bounded_by_the_column() {
        assert!(cart_item(Decimal::new(999_999_999_999, 2)).validate().is_ok());
        assert!(cart_item(Decimal::from(PRICE_LIMIT)).validate().is_err());

        let huge: Decimal = "79228162514264337593543950335".parse().unwrap();
        let errors = cart_item(huge).validate().unwrap_err();
        assert_eq!(errors.fields()[0].message, "price must be less than 10000000000");

        let patch = CartItemPatch {
            price: Some(huge),
            ..CartItemPatch::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(PizzaPatch::default().validate().is_ok());
        assert!(CartItemPatch::default().validate().is_ok());
    }

    #[test]
    fn order_items_are_checked_by_position() {
        let req = CreateOrderRequest {
            user_id: None,
            payment_id: None,
            cart_items: vec![
                NewOrderItem {
                    name: "Margherita".to_string(),
                    price: Decimal::from(10),
                    quantity: 1,
                    pizza_id: Uuid::new_v4(),
                },
                NewOrderItem {
                    name: "Pepperoni".to_string(),
                    price: Decimal::from(5),
                    quantity: 0,
                    pizza_id: Uuid::new_v4(),
                },
            ],
        };

        let errors = req.validate().unwrap_err();
        assert_eq!(errors.fields()[0].field, "cartItems[1].quantity");
    }

    #[test]
    fn empty_order_passes_schema_check() {
        let req = CreateOrderRequest {
            user_id: None,
            payment_id: None,
            cart_items: vec![],
        };
        assert!(req.validate().is_ok());
    }
}
