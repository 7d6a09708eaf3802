//! Application state shared across handlers

use common::jwt::JwtService;
use std::sync::Arc;

use crate::{
    repositories::{CartItemStore, OrderStore, PizzaStore},
    services::{CartService, CatalogService, OrderService, PaymentService},
    stripe::PaymentGateway,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub cart: CartService,
    pub orders: OrderService,
    pub payments: PaymentService,
    pub jwt: JwtService,
}

/// Storage backends behind the services
pub struct Stores {
    pub pizzas: Arc<dyn PizzaStore>,
    pub cart_items: Arc<dyn CartItemStore>,
    pub orders: Arc<dyn OrderStore>,
}

impl AppState {
    pub fn new(stores: Stores, gateway: Arc<dyn PaymentGateway>, jwt: JwtService) -> Self {
        let orders = OrderService::new(stores.orders);

        Self {
            catalog: CatalogService::new(stores.pizzas),
            cart: CartService::new(stores.cart_items, orders.clone()),
            orders,
            payments: PaymentService::new(gateway),
            jwt,
        }
    }
}
