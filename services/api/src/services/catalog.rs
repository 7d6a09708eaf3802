//! Pizza catalog

use chrono::Utc;
use common::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::Role,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{Pizza, PizzaInput, PizzaPatch},
    repositories::PizzaStore,
};

const EDITORS: &[Role] = &[Role::Admin, Role::Staff];

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Pizza with id {} is not found!", id))
}

#[derive(Clone)]
pub struct CatalogService {
    pizzas: Arc<dyn PizzaStore>,
}

impl CatalogService {
    pub fn new(pizzas: Arc<dyn PizzaStore>) -> Self {
        Self { pizzas }
    }

    pub async fn create_pizza(&self, caller: &AuthUser, input: PizzaInput) -> AppResult<Pizza> {
        caller.require_any(EDITORS)?;

        let input = PizzaInput {
            user_id: input.user_id.or(Some(caller.id)),
            ..input
        };
        let pizza = Pizza::new(input, Utc::now());
        info!(pizza_id = %pizza.id, name = %pizza.name, "Creating pizza");

        Ok(self.pizzas.create(&pizza).await?)
    }

    pub async fn edit_pizza(
        &self,
        caller: &AuthUser,
        id: Uuid,
        patch: PizzaPatch,
    ) -> AppResult<Pizza> {
        caller.require_any(EDITORS)?;

        let mut pizza = self.get_pizza(id).await?;
        pizza.apply(patch, Utc::now());

        self.pizzas
            .update(&pizza)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete_pizza(&self, caller: &AuthUser, id: Uuid) -> AppResult<Pizza> {
        caller.require_any(EDITORS)?;
        info!(pizza_id = %id, "Deleting pizza");

        self.pizzas.delete(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn get_pizza(&self, id: Uuid) -> AppResult<Pizza> {
        self.pizzas.find(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list_pizzas(&self) -> AppResult<Vec<Pizza>> {
        Ok(self.pizzas.list().await?)
    }
}
