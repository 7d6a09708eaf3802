//! API service routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use common::{
    error::AppResult,
    middleware::{AuthUser, auth_middleware},
    validation::ValidatedJson,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{
    models::{
        CartItem, CartItemInput, CartItemPatch, CreateOrderRequest, DeleteOutcome,
        EditCartItemsRequest, EditOrderRequest, OrderDetail, PaymentIntent, PaymentIntentRequest,
        Pizza, PizzaInput, PizzaPatch,
    },
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/pizzas", get(list_pizzas).post(create_pizza))
        .route(
            "/pizzas/:id",
            get(get_pizza).put(edit_pizza).delete(delete_pizza),
        )
        .route("/cart-items", get(list_cart_items).post(create_cart_item))
        .route(
            "/cart-items/:id",
            get(get_cart_item)
                .put(edit_cart_item)
                .delete(delete_cart_item),
        )
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/:id",
            get(get_order).patch(edit_order).delete(delete_order),
        )
        .route(
            "/orders/:id/cart-items",
            put(edit_all_cart_items).delete(delete_all_cart_items),
        )
        .route(
            "/orders/:id/cart-items/:cart_item_id",
            delete(delete_one_cart_item),
        )
        .route("/orders/:id/ship", patch(ship_order))
        .route("/orders/:id/deliver", patch(deliver_order))
        .route(
            "/users/:user_id/orders",
            get(list_orders_by_user).delete(delete_orders_by_user),
        )
        .route("/payments/intents", post(create_payment_intent))
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

async fn list_pizzas(State(state): State<AppState>) -> AppResult<Json<Vec<Pizza>>> {
    Ok(Json(state.catalog.list_pizzas().await?))
}

async fn get_pizza(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Pizza>> {
    Ok(Json(state.catalog.get_pizza(id).await?))
}

async fn create_pizza(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidatedJson(payload): ValidatedJson<PizzaInput>,
) -> AppResult<(StatusCode, Json<Pizza>)> {
    let pizza = state.catalog.create_pizza(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(pizza)))
}

async fn edit_pizza(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PizzaPatch>,
) -> AppResult<Json<Pizza>> {
    Ok(Json(state.catalog.edit_pizza(&caller, id, payload).await?))
}

async fn delete_pizza(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Pizza>> {
    Ok(Json(state.catalog.delete_pizza(&caller, id).await?))
}

async fn list_cart_items(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<CartItem>>> {
    Ok(Json(state.cart.list_cart_items(&caller).await?))
}

async fn get_cart_item(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CartItem>> {
    Ok(Json(state.cart.get_cart_item(&caller, id).await?))
}

async fn create_cart_item(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidatedJson(payload): ValidatedJson<CartItemInput>,
) -> AppResult<(StatusCode, Json<CartItem>)> {
    let item = state.cart.create_cart_item(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn edit_cart_item(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CartItemPatch>,
) -> AppResult<Json<CartItem>> {
    Ok(Json(state.cart.edit_cart_item(&caller, id, payload).await?))
}

async fn delete_cart_item(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CartItem>> {
    Ok(Json(state.cart.delete_cart_item(&caller, id).await?))
}

async fn list_orders(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<OrderDetail>>> {
    Ok(Json(state.orders.list_orders(&caller).await?))
}

async fn create_order(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderDetail>)> {
    let order = state.orders.create_order(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    Ok(Json(state.orders.get_order(&caller, id).await?))
}

async fn edit_order(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<EditOrderRequest>,
) -> AppResult<Json<OrderDetail>> {
    Ok(Json(state.orders.edit_order(&caller, id, payload).await?))
}

async fn delete_order(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    Ok(Json(state.orders.delete_order(&caller, id).await?))
}

async fn edit_all_cart_items(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<EditCartItemsRequest>,
) -> AppResult<Json<OrderDetail>> {
    let order = state
        .orders
        .edit_all_cart_items(&caller, id, payload.cart_items)
        .await?;
    Ok(Json(order))
}

async fn delete_all_cart_items(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    Ok(Json(state.orders.delete_all_cart_items(&caller, id).await?))
}

async fn delete_one_cart_item(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((id, cart_item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Response> {
    let outcome = state
        .orders
        .delete_one_cart_item(&caller, id, cart_item_id)
        .await?;

    Ok(match outcome {
        DeleteOutcome::Updated(order) => Json(order).into_response(),
        DeleteOutcome::OrderDeleted { order_id } => Json(json!({
            "message": "Order is successfully deleted!",
            "orderId": order_id,
        }))
        .into_response(),
    })
}

async fn ship_order(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    Ok(Json(state.orders.ship_order(&caller, id).await?))
}

async fn deliver_order(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    Ok(Json(state.orders.deliver_order(&caller, id).await?))
}

async fn list_orders_by_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<OrderDetail>>> {
    Ok(Json(state.orders.list_orders_by_user(&caller, user_id).await?))
}

async fn delete_orders_by_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let removed = state.orders.delete_orders_by_user(&caller, user_id).await?;
    Ok(Json(json!({
        "message": "All Orders associated with this customer have been deleted successfully!",
        "deleted": removed,
    })))
}

async fn create_payment_intent(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PaymentIntentRequest>,
) -> AppResult<Json<PaymentIntent>> {
    Ok(Json(state.payments.create_payment_intent(payload).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::MemoryStore;
    use crate::services::payments::fake::FakeGateway;
    use crate::services::testing::user;
    use crate::state::Stores;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use common::jwt::{JwtConfig, JwtService};
    use common::models::{Role, User};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        jwt: JwtService,
        customer: User,
        staff: User,
    }

    fn test_app() -> TestApp {
        let store = Arc::new(MemoryStore::new());
        let customer = user(Role::User);
        let staff = user(Role::Staff);
        store.add_user(customer.clone());
        store.add_user(staff.clone());

        let jwt = JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            token_expiry: 3600,
        });
        let stores = Stores {
            pizzas: store.clone(),
            cart_items: store.clone(),
            orders: store,
        };
        let state = AppState::new(stores, Arc::new(FakeGateway::default()), jwt.clone());

        TestApp {
            router: create_router(state),
            jwt,
            customer,
            staff,
        }
    }

    fn request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token));

        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_token() {
        let response = test_app()
            .router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_missing_and_forged_tokens() {
        let app = test_app();

        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/pizzas").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .router
            .oneshot(request("GET", "/pizzas", "not-a-token", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn order_lifecycle_over_http() {
        let app = test_app();
        let customer = app.jwt.generate_token(&app.customer).unwrap();
        let staff = app.jwt.generate_token(&app.staff).unwrap();

        let response = app
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/orders",
                &customer,
                Some(serde_json::json!({
                    "paymentId": "pi_123",
                    "cartItems": [
                        { "name": "Margherita", "price": 10, "quantity": 2, "pizzaId": Uuid::new_v4() },
                        { "name": "Pepperoni", "price": 5, "quantity": 1, "pizzaId": Uuid::new_v4() }
                    ]
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let order = body_json(response).await;
        assert_eq!(order["totalQuantity"], 3);
        assert_eq!(order["isPending"], true);
        let order_id = order["id"].as_str().unwrap().to_string();

        let response = app
            .router
            .clone()
            .oneshot(request(
                "PATCH",
                &format!("/orders/{}/deliver", order_id),
                &staff,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .router
            .clone()
            .oneshot(request(
                "PATCH",
                &format!("/orders/{}/ship", order_id),
                &customer,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .router
            .clone()
            .oneshot(request(
                "PATCH",
                &format!("/orders/{}/ship", order_id),
                &staff,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "Shipped");

        let response = app
            .router
            .oneshot(request(
                "DELETE",
                &format!("/users/{}/orders", app.customer.id),
                &customer,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["deleted"], 1);
    }

    #[tokio::test]
    async fn cart_item_listing_requires_staff() {
        let app = test_app();
        let customer = app.jwt.generate_token(&app.customer).unwrap();
        let staff = app.jwt.generate_token(&app.staff).unwrap();

        let response = app
            .router
            .clone()
            .oneshot(request("GET", "/cart-items", &customer, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .router
            .oneshot(request("GET", "/cart-items", &staff, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn sub_cent_prices_are_rejected() {
        let app = test_app();
        let token = app.jwt.generate_token(&app.customer).unwrap();

        let response = app
            .router
            .oneshot(request(
                "POST",
                "/orders",
                &token,
                Some(serde_json::json!({
                    "cartItems": [
                        { "name": "Margherita", "price": "0.005", "quantity": 2, "pizzaId": Uuid::new_v4() }
                    ]
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["fields"][0]["field"], "cartItems[0].price");
    }

    #[tokio::test]
    async fn empty_order_is_a_validation_error() {
        let app = test_app();
        let token = app.jwt.generate_token(&app.customer).unwrap();

        let response = app
            .router
            .oneshot(request(
                "POST",
                "/orders",
                &token,
                Some(serde_json::json!({ "cartItems": [] })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "An order must contain at least one cart item!");
    }

    #[tokio::test]
    async fn payment_intent_returns_client_secret() {
        let app = test_app();
        let token = app.jwt.generate_token(&app.customer).unwrap();

        let response = app
            .router
            .oneshot(request(
                "POST",
                "/payments/intents",
                &token,
                Some(serde_json::json!({ "amount": 2500, "description": "2 pizzas" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["clientSecret"], "pi_test_secret");
        assert_eq!(body["id"], "pi_test");
    }
}
