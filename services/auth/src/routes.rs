//! Authentication service routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use common::{
    error::AppResult,
    middleware::{AuthUser, auth_middleware},
    models::UserResponse,
    validation::ValidatedJson,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{
    models::{
        AuthResponse, ChangePasswordRequest, EditProfileRequest, LoginRequest, RoleChangeRequest,
        SignupRequest,
    },
    state::AppState,
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(current_user))
        .route("/auth/role", patch(update_role))
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/change-password", patch(change_password))
        .route("/auth/edit-profile", patch(edit_profile))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.credentials.signup(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(state.credentials.login(payload).await?))
}

async fn change_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(state.credentials.change_password(payload).await?))
}

async fn edit_profile(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EditProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(state.credentials.edit_profile(payload).await?))
}

async fn current_user(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(state.profiles.current_user(&caller).await?))
}

async fn update_role(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidatedJson(payload): ValidatedJson<RoleChangeRequest>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(state.roles.update_user_role(&caller, payload).await?))
}

async fn list_users(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<UserResponse>>> {
    Ok(Json(state.profiles.list_users(&caller).await?))
}

async fn get_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(state.profiles.get_user_by_id(&caller, id).await?))
}

async fn delete_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(state.profiles.delete_user_by_id(&caller, id).await?))
}
