//! Middleware for JWT token validation and authentication

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    jwt::{Claims, JwtService},
    models::Role,
};

/// Authenticated caller, taken from a verified token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with FORBIDDEN unless the caller holds one of `roles`
    pub fn require_any(&self, roles: &[Role]) -> AppResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You are not permitted to perform this task!".to_string(),
            ))
        }
    }

    /// Allow the user acting on their own records, or admin/staff
    pub fn require_self_or_staff(&self, user_id: Uuid) -> AppResult<()> {
        if self.id == user_id {
            Ok(())
        } else {
            self.require_any(&[Role::Admin, Role::Staff])
        }
    }
}

/// Verify the bearer token and attach the caller to the request
pub async fn auth_middleware(
    State(jwt): State<JwtService>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = jwt.validate_token(bearer.token()).map_err(|e| {
        warn!("Rejected token: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
