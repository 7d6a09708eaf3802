//! Signup, login and self-service credential changes

use common::{
    error::{AppError, AppResult},
    jwt::JwtService,
    models::{Role, User, UserResponse},
};
use std::sync::Arc;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::{
    models::{
        AuthResponse, ChangePasswordRequest, EditProfileRequest, LoginRequest, NewUser,
        ProfileChanges, SignupRequest,
    },
    password::PasswordService,
    repositories::UserStore,
};

const PASSWORD_MISMATCH: &str = "Password must match!";
const INVALID_CREDENTIALS: &str = "Invalid credentials!";

/// Confirmation fields match when they are equal in NFC
fn passwords_match(password: &str, confirmation: &str) -> bool {
    password.nfc().eq(confirmation.nfc())
}

#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserStore>,
    passwords: PasswordService,
    jwt: JwtService,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>, passwords: PasswordService, jwt: JwtService) -> Self {
        Self {
            users,
            passwords,
            jwt,
        }
    }

    /// Register a new user with the `User` role
    pub async fn signup(&self, req: SignupRequest) -> AppResult<UserResponse> {
        info!(email = %req.email, "Signup");

        if !passwords_match(&req.password, &req.confirm_password) {
            return Err(AppError::Validation(PASSWORD_MISMATCH.to_string()));
        }

        if self.users.find_by_email(&req.email).await?.is_some() {
            warn!(email = %req.email, "Signup with a registered email");
            return Err(AppError::Conflict("User already exists!".to_string()));
        }

        let password_hash = self.passwords.hash(&req.password).await?;
        let user = self
            .users
            .create(&NewUser {
                name: req.name,
                email: req.email,
                phone: req.phone,
                image: req.image,
                address: req.address,
                gender: req.gender,
                role: Role::User,
                password_hash,
            })
            .await?;

        Ok(UserResponse::from(&user))
    }

    /// Check credentials and issue a session token
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        info!(email = %req.email, "Login");

        let user = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_CREDENTIALS.to_string()))?;

        self.check_password(&user, &req.password).await?;

        let token = self.jwt.generate_token(&user)?;

        Ok(AuthResponse {
            user: UserResponse::without_role(&user),
            token,
            is_logged_in: true,
            is_admin: user.is_admin(),
        })
    }

    pub async fn change_password(&self, req: ChangePasswordRequest) -> AppResult<UserResponse> {
        info!(email = %req.email, "Change password");

        if !passwords_match(&req.new_password, &req.confirm_password) {
            return Err(AppError::Validation(PASSWORD_MISMATCH.to_string()));
        }

        let user = self.existing_user(&req.email).await?;
        self.check_password(&user, &req.old_password).await?;

        let password_hash = self.passwords.hash(&req.new_password).await?;
        let updated = self
            .users
            .update_password(user.id, &password_hash)
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_CREDENTIALS.to_string()))?;

        Ok(UserResponse::without_role(&updated))
    }

    /// Update everything but the password, which must be supplied to prove ownership
    pub async fn edit_profile(&self, req: EditProfileRequest) -> AppResult<UserResponse> {
        info!(email = %req.email, "Edit profile");

        let user = self.existing_user(&req.email).await?;
        self.check_password(&user, &req.password).await?;

        let updated = self
            .users
            .update_profile(user.id, &ProfileChanges::from(&req))
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_CREDENTIALS.to_string()))?;

        Ok(UserResponse::without_role(&updated))
    }

    async fn existing_user(&self, email: &str) -> AppResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_CREDENTIALS.to_string()))
    }

    async fn check_password(&self, user: &User, password: &str) -> AppResult<()> {
        if self.passwords.verify(password, &user.password_hash).await? {
            Ok(())
        } else {
            warn!(user_id = %user.id, "Password mismatch");
            Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
    }
}
