//! Credential payloads and the records handed to the user store
//!
//! Payloads carrying a plaintext password deliberately do not derive `Debug`
//! so they cannot end up in a log line.

use common::models::{Gender, Role, UserResponse};
use serde::{Deserialize, Serialize};

/// Signup form
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub image: Option<String>,
    pub address: Option<String>,
    pub gender: Gender,
    pub password: String,
    pub confirm_password: String,
}

/// Login credentials
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Profile edit form; `password` proves ownership and is not changed
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub image: Option<String>,
    pub address: Option<String>,
    pub gender: Gender,
    pub password: String,
}

/// Role change issued by an admin
#[derive(Debug, Clone, Deserialize)]
pub struct RoleChangeRequest {
    pub email: String,
    pub role: Role,
}

/// Successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub is_logged_in: bool,
    pub is_admin: bool,
}

/// User record ready to be inserted, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub image: Option<String>,
    pub address: Option<String>,
    pub gender: Gender,
    pub role: Role,
    pub password_hash: String,
}

/// Editable profile fields
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileChanges {
    pub name: String,
    pub phone: String,
    pub image: Option<String>,
    pub address: Option<String>,
    pub gender: Gender,
}

impl From<&EditProfileRequest> for ProfileChanges {
    fn from(req: &EditProfileRequest) -> Self {
        Self {
            name: req.name.clone(),
            phone: req.phone.clone(),
            image: req.image.clone(),
            address: req.address.clone(),
            gender: req.gender,
        }
    }
}
