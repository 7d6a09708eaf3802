//! Application state shared across handlers

use common::jwt::JwtService;
use std::sync::Arc;

use crate::{
    password::PasswordService,
    repositories::UserStore,
    services::{CredentialService, ProfileService, RoleService},
};

#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialService,
    pub profiles: ProfileService,
    pub roles: RoleService,
    pub jwt: JwtService,
}

impl AppState {
    /// Wire every service over one user store
    pub fn new(users: Arc<dyn UserStore>, passwords: PasswordService, jwt: JwtService) -> Self {
        Self {
            credentials: CredentialService::new(users.clone(), passwords, jwt.clone()),
            profiles: ProfileService::new(users.clone()),
            roles: RoleService::new(users),
            jwt,
        }
    }
}
