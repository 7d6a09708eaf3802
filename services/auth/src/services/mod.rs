//! Business logic of the auth service
//!
//! Each service is built once at startup over a shared [`UserStore`]
//! (`crate::repositories::UserStore`) and cloned into the router state.

pub mod credentials;
pub mod profile;
pub mod roles;

pub use credentials::CredentialService;
pub use profile::ProfileService;
pub use roles::RoleService;

#[cfg(test)]
pub(crate) mod testing {
    use common::jwt::{JwtConfig, JwtService};
    use common::models::{Gender, Role};
    use std::sync::Arc;

    use crate::models::SignupRequest;
    use crate::password::test_password_service;
    use crate::repositories::{UserStore, memory::InMemoryUserStore};

    use super::CredentialService;

    pub fn jwt() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            token_expiry: 3600,
        })
    }

    pub fn credentials(store: &Arc<InMemoryUserStore>) -> CredentialService {
        let users: Arc<dyn UserStore> = store.clone();
        CredentialService::new(users, test_password_service(), jwt())
    }

    pub fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Alfred".to_string(),
            email: email.to_string(),
            phone: "0800".to_string(),
            image: None,
            address: Some("1 Main St".to_string()),
            gender: Gender::Male,
            password: "pizza123".to_string(),
            confirm_password: "pizza123".to_string(),
        }
    }

    /// Register a user and give them `role`
    pub async fn seed_user(store: &Arc<InMemoryUserStore>, email: &str, role: Role) -> uuid::Uuid {
        let created = credentials(store)
            .signup(signup_request(email))
            .await
            .expect("signup succeeds");
        store
            .update_role(created.id, role)
            .await
            .expect("store available");
        created.id
    }
}
