//! Authentication service models

pub mod user;

pub use user::{
    AuthResponse, ChangePasswordRequest, EditProfileRequest, LoginRequest, NewUser,
    ProfileChanges, RoleChangeRequest, SignupRequest,
};
