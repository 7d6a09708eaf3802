//! Schema checks for the credential payloads
//!
//! These only check shape: required fields and email format. Rules that
//! depend on stored state, or that carry a domain error kind such as the
//! confirmation password match, live in the services.

use common::validation::{Validate, ValidationErrors};

use crate::models::{
    ChangePasswordRequest, EditProfileRequest, LoginRequest, RoleChangeRequest, SignupRequest,
};

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors.require_email("email", &self.email);
        errors.require("phone", &self.phone);
        errors.require("password", &self.password);
        errors.require("confirmPassword", &self.confirm_password);
        errors.finish()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_email("email", &self.email);
        errors.require("password", &self.password);
        errors.finish()
    }
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_email("email", &self.email);
        errors.require("oldPassword", &self.old_password);
        errors.require("newPassword", &self.new_password);
        errors.require("confirmPassword", &self.confirm_password);
        errors.finish()
    }
}

impl Validate for EditProfileRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors.require_email("email", &self.email);
        errors.require("phone", &self.phone);
        errors.require("password", &self.password);
        errors.finish()
    }
}

impl Validate for RoleChangeRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_email("email", &self.email);
        errors.finish()
    }
}
