//! Common library for the pizza shop services
//!
//! This crate provides shared functionality used by the auth and api
//! services: database connectivity and migrations, the error taxonomy and its
//! HTTP mapping, token issuing and verification, the shared user model and
//! payload validation.

pub mod config;
pub mod database;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod telemetry;
pub mod validation;
