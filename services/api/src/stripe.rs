//! Payment gateway client for the Stripe REST API

use async_trait::async_trait;
use common::error::AppError;
use serde::Deserialize;
use std::env;
use thiserror::Error;
use tracing::{error, info};

use crate::models::PaymentIntent;

pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment configuration error: {0}")]
    Configuration(String),

    #[error("Payment gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Payment gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Configuration(msg) => AppError::Internal(msg),
            other => AppError::Gateway(other.to_string()),
        }
    }
}

/// Creates payment intents with an external processor
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// `amount` is in US-dollar cents
    async fn create_payment_intent(
        &self,
        amount: i64,
        description: &str,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Stripe configuration
#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
}

impl StripeConfig {
    /// Create a new StripeConfig from environment variables
    ///
    /// # Environment Variables
    /// - `STRIPE_SECRET_KEY`: Secret API key (required)
    /// - `STRIPE_API_BASE`: API origin (default: https://api.stripe.com)
    pub fn from_env() -> Result<Self, PaymentError> {
        let secret_key = env::var("STRIPE_SECRET_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                PaymentError::Configuration(
                    "STRIPE_SECRET_KEY environment variable not set".to_string(),
                )
            })?;

        let api_base = env::var("STRIPE_API_BASE")
            .unwrap_or_else(|_| DEFAULT_STRIPE_API_BASE.to_string());

        Ok(Self {
            secret_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Deserialize)]
struct StripeIntent {
    id: String,
    description: Option<String>,
    client_secret: Option<String>,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(
        &self,
        amount: i64,
        description: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        info!(amount, "Creating payment intent");

        let amount = amount.to_string();
        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.config.api_base))
            .bearer_auth(&self.config.secret_key)
            .form(&[
                ("amount", amount.as_str()),
                ("currency", "usd"),
                ("description", description),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| "no error message".to_string());
            error!(status = status.as_u16(), "Stripe rejected payment intent: {}", message);
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let intent: StripeIntent = response.json().await?;
        Ok(PaymentIntent {
            id: intent.id,
            description: intent.description,
            client_secret: intent.client_secret,
        })
    }
}
