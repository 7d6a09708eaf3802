//! Payment bridge

use common::error::{AppError, AppResult};
use std::sync::Arc;
use tracing::info;

use crate::{
    models::{PaymentIntent, PaymentIntentRequest},
    stripe::PaymentGateway,
};

#[derive(Clone)]
pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    /// Create an intent for `amount` cents; no retry on failure
    pub async fn create_payment_intent(&self, req: PaymentIntentRequest) -> AppResult<PaymentIntent> {
        if req.amount <= 0 {
            return Err(AppError::Validation(
                "Amount must be greater than zero!".to_string(),
            ));
        }

        let intent = self
            .gateway
            .create_payment_intent(req.amount, &req.description)
            .await?;
        info!(intent_id = %intent.id, "Payment intent created");

        Ok(intent)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::models::PaymentIntent;
    use crate::stripe::{PaymentError, PaymentGateway};

    /// Gateway that records calls and answers from memory
    #[derive(Default)]
    pub struct FakeGateway {
        pub calls: Mutex<Vec<(i64, String)>>,
        pub reject: bool,
    }

    #[async_trait]
    impl PaymentGateway for FakeGateway {
        async fn create_payment_intent(
            &self,
            amount: i64,
            description: &str,
        ) -> Result<PaymentIntent, PaymentError> {
            self.calls
                .lock()
                .expect("fake gateway lock")
                .push((amount, description.to_string()));

            if self.reject {
                return Err(PaymentError::Rejected {
                    status: 402,
                    message: "Your card was declined.".to_string(),
                });
            }

            Ok(PaymentIntent {
                id: "pi_test".to_string(),
                description: Some(description.to_string()),
                client_secret: Some("pi_test_secret".to_string()),
            })
        }
    }
}
