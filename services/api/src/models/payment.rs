//! Payment intent payloads

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentRequest {
    /// Amount in US-dollar cents
    pub amount: i64,
    pub description: String,
}

/// Intent created by the gateway; the client secret lets the browser confirm it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub id: String,
    pub description: Option<String>,
    pub client_secret: Option<String>,
}
