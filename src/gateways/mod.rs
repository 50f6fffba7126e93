use crate::domain::checkout::PaymentRequest;
use serde::Serialize;
use serde_json::Value;

pub mod eps;
pub mod signing;

/// Structured failure from a gateway call. Serializes as
/// `{"error": ..., "message": ..., "details": ...}`.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{error}: {message}")]
pub struct GatewayError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl GatewayError {
    pub fn request_failed(operation: &str, message: impl Into<String>) -> Self {
        Self {
            error: format!("{}_request_failed", operation),
            message: message.into(),
            details: None,
        }
    }

    pub fn token_missing(token_response: Value) -> Self {
        Self {
            error: "token_missing".to_string(),
            message: "Token generation failed".to_string(),
            details: Some(token_response),
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone)]
pub struct InitializeResponse {
    pub redirect_url: Option<String>,
    pub raw: Value,
}

impl InitializeResponse {
    pub fn from_raw(raw: Value) -> Self {
        let redirect_url = raw
            .get("RedirectURL")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { redirect_url, raw }
    }
}

#[async_trait::async_trait]
pub trait HostedPaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn initialize_payment(&self, request: &PaymentRequest) -> Result<InitializeResponse, GatewayError>;

    /// Raw status document for a merchant transaction id.
    async fn verify_transaction(&self, merchant_transaction_id: &str) -> Result<Value, GatewayError>;
}
