use crate::config::EpsConfig;
use crate::domain::checkout::PaymentRequest;
use crate::gateways::signing::x_hash;
use crate::gateways::{GatewayError, HostedPaymentGateway, InitializeResponse};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

pub struct EpsGateway {
    pub config: EpsConfig,
    pub client: reqwest::Client,
}

// EPS compares these as strings server-side; keep every field a String.
#[derive(Debug, Serialize)]
pub struct InitializeBody<'a> {
    #[serde(rename = "merchantId")]
    pub merchant_id: &'a str,
    #[serde(rename = "storeId")]
    pub store_id: &'a str,
    #[serde(rename = "CustomerOrderId")]
    pub customer_order_id: &'a str,
    #[serde(rename = "merchantTransactionId")]
    pub merchant_transaction_id: &'a str,
    #[serde(rename = "transactionTypeId")]
    pub transaction_type_id: &'a str,
    #[serde(rename = "totalAmount")]
    pub total_amount: &'a str,
    #[serde(rename = "successUrl")]
    pub success_url: &'a str,
    #[serde(rename = "failUrl")]
    pub fail_url: &'a str,
    #[serde(rename = "cancelUrl")]
    pub cancel_url: &'a str,
    #[serde(rename = "customerName")]
    pub customer_name: &'a str,
    #[serde(rename = "customerEmail")]
    pub customer_email: &'a str,
    #[serde(rename = "customerAddress")]
    pub customer_address: &'a str,
    #[serde(rename = "customerCity")]
    pub customer_city: &'a str,
    #[serde(rename = "customerState")]
    pub customer_state: &'a str,
    #[serde(rename = "customerPostcode")]
    pub customer_postcode: &'a str,
    #[serde(rename = "customerCountry")]
    pub customer_country: &'a str,
    #[serde(rename = "customerPhone")]
    pub customer_phone: &'a str,
    #[serde(rename = "productName")]
    pub product_name: &'a str,
}

impl<'a> InitializeBody<'a> {
    pub fn new(config: &'a EpsConfig, request: &'a PaymentRequest) -> Self {
        let c = &request.customer;
        Self {
            merchant_id: &config.merchant_id,
            store_id: &config.store_id,
            customer_order_id: &request.customer_order_id,
            merchant_transaction_id: &request.merchant_transaction_id,
            transaction_type_id: &request.transaction_type_id,
            total_amount: &request.total_amount,
            success_url: &request.success_url,
            fail_url: &request.fail_url,
            cancel_url: &request.cancel_url,
            customer_name: c.name.as_deref().unwrap_or_default(),
            customer_email: c.email.as_deref().unwrap_or_default(),
            customer_address: c.address.as_deref().unwrap_or_default(),
            customer_city: c.city.as_deref().unwrap_or_default(),
            customer_state: c.state.as_deref().unwrap_or_default(),
            customer_postcode: c.postcode.as_deref().unwrap_or_default(),
            customer_country: c.country.as_deref().unwrap_or_default(),
            customer_phone: c.phone.as_deref().unwrap_or_default(),
            product_name: &request.product_name,
        }
    }
}

impl EpsGateway {
    pub fn new(config: EpsConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }

    async fn read_json(operation: &str, resp: reqwest::Response) -> Result<Value, GatewayError> {
        let body = resp
            .text()
            .await
            .map_err(|e| GatewayError::request_failed(operation, e.to_string()))?;
        Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    pub async fn get_token(&self) -> Result<String, GatewayError> {
        let body = json!({
            "userName": self.config.user_name,
            "password": self.config.password,
        });

        let resp = self
            .client
            .post(self.url("/Auth/GetToken"))
            .header("x-hash", x_hash(&self.config.user_name, &self.config.hash_key))
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "EPS GetToken failed");
                GatewayError::request_failed("token", e.to_string())
            })?;

        let v = Self::read_json("token", resp).await?;
        match v.get("token").and_then(Value::as_str).filter(|t| !t.is_empty()) {
            Some(token) => Ok(token.to_string()),
            None => {
                tracing::warn!(response = %v, "EPS GetToken returned no token");
                Err(GatewayError::token_missing(v))
            }
        }
    }
}

#[async_trait::async_trait]
impl HostedPaymentGateway for EpsGateway {
    fn name(&self) -> &'static str {
        "eps"
    }

    async fn initialize_payment(&self, request: &PaymentRequest) -> Result<InitializeResponse, GatewayError> {
        let token = self.get_token().await?;
        let body = InitializeBody::new(&self.config, request);

        let resp = self
            .client
            .post(self.url("/EPSEngine/InitializeEPS"))
            .bearer_auth(&token)
            .header("x-hash", x_hash(&request.merchant_transaction_id, &self.config.hash_key))
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    merchant_transaction_id = %request.merchant_transaction_id,
                    "EPS InitializeEPS failed"
                );
                GatewayError::request_failed("initialize", e.to_string())
            })?;

        Ok(InitializeResponse::from_raw(Self::read_json("initialize", resp).await?))
    }

    async fn verify_transaction(&self, merchant_transaction_id: &str) -> Result<Value, GatewayError> {
        let token = self.get_token().await?;

        let resp = self
            .client
            .get(self.url("/EPSEngine/CheckMerchantTransactionStatus"))
            .query(&[("merchantTransactionId", merchant_transaction_id)])
            .bearer_auth(&token)
            .header("x-hash", x_hash(merchant_transaction_id, &self.config.hash_key))
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, merchant_transaction_id, "EPS verifyTransaction failed");
                GatewayError::request_failed("verify", e.to_string())
            })?;

        Self::read_json("verify", resp).await
    }
}
