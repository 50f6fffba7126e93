use crate::config::StorefrontRoutes;
use crate::domain::order::{CombinedOrder, ShippingAddress};
use crate::domain::params::RequestParams;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const TRANSACTION_TYPE_WEB: &str = "1";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

pub fn resolve_customer(params: &RequestParams, shipping: &ShippingAddress) -> CustomerDetails {
    let pick = |input: &str, stored: &[&str]| {
        params
            .filled(input)
            .map(str::to_string)
            .or_else(|| shipping.first_of(stored))
    };

    CustomerDetails {
        name: pick("name", &["name"]),
        email: pick("email", &["email"]),
        address: pick("address", &["address"]),
        city: pick("city_id", &["city", "city_id"]),
        state: pick("state_id", &["state", "state_id"]),
        postcode: pick("postal_code", &["postal_code"]),
        country: pick("country_id", &["country", "country_id"]),
        phone: pick("phone", &["phone"]),
    }
}

pub fn uses_shipping_fallback(params: &RequestParams) -> bool {
    ["name", "email", "address"].iter().any(|k| params.is_missing(k))
}

/// Everything InitializeEPS needs except the merchant credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub customer_order_id: String,
    pub merchant_transaction_id: String,
    pub transaction_type_id: String,
    pub total_amount: String,
    pub success_url: String,
    pub fail_url: String,
    pub cancel_url: String,
    pub customer: CustomerDetails,
    pub product_name: String,
}

impl PaymentRequest {
    pub fn for_combined_order(
        order: &CombinedOrder,
        customer: CustomerDetails,
        merchant_transaction_id: String,
        routes: &StorefrontRoutes,
    ) -> Self {
        Self {
            customer_order_id: order.id.to_string(),
            merchant_transaction_id,
            transaction_type_id: TRANSACTION_TYPE_WEB.to_string(),
            total_amount: format_amount(order.grand_total),
            success_url: routes.callback_url("success"),
            fail_url: routes.callback_url("fail"),
            cancel_url: routes.callback_url("cancel"),
            customer,
            product_name: format!("Order #{}", order.id),
        }
    }
}

/// Session record of the attempt in flight, stored under `payment_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAttempt {
    #[serde(rename = "merchantTransactionId")]
    pub merchant_transaction_id: String,
    #[serde(rename = "CustomerOrderId")]
    pub customer_order_id: String,
}

pub fn new_merchant_transaction_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
