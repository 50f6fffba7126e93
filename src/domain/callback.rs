use crate::domain::params::RequestParams;
use serde_json::Value;

const TRANSACTION_ID_KEYS: [&str; 3] = ["MerchantTransactionId", "merchantTransactionId", "EPSTransactionId_"];
const ORDER_ID_KEYS: [&str; 2] = ["CustomerOrderId", "customerOrderId"];

pub fn transaction_id(params: &RequestParams) -> Option<String> {
    params.first_filled(&TRANSACTION_ID_KEYS).map(str::to_string)
}

pub fn order_id_from_params(params: &RequestParams) -> Option<i64> {
    params
        .first_filled(&ORDER_ID_KEYS)
        .and_then(|v| v.parse::<i64>().ok())
}

pub fn order_id_from_verification(verification: &Value) -> Option<i64> {
    let echoed = verification
        .get("CustomerOrderId")
        .or_else(|| verification.get("response").and_then(|r| r.get("CustomerOrderId")))?;
    match echoed {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

/// Verification is only usable when it is an object without an `error` key.
pub fn usable_verification(verification: Option<&Value>) -> Option<&Value> {
    verification.filter(|v| v.is_object() && v.get("error").is_none())
}

pub fn verification_says_paid(verification: &Value) -> bool {
    verification.get("Status").and_then(Value::as_str) == Some("Success")
}

pub fn params_claim_success(params: &RequestParams) -> bool {
    params.get("status") == Some("success") || params.get("payment_status") == Some("success")
}

/// What gets recorded as `payment_details`: the verification document when it
/// carries anything, otherwise the callback's own parameters.
pub fn payment_details(verification: Option<&Value>, params: &RequestParams) -> Value {
    verification
        .filter(|v| !v.is_null() && v.as_object().map_or(true, |m| !m.is_empty()))
        .cloned()
        .unwrap_or_else(|| params.to_json())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaidDecision {
    Verified,
    VerifiedNotPaid,
    TrustedParams,
    Unverified,
}

impl PaidDecision {
    pub fn is_paid(&self) -> bool {
        matches!(self, PaidDecision::Verified | PaidDecision::TrustedParams)
    }
}

pub fn decide_paid(
    verification: Option<&Value>,
    params: &RequestParams,
    order_found: bool,
    trust_unverified_success: bool,
) -> PaidDecision {
    match usable_verification(verification) {
        Some(v) if verification_says_paid(v) => PaidDecision::Verified,
        Some(_) => PaidDecision::VerifiedNotPaid,
        None if trust_unverified_success && order_found && params_claim_success(params) => {
            PaidDecision::TrustedParams
        }
        None => PaidDecision::Unverified,
    }
}
