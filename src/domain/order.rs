use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "unpaid" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "failed" => Some(PaymentStatus::Failed),
            "cancelled" | "canceled" => Some(PaymentStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub combined_order_id: i64,
    pub payment_status: PaymentStatus,
    pub payment_details: Option<String>,
    pub payment_type: Option<String>,
    pub notified: bool,
}

#[derive(Debug, Clone)]
pub struct CombinedOrder {
    pub id: i64,
    pub shipping_address: Option<String>,
    pub grand_total: Decimal,
}

impl CombinedOrder {
    pub fn shipping(&self) -> ShippingAddress {
        self.shipping_address
            .as_deref()
            .map(ShippingAddress::from_json)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShippingAddress {
    fields: serde_json::Map<String, Value>,
}

impl ShippingAddress {
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    // First populated key wins; storefronts write either `city` or `city_id`.
    pub fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.field(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_address_fields_are_stringified() {
        let s = ShippingAddress::from_json(r#"{"city_id": 12, "name": "Rahim"}"#);
        assert_eq!(s.first_of(&["city", "city_id"]).as_deref(), Some("12"));
        assert_eq!(s.field("name").as_deref(), Some("Rahim"));
    }

    #[test]
    fn garbage_shipping_json_is_empty() {
        let s = ShippingAddress::from_json("not json");
        assert!(s.is_empty());
        assert!(ShippingAddress::from_json("[1,2]").is_empty());
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
            PaymentStatus::Cancelled,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PaymentStatus::parse("unpaid"), Some(PaymentStatus::Pending));
        assert_eq!(PaymentStatus::parse("weird"), None);
    }
}
