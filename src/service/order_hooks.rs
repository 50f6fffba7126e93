use crate::domain::order::Order;
use anyhow::Result;
use serde_json::json;

/// Downstream work owned by the storefront that runs once an order is paid.
#[async_trait::async_trait]
pub trait OrderHooks: Send + Sync {
    async fn calculate_commission(&self, order: &Order) -> Result<()>;

    async fn notify_order_placed(&self, order: &Order) -> Result<()>;
}

/// Hands each hook to a storefront webhook. An unset URL means the storefront
/// has not wired that hook; the call is logged and treated as done.
#[derive(Clone)]
pub struct WebhookOrderHooks {
    pub client: reqwest::Client,
    pub commission_url: Option<String>,
    pub notification_url: Option<String>,
}

impl WebhookOrderHooks {
    async fn emit(&self, target: Option<&str>, event_type: &str, order: &Order) -> Result<()> {
        let Some(url) = target else {
            tracing::debug!(order_id = order.id, event_type, "no webhook configured");
            return Ok(());
        };

        let payload = json!({
            "event": event_type,
            "order_id": order.id,
            "combined_order_id": order.combined_order_id,
            "payment_status": order.payment_status,
            "payment_type": order.payment_type,
        });

        self.client
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-Event-Type", event_type)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl OrderHooks for WebhookOrderHooks {
    async fn calculate_commission(&self, order: &Order) -> Result<()> {
        self.emit(self.commission_url.as_deref(), "order.commission", order)
            .await
    }

    async fn notify_order_placed(&self, order: &Order) -> Result<()> {
        self.emit(self.notification_url.as_deref(), "order.placed", order)
            .await
    }
}
