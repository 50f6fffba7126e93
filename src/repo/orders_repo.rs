use crate::domain::order::{CombinedOrder, Order, PaymentStatus};
use anyhow::Result;
use sqlx::{PgPool, Row};

/// Group-wide status move. `IS DISTINCT FROM` keeps rows with a NULL status
/// eligible; a paid row is never touched again.
pub const APPLY_PAYMENT_UPDATE_SQL: &str = r#"
    UPDATE orders
    SET payment_status = $2,
        payment_details = $3,
        payment_type = COALESCE($4, payment_type)
    WHERE combined_order_id = $1 AND payment_status IS DISTINCT FROM 'paid'
    RETURNING id
    "#;

#[derive(Debug, Clone)]
pub struct PaymentUpdate {
    pub status: PaymentStatus,
    pub details: serde_json::Value,
    pub payment_type: Option<String>,
}

#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_combined_order(&self, id: i64) -> Result<Option<CombinedOrder>>;

    async fn list_orders(&self, combined_order_id: i64) -> Result<Vec<Order>>;

    /// Moves every not-yet-paid order of the group to `update.status` in one
    /// statement. Returns the ids that changed.
    async fn apply_payment_update(&self, combined_order_id: i64, update: &PaymentUpdate) -> Result<Vec<i64>>;

    /// Sets `notified` on the given orders; returns only the ids that were
    /// still unflagged.
    async fn claim_notification(&self, order_ids: &[i64]) -> Result<Vec<i64>>;
}

#[derive(Clone)]
pub struct OrdersRepo {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl OrderStore for OrdersRepo {
    async fn find_combined_order(&self, id: i64) -> Result<Option<CombinedOrder>> {
        let row = sqlx::query(
            "SELECT id, shipping_address, grand_total FROM combined_orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| CombinedOrder {
            id: r.get("id"),
            shipping_address: r.get("shipping_address"),
            grand_total: r.get("grand_total"),
        }))
    }

    async fn list_orders(&self, combined_order_id: i64) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT id, combined_order_id, payment_status, payment_details, payment_type, notified
            FROM orders
            WHERE combined_order_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(combined_order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let id: i64 = r.get("id");
                let status: Option<String> = r.get("payment_status");
                Order {
                    id,
                    combined_order_id: r.get("combined_order_id"),
                    payment_status: status_from_column(id, status.as_deref()),
                    payment_details: r.get("payment_details"),
                    payment_type: r.get("payment_type"),
                    notified: r.get("notified"),
                }
            })
            .collect())
    }

    async fn apply_payment_update(&self, combined_order_id: i64, update: &PaymentUpdate) -> Result<Vec<i64>> {
        let rows = sqlx::query(APPLY_PAYMENT_UPDATE_SQL)
            .bind(combined_order_id)
            .bind(update.status.as_str())
            .bind(update.details.to_string())
            .bind(update.payment_type.as_deref())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.get("id")).collect())
    }

    async fn claim_notification(&self, order_ids: &[i64]) -> Result<Vec<i64>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "UPDATE orders SET notified = true WHERE id = ANY($1) AND notified = false RETURNING id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.get("id")).collect())
    }
}

/// Unknown or missing statuses read as pending, but are logged with the raw value.
fn status_from_column(order_id: i64, raw: Option<&str>) -> PaymentStatus {
    match raw.and_then(PaymentStatus::parse) {
        Some(status) => status,
        None => {
            tracing::warn!(order_id, raw_status = ?raw, "unrecognised payment_status, treating as pending");
            PaymentStatus::Pending
        }
    }
}
