use crate::domain::callback::{
    decide_paid, order_id_from_params, order_id_from_verification, payment_details, transaction_id,
};
use crate::domain::checkout::PaymentAttempt;
use crate::domain::order::{CombinedOrder, PaymentStatus};
use crate::domain::outcome::{FlashLevel, Outcome, RedirectTarget};
use crate::domain::params::RequestParams;
use crate::gateways::HostedPaymentGateway;
use crate::repo::orders_repo::{OrderStore, PaymentUpdate};
use crate::repo::session_store::{Session, COMBINED_ORDER_ID, ORDER_ID, PAYMENT_DATA};
use crate::service::order_hooks::OrderHooks;
use serde_json::Value;
use std::sync::Arc;

pub const PAYMENT_TYPE: &str = "eps";
pub const PAID_MESSAGE: &str = "Payment completed successfully";
pub const UNVERIFIED_MESSAGE: &str =
    "EPS Payment could not be verified as successful. If money was deducted, contact support.";
pub const FAILED_MESSAGE: &str = "Payment Failed";
pub const CANCELLED_MESSAGE: &str = "Payment cancelled";

#[derive(Clone)]
pub struct CallbackService {
    pub orders: Arc<dyn OrderStore>,
    pub gateway: Arc<dyn HostedPaymentGateway>,
    pub hooks: Arc<dyn OrderHooks>,
    pub trust_unverified_success: bool,
}

impl CallbackService {
    pub async fn handle_success(&self, session: &Session, params: &RequestParams) -> Outcome {
        let txn_id = match transaction_id(params) {
            Some(id) => Some(id),
            None => remembered_transaction_id(session).await,
        };

        let verification = match txn_id.as_deref() {
            Some(id) => match self.gateway.verify_transaction(id).await {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::error!(merchant_transaction_id = id, error = %e, "EPS verifyTransaction failed");
                    Some(e.to_json())
                }
            },
            None => {
                tracing::warn!("EPS success callback without a transaction id");
                None
            }
        };

        let combined_order_id = match session.get_i64(COMBINED_ORDER_ID).await {
            Some(id) => Some(id),
            None => verification.as_ref().and_then(order_id_from_verification),
        };
        let combined_order = self.load_order(combined_order_id).await;

        let decision = decide_paid(
            verification.as_ref(),
            params,
            combined_order.is_some(),
            self.trust_unverified_success,
        );
        let details = payment_details(verification.as_ref(), params);

        tracing::info!(
            merchant_transaction_id = ?txn_id,
            combined_order_id = ?combined_order_id,
            decision = ?decision,
            "EPS success callback evaluated"
        );

        match combined_order {
            Some(order) if decision.is_paid() => {
                self.mark_paid(&order, details).await;
                session.put(COMBINED_ORDER_ID, &order.id.to_string()).await;
                Outcome::with_flash(RedirectTarget::OrderConfirmed, FlashLevel::Success, PAID_MESSAGE)
            }
            Some(order) => {
                self.apply(order.id, PaymentStatus::Failed, details, None).await;
                Outcome::checkout_error(UNVERIFIED_MESSAGE)
            }
            None => Outcome::checkout_error(UNVERIFIED_MESSAGE),
        }
    }

    pub async fn handle_fail(&self, session: &Session, params: &RequestParams) -> Outcome {
        self.close_out(session, params, PaymentStatus::Failed).await;
        Outcome::with_flash(RedirectTarget::Home, FlashLevel::Warning, FAILED_MESSAGE)
    }

    pub async fn handle_cancel(&self, session: &Session, params: &RequestParams) -> Outcome {
        self.close_out(session, params, PaymentStatus::Cancelled).await;
        Outcome::with_flash(RedirectTarget::Home, FlashLevel::Warning, CANCELLED_MESSAGE)
    }

    async fn close_out(&self, session: &Session, params: &RequestParams, status: PaymentStatus) {
        let combined_order_id = match session.get_i64(COMBINED_ORDER_ID).await {
            Some(id) => Some(id),
            None => order_id_from_params(params),
        };

        if let Some(order) = self.load_order(combined_order_id).await {
            self.apply(order.id, status, params.to_json(), None).await;
        } else {
            tracing::info!(
                combined_order_id = ?combined_order_id,
                status = status.as_str(),
                "EPS callback without a resolvable combined order"
            );
        }

        session.forget(&[ORDER_ID, PAYMENT_DATA]).await;
    }

    async fn mark_paid(&self, order: &CombinedOrder, details: Value) {
        let changed = self
            .apply(order.id, PaymentStatus::Paid, details, Some(PAYMENT_TYPE))
            .await;
        if changed.is_empty() {
            return;
        }

        let orders = match self.orders.list_orders(order.id).await {
            Ok(rows) => rows
                .into_iter()
                .filter(|o| changed.contains(&o.id))
                .collect::<Vec<_>>(),
            Err(e) => {
                tracing::error!(combined_order_id = order.id, error = %e, "could not load paid orders");
                return;
            }
        };

        for o in &orders {
            if let Err(e) = self.hooks.calculate_commission(o).await {
                tracing::error!(order_id = o.id, error = %e, "Commission calculation failed");
            }
        }

        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let claimed = match self.orders.claim_notification(&ids).await {
            Ok(claimed) => claimed,
            Err(e) => {
                tracing::error!(combined_order_id = order.id, error = %e, "notified flag update failed");
                return;
            }
        };

        for o in orders.iter().filter(|o| claimed.contains(&o.id)) {
            if let Err(e) = self.hooks.notify_order_placed(o).await {
                tracing::error!(order_id = o.id, error = %e, "order placed notification failed");
            }
        }
    }

    async fn apply(
        &self,
        combined_order_id: i64,
        status: PaymentStatus,
        details: Value,
        payment_type: Option<&str>,
    ) -> Vec<i64> {
        let update = PaymentUpdate {
            status,
            details,
            payment_type: payment_type.map(str::to_string),
        };
        match self.orders.apply_payment_update(combined_order_id, &update).await {
            Ok(changed) => {
                tracing::info!(
                    combined_order_id,
                    status = status.as_str(),
                    changed = changed.len(),
                    "order payment status updated"
                );
                changed
            }
            Err(e) => {
                tracing::error!(combined_order_id, status = status.as_str(), error = %e, "order payment update failed");
                Vec::new()
            }
        }
    }

    async fn load_order(&self, id: Option<i64>) -> Option<CombinedOrder> {
        let id = id?;
        match self.orders.find_combined_order(id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::error!(combined_order_id = id, error = %e, "combined order lookup failed");
                None
            }
        }
    }
}

async fn remembered_transaction_id(session: &Session) -> Option<String> {
    let raw = session.get(PAYMENT_DATA).await?;
    serde_json::from_str::<PaymentAttempt>(&raw)
        .ok()
        .map(|a| a.merchant_transaction_id)
}
