use crate::config::StorefrontRoutes;
use crate::domain::checkout::{
    new_merchant_transaction_id, resolve_customer, uses_shipping_fallback, PaymentAttempt, PaymentRequest,
};
use crate::domain::order::CombinedOrder;
use crate::domain::outcome::Outcome;
use crate::domain::params::RequestParams;
use crate::gateways::HostedPaymentGateway;
use crate::repo::orders_repo::OrderStore;
use crate::repo::session_store::{Session, COMBINED_ORDER_ID, PAYMENT_DATA};
use std::sync::Arc;

pub const ORDER_NOT_FOUND: &str = "Order not found for payment.";
pub const INIT_FAILED: &str = "EPS Payment initialization failed!";
pub const INIT_ERROR: &str = "EPS Payment initialization failed. Please contact support.";

#[derive(Clone)]
pub struct CheckoutService {
    pub orders: Arc<dyn OrderStore>,
    pub gateway: Arc<dyn HostedPaymentGateway>,
    pub routes: StorefrontRoutes,
}

impl CheckoutService {
    pub async fn start_payment(&self, session: &Session, params: &RequestParams) -> Outcome {
        let Some(order) = self.load_order(session).await else {
            return Outcome::checkout_error(ORDER_NOT_FOUND);
        };

        let shipping = order.shipping();
        if uses_shipping_fallback(params) {
            tracing::info!(
                combined_order_id = order.id,
                shipping_available = !shipping.is_empty(),
                "EPS payment falling back to combined order shipping address"
            );
        }

        let customer = resolve_customer(params, &shipping);
        let request = PaymentRequest::for_combined_order(
            &order,
            customer,
            new_merchant_transaction_id(),
            &self.routes,
        );

        tracing::info!(
            combined_order_id = order.id,
            merchant_transaction_id = %request.merchant_transaction_id,
            total_amount = %request.total_amount,
            gateway = self.gateway.name(),
            "EPS payment data prepared"
        );

        let attempt = PaymentAttempt {
            merchant_transaction_id: request.merchant_transaction_id.clone(),
            customer_order_id: request.customer_order_id.clone(),
        };
        match serde_json::to_string(&attempt) {
            Ok(raw) => session.put(PAYMENT_DATA, &raw).await,
            Err(e) => tracing::warn!(error = %e, "could not encode payment attempt"),
        }

        match self.gateway.initialize_payment(&request).await {
            Ok(resp) => match resp.redirect_url {
                Some(url) => Outcome::gateway(url),
                None => {
                    tracing::warn!(
                        combined_order_id = order.id,
                        response = %resp.raw,
                        "EPS InitializeEPS returned no RedirectURL"
                    );
                    Outcome::checkout_error(INIT_FAILED)
                }
            },
            Err(e) => {
                tracing::error!(
                    combined_order_id = order.id,
                    error = %e,
                    details = ?e.details,
                    "EPS initializePayment failed"
                );
                Outcome::checkout_error(INIT_ERROR)
            }
        }
    }

    async fn load_order(&self, session: &Session) -> Option<CombinedOrder> {
        let id = session.get_i64(COMBINED_ORDER_ID).await?;
        match self.orders.find_combined_order(id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::error!(combined_order_id = id, error = %e, "combined order lookup failed");
                None
            }
        }
    }
}
