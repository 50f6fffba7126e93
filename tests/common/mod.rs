#![allow(dead_code)]

use anyhow::Result;
use eps_checkout::config::StorefrontRoutes;
use eps_checkout::domain::checkout::PaymentRequest;
use eps_checkout::domain::order::{CombinedOrder, Order, PaymentStatus};
use eps_checkout::gateways::{GatewayError, HostedPaymentGateway, InitializeResponse};
use eps_checkout::repo::orders_repo::{OrderStore, PaymentUpdate};
use eps_checkout::repo::session_store::{Session, SessionStore};
use eps_checkout::service::callback_service::CallbackService;
use eps_checkout::service::checkout_service::CheckoutService;
use eps_checkout::service::order_hooks::OrderHooks;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const SESSION_ID: &str = "sess-1";

#[derive(Default)]
pub struct MemoryOrders {
    pub combined: Mutex<HashMap<i64, CombinedOrder>>,
    pub orders: Mutex<Vec<Order>>,
}

impl MemoryOrders {
    pub fn with_group(combined_order_id: i64, order_ids: &[i64], shipping: Option<&str>) -> Self {
        let store = Self::default();
        store.combined.lock().unwrap().insert(
            combined_order_id,
            CombinedOrder {
                id: combined_order_id,
                shipping_address: shipping.map(str::to_string),
                grand_total: Decimal::new(150_000, 2),
            },
        );
        store.orders.lock().unwrap().extend(order_ids.iter().map(|id| Order {
            id: *id,
            combined_order_id,
            payment_status: PaymentStatus::Pending,
            payment_details: None,
            payment_type: None,
            notified: false,
        }));
        store
    }

    pub fn statuses(&self) -> Vec<PaymentStatus> {
        self.orders.lock().unwrap().iter().map(|o| o.payment_status).collect()
    }

    pub fn order(&self, id: i64) -> Order {
        self.orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .expect("order exists")
    }

    pub fn set_notified(&self, id: i64) {
        for o in self.orders.lock().unwrap().iter_mut().filter(|o| o.id == id) {
            o.notified = true;
        }
    }
}

#[async_trait::async_trait]
impl OrderStore for MemoryOrders {
    async fn find_combined_order(&self, id: i64) -> Result<Option<CombinedOrder>> {
        Ok(self.combined.lock().unwrap().get(&id).cloned())
    }

    async fn list_orders(&self, combined_order_id: i64) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.combined_order_id == combined_order_id)
            .cloned()
            .collect())
    }

    async fn apply_payment_update(&self, combined_order_id: i64, update: &PaymentUpdate) -> Result<Vec<i64>> {
        let mut changed = Vec::new();
        for o in self.orders.lock().unwrap().iter_mut() {
            if o.combined_order_id != combined_order_id || o.payment_status == PaymentStatus::Paid {
                continue;
            }
            o.payment_status = update.status;
            o.payment_details = Some(update.details.to_string());
            if let Some(t) = &update.payment_type {
                o.payment_type = Some(t.clone());
            }
            changed.push(o.id);
        }
        Ok(changed)
    }

    async fn claim_notification(&self, order_ids: &[i64]) -> Result<Vec<i64>> {
        let mut claimed = Vec::new();
        for o in self.orders.lock().unwrap().iter_mut() {
            if order_ids.contains(&o.id) && !o.notified {
                o.notified = true;
                claimed.push(o.id);
            }
        }
        Ok(claimed)
    }
}

#[derive(Default)]
pub struct MemorySessions {
    pub values: Mutex<HashMap<(String, String), String>>,
}

impl MemorySessions {
    pub fn seeded(pairs: &[(&str, &str)]) -> Self {
        let store = Self::default();
        for (k, v) in pairs {
            store
                .values
                .lock()
                .unwrap()
                .insert((SESSION_ID.to_string(), k.to_string()), v.to_string());
        }
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap()
            .get(&(SESSION_ID.to_string(), key.to_string()))
            .cloned()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessions {
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .lock()
            .unwrap()
            .get(&(session_id.to_string(), key.to_string()))
            .cloned())
    }

    async fn put(&self, session_id: &str, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert((session_id.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    async fn forget(&self, session_id: &str, keys: &[&str]) -> Result<()> {
        let mut values = self.values.lock().unwrap();
        for k in keys {
            values.remove(&(session_id.to_string(), k.to_string()));
        }
        Ok(())
    }
}

pub struct ScriptedGateway {
    pub initialize: Result<Value, GatewayError>,
    pub verification: Result<Value, GatewayError>,
    pub initialized: Mutex<Vec<PaymentRequest>>,
    pub verified: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(initialize: Result<Value, GatewayError>, verification: Result<Value, GatewayError>) -> Self {
        Self {
            initialize,
            verification,
            initialized: Mutex::new(Vec::new()),
            verified: Mutex::new(Vec::new()),
        }
    }

    pub fn verifying(verification: Result<Value, GatewayError>) -> Self {
        Self::new(Ok(Value::Null), verification)
    }
}

#[async_trait::async_trait]
impl HostedPaymentGateway for ScriptedGateway {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn initialize_payment(&self, request: &PaymentRequest) -> Result<InitializeResponse, GatewayError> {
        self.initialized.lock().unwrap().push(request.clone());
        self.initialize.clone().map(InitializeResponse::from_raw)
    }

    async fn verify_transaction(&self, merchant_transaction_id: &str) -> Result<Value, GatewayError> {
        self.verified
            .lock()
            .unwrap()
            .push(merchant_transaction_id.to_string());
        self.verification.clone()
    }
}

#[derive(Default)]
pub struct RecordingHooks {
    pub commissions: Mutex<Vec<i64>>,
    pub notifications: Mutex<Vec<i64>>,
    pub fail_commission: bool,
}

#[async_trait::async_trait]
impl OrderHooks for RecordingHooks {
    async fn calculate_commission(&self, order: &Order) -> Result<()> {
        self.commissions.lock().unwrap().push(order.id);
        if self.fail_commission {
            anyhow::bail!("commission service down");
        }
        Ok(())
    }

    async fn notify_order_placed(&self, order: &Order) -> Result<()> {
        self.notifications.lock().unwrap().push(order.id);
        Ok(())
    }
}

pub fn routes() -> StorefrontRoutes {
    StorefrontRoutes {
        public_base_url: "https://shop.example".to_string(),
        checkout_url: "/checkout".to_string(),
        home_url: "/".to_string(),
        order_confirmed_url: "/order-confirmed".to_string(),
    }
}

pub fn session(store: &Arc<MemorySessions>) -> Session {
    Session::new(store.clone(), Some(SESSION_ID.to_string()))
}

pub fn callback_service(
    orders: &Arc<MemoryOrders>,
    gateway: &Arc<ScriptedGateway>,
    hooks: &Arc<RecordingHooks>,
    trust_unverified_success: bool,
) -> CallbackService {
    CallbackService {
        orders: orders.clone(),
        gateway: gateway.clone(),
        hooks: hooks.clone(),
        trust_unverified_success,
    }
}

pub fn checkout_service(orders: &Arc<MemoryOrders>, gateway: &Arc<ScriptedGateway>) -> CheckoutService {
    CheckoutService {
        orders: orders.clone(),
        gateway: gateway.clone(),
        routes: routes(),
    }
}
