pub mod config;
pub mod domain {
    pub mod callback;
    pub mod checkout;
    pub mod order;
    pub mod outcome;
    pub mod params;
}
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod eps;
        pub mod ops;
    }
    pub mod routes;
    pub mod session;
}
pub mod repo {
    pub mod orders_repo;
    pub mod session_store;
}
pub mod service {
    pub mod callback_service;
    pub mod checkout_service;
    pub mod order_hooks;
}

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub checkout_service: service::checkout_service::CheckoutService,
    pub callback_service: service::callback_service::CallbackService,
    pub sessions: Arc<dyn repo::session_store::SessionStore>,
    pub session_cookie: String,
    pub routes: config::StorefrontRoutes,
    pub pool: sqlx::PgPool,
    pub redis_client: redis::Client,
}
