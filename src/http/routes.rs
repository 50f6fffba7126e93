use crate::http::handlers::{eps, ops};
use crate::AppState;
use axum::routing::{any, get};
use axum::Router;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(ops::health))
        .route("/ops/readiness", get(ops::readiness))
        .route("/ops/liveness", get(ops::liveness))
        .route("/eps/pay", get(eps::pay).post(eps::pay))
        // EPS calls back with GET or POST depending on merchant setup.
        .route("/eps/success", any(eps::success))
        .route("/eps/fail", any(eps::fail))
        .route("/eps/cancel", any(eps::cancel))
        .with_state(state)
}
