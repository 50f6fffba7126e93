use eps_checkout::config::AppConfig;
use eps_checkout::gateways::eps::EpsGateway;
use eps_checkout::gateways::HostedPaymentGateway;
use eps_checkout::repo::orders_repo::{OrderStore, OrdersRepo};
use eps_checkout::repo::session_store::{RedisSessionStore, SessionStore};
use eps_checkout::service::callback_service::CallbackService;
use eps_checkout::service::checkout_service::CheckoutService;
use eps_checkout::service::order_hooks::{OrderHooks, WebhookOrderHooks};
use eps_checkout::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    if cfg.trust_unverified_success {
        tracing::warn!("EPS_TRUST_UNVERIFIED_SUCCESS is on; unverified success callbacks will mark orders paid");
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;
    let redis_client = redis::Client::open(cfg.redis_url.clone())?;
    let http_client = reqwest::Client::new();

    let orders: Arc<dyn OrderStore> = Arc::new(OrdersRepo { pool: pool.clone() });
    let sessions: Arc<dyn SessionStore> = Arc::new(RedisSessionStore::new(
        redis_client.clone(),
        cfg.session_ttl_secs,
    ));
    let gateway: Arc<dyn HostedPaymentGateway> =
        Arc::new(EpsGateway::new(cfg.eps.clone(), http_client.clone()));
    let hooks: Arc<dyn OrderHooks> = Arc::new(WebhookOrderHooks {
        client: http_client,
        commission_url: cfg.commission_webhook_url.clone(),
        notification_url: cfg.notification_webhook_url.clone(),
    });

    let state = AppState {
        checkout_service: CheckoutService {
            orders: orders.clone(),
            gateway: gateway.clone(),
            routes: cfg.routes.clone(),
        },
        callback_service: CallbackService {
            orders,
            gateway,
            hooks,
            trust_unverified_success: cfg.trust_unverified_success,
        },
        sessions,
        session_cookie: cfg.session_cookie.clone(),
        routes: cfg.routes.clone(),
        pool,
        redis_client,
    };

    let app = eps_checkout::http::routes::app(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
