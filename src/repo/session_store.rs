use anyhow::Result;
use redis::AsyncCommands;
use std::sync::Arc;

pub const COMBINED_ORDER_ID: &str = "combined_order_id";
pub const ORDER_ID: &str = "order_id";
pub const PAYMENT_DATA: &str = "payment_data";
pub const FLASH: &str = "flash";

#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<String>>;

    async fn put(&self, session_id: &str, key: &str, value: &str) -> Result<()>;

    async fn forget(&self, session_id: &str, keys: &[&str]) -> Result<()>;
}

/// Storefront sessions kept as one Redis hash per session id.
#[derive(Clone)]
pub struct RedisSessionStore {
    pub client: redis::Client,
    pub ttl_secs: i64,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, ttl_secs: i64) -> Self {
        Self { client, ttl_secs }
    }

    fn key(session_id: &str) -> String {
        format!("session:{}", session_id)
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.hget(Self::key(session_id), key).await?;
        Ok(value)
    }

    async fn put(&self, session_id: &str, key: &str, value: &str) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let hash = Self::key(session_id);
        let _: () = conn.hset(&hash, key, value).await?;
        let _: () = conn.expire(&hash, self.ttl_secs).await?;
        Ok(())
    }

    async fn forget(&self, session_id: &str, keys: &[&str]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.hdel(Self::key(session_id), keys).await?;
        Ok(())
    }
}

/// One request's view of the session. Store failures are logged and read as
/// absent values so a broken session never breaks a redirect.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    id: Option<String>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>, id: Option<String>) -> Self {
        Self { store, id }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let id = self.id.as_deref()?;
        match self.store.get(id, key).await {
            Ok(v) => v.filter(|s| !s.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, key, "session read failed");
                None
            }
        }
    }

    pub async fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).await.and_then(|v| v.trim().parse::<i64>().ok())
    }

    pub async fn put(&self, key: &str, value: &str) {
        let Some(id) = self.id.as_deref() else {
            tracing::debug!(key, "no session; value not stored");
            return;
        };
        if let Err(e) = self.store.put(id, key, value).await {
            tracing::warn!(error = %e, key, "session write failed");
        }
    }

    pub async fn forget(&self, keys: &[&str]) {
        let Some(id) = self.id.as_deref() else {
            return;
        };
        if let Err(e) = self.store.forget(id, keys).await {
            tracing::warn!(error = %e, ?keys, "session forget failed");
        }
    }
}
