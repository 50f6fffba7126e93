use crate::config::StorefrontRoutes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    Gateway(String),
    Checkout,
    Home,
    OrderConfirmed,
}

impl RedirectTarget {
    pub fn location(&self, routes: &StorefrontRoutes) -> String {
        match self {
            RedirectTarget::Gateway(url) => url.clone(),
            RedirectTarget::Checkout => routes.checkout_url.clone(),
            RedirectTarget::Home => routes.home_url.clone(),
            RedirectTarget::OrderConfirmed => routes.order_confirmed_url.clone(),
        }
    }
}

/// What the browser sees after any EPS route: where to go, and the one-shot
/// message to show there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub target: RedirectTarget,
    pub flash: Option<Flash>,
}

impl Outcome {
    pub fn gateway(url: impl Into<String>) -> Self {
        Self {
            target: RedirectTarget::Gateway(url.into()),
            flash: None,
        }
    }

    pub fn checkout_error(message: &str) -> Self {
        Self::with_flash(RedirectTarget::Checkout, FlashLevel::Error, message)
    }

    pub fn with_flash(target: RedirectTarget, level: FlashLevel, message: &str) -> Self {
        Self {
            target,
            flash: Some(Flash {
                level,
                message: message.to_string(),
            }),
        }
    }
}
