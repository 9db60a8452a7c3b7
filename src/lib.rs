pub mod error;
pub mod github;
pub mod hooks;
pub mod signature;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use crate::error::{HookError, Result};
use crate::hooks::WebhookDispatcher;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8888";

/// Process configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub api_base: String,
    pub webhook_secret: SecretString,
    pub auth_token: SecretString,
}

impl AppConfig {
    /// Reads configuration from the environment. The two GitHub credentials
    /// are required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let webhook_secret = require_env("GITHUB_SIG_TOKEN")?;
        let auth_token = require_env("GITHUB_AUTH_TOKEN")?;
        let bind_address = std::env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
        let api_base = std::env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| github::DEFAULT_API_BASE.to_string());

        Ok(Self {
            bind_address,
            api_base,
            webhook_secret: SecretString::new(webhook_secret),
            auth_token: SecretString::new(auth_token),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| HookError::Config(format!("{} must be set", name)))
}

pub struct AppState {
    pub dispatcher: WebhookDispatcher,
    pub checks: Vec<String>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

pub type SharedState = Arc<AppState>;
