mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::{Router, routing};
use chrono::Utc;
use commit_gate::github::StatusClient;
use commit_gate::hooks::commit_check::CommitCheckHook;
use commit_gate::hooks::signoff::SignoffCheck;
use commit_gate::hooks::{PolicyCheck, WebhookDispatcher};
use commit_gate::{AppConfig, AppState};
use handlers::{handle_webhook, healthz, status};
use tracing::info;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt::init();

    let client = match StatusClient::new(&config.auth_token, config.api_base.clone()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let policy = SignoffCheck;
    let checks = vec![policy.name().to_string()];
    let hook = CommitCheckHook::new(client, Box::new(policy));
    let dispatcher = WebhookDispatcher::new(config.webhook_secret.clone(), Arc::new(hook));

    let state = Arc::new(AppState {
        dispatcher,
        checks,
        start_time: Instant::now(),
        started_at: Utc::now(),
    });

    let app = Router::new()
        .route("/signoff", routing::post(handle_webhook))
        .route("/healthz", routing::get(healthz))
        .route("/status", routing::get(status))
        .with_state(state);

    info!("Listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
