use axum::{
    Json,
    body::Bytes,
    extract::State as AxumState,
    http::HeaderMap,
    response::IntoResponse,
};
use serde_json::json;

use commit_gate::SharedState;

/// Liveness probe, no auth.
pub async fn healthz() -> &'static str {
    "OK"
}

/// Returns the server identity and the registered policy checks.
pub async fn status(AxumState(state): AxumState<SharedState>) -> impl IntoResponse {
    Json(json!({
        "server": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "started_at": state.started_at.to_rfc3339(),
            "uptime_seconds": state.start_time.elapsed().as_secs(),
        },
        "checks": state.checks,
    }))
}

/// Handles the GitHub webhook POST request.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.dispatcher.handle(&headers, &body).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn healthz_answers_ok() {
        assert_eq!(healthz().await, "OK");
    }
}
