//! Webhook hook framework
//!
//! A [`WebhookDispatcher`] authorizes and parses inbound deliveries, then
//! hands the payload to whichever [`Hook`] it was built with. Concrete hooks
//! compose a [`PolicyCheck`] rather than subclassing anything.

pub mod commit_check;
pub mod signoff;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{error, warn};

use crate::error::{HookError, Result};
use crate::github::{CheckResult, Commit};
use crate::signature::{self, SIGNATURE_HEADER};

/// A handler for authorized, parsed webhook payloads.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Processes one delivery; the returned string becomes the 200 body.
    async fn run(&self, payload: Value) -> Result<String>;
}

/// A pluggable per-commit rule.
pub trait PolicyCheck: Send + Sync {
    /// Name reported as the status context on GitHub.
    fn name(&self) -> &str;

    /// Inspects one commit and produces a verdict.
    fn check(&self, commit: &Commit) -> Result<CheckResult>;
}

/// Turns an inbound POST into an authorized, parsed payload and delegates to
/// the configured hook.
pub struct WebhookDispatcher {
    secret: SecretString,
    hook: Arc<dyn Hook>,
}

impl WebhookDispatcher {
    pub fn new(secret: SecretString, hook: Arc<dyn Hook>) -> Self {
        Self { secret, hook }
    }

    fn authorize(&self, headers: &HeaderMap, body: &[u8]) -> Result<()> {
        let Some(header) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
            return Err(HookError::Unauthorized("Missing signature"));
        };

        if !signature::verify(self.secret.expose_secret().as_bytes(), body, header) {
            return Err(HookError::Unauthorized("Invalid signature"));
        }

        Ok(())
    }

    /// Handles one webhook delivery end to end.
    pub async fn handle(&self, headers: &HeaderMap, body: &[u8]) -> (StatusCode, String) {
        if let Err(e) = self.authorize(headers, body) {
            warn!("Rejected delivery: {}", e);
            return (StatusCode::UNAUTHORIZED, e.to_string());
        }

        let payload = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Null) => {
                warn!("Rejected delivery: empty payload");
                return (StatusCode::BAD_REQUEST, "Missing request payload".to_string());
            }
            Err(e) => {
                warn!("Rejected delivery: could not parse payload: {}", e);
                return (StatusCode::BAD_REQUEST, "Missing request payload".to_string());
            }
            Ok(payload) => payload,
        };

        match self.hook.run(payload).await {
            Ok(body) => (StatusCode::OK, body),
            Err(e @ HookError::Payload(_)) => {
                warn!("Rejected delivery: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            Err(e) => {
                error!("Hook failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream GitHub request failed".to_string(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmac::{Hmac, Mac};
    use sha1::Sha1;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SECRET: &str = "s3cr3t";

    struct RecordingHook {
        calls: AtomicUsize,
    }

    impl RecordingHook {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Hook for RecordingHook {
        async fn run(&self, _payload: Value) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("OK".to_string())
        }
    }

    struct FailingHook;

    #[async_trait]
    impl Hook for FailingHook {
        async fn run(&self, _payload: Value) -> Result<String> {
            Err(HookError::Api {
                status: 500,
                url: "https://api.github.com/repos/o/r/pulls/1/commits".to_string(),
            })
        }
    }

    fn sign(body: &[u8]) -> String {
        let mut mac = Hmac::<Sha1>::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(body);
        format!("sha1={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn dispatcher(hook: Arc<dyn Hook>) -> WebhookDispatcher {
        WebhookDispatcher::new(SecretString::new(SECRET.to_string()), hook)
    }

    fn signed_headers(body: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, sign(body).parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn runs_hook_for_authorized_delivery() {
        let hook = RecordingHook::new();
        let body = br#"{"pull_request": null}"#;

        let (status, response) = dispatcher(hook.clone())
            .handle(&signed_headers(body), body)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response, "OK");
        assert_eq!(hook.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejects_missing_signature_before_parsing() {
        let hook = RecordingHook::new();

        let (status, response) = dispatcher(hook.clone())
            .handle(&HeaderMap::new(), b"not even json")
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(response, "Missing signature");
        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_mismatched_signature() {
        let hook = RecordingHook::new();
        let headers = signed_headers(b"some other body");

        let (status, response) = dispatcher(hook.clone()).handle(&headers, b"{}").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(response, "Invalid signature");
        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_unparseable_payload_after_valid_signature() {
        let hook = RecordingHook::new();
        let body = b"not json";

        let (status, response) = dispatcher(hook.clone())
            .handle(&signed_headers(body), body)
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, "Missing request payload");
        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_null_payload() {
        let hook = RecordingHook::new();
        let body = b"null";

        let (status, _) = dispatcher(hook.clone())
            .handle(&signed_headers(body), body)
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn maps_upstream_failure_to_bad_gateway() {
        let body = b"{}";

        let (status, response) = dispatcher(Arc::new(FailingHook))
            .handle(&signed_headers(body), body)
            .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(response, "Upstream GitHub request failed");
    }
}
