//! Pull-request hook: run a policy check on every commit, report each verdict

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::{HookError, Result};
use crate::github::StatusClient;
use crate::hooks::{Hook, PolicyCheck};

/// Generic "list commits, check each, report each" orchestration. The rule
/// itself is injected, so swapping policies is a configuration change.
pub struct CommitCheckHook {
    client: StatusClient,
    policy: Box<dyn PolicyCheck>,
}

impl CommitCheckHook {
    pub fn new(client: StatusClient, policy: Box<dyn PolicyCheck>) -> Self {
        Self { client, policy }
    }
}

#[async_trait]
impl Hook for CommitCheckHook {
    async fn run(&self, payload: Value) -> Result<String> {
        let Some(pull_request) = payload.get("pull_request") else {
            debug!("Payload has no pull_request, nothing to check");
            return Ok("OK".to_string());
        };

        let commits_url = pull_request
            .get("commits_url")
            .and_then(Value::as_str)
            .ok_or_else(|| HookError::Payload("No commits_url in pull_request".to_string()))?;
        let repo = payload
            .get("repository")
            .and_then(|r| r.get("full_name"))
            .and_then(Value::as_str)
            .ok_or_else(|| HookError::Payload("No full_name in repository".to_string()))?;

        // Without the commit list there is nothing to report; this is the one
        // failure that aborts the whole delivery.
        let commits = self.client.list_commits(commits_url).await?;
        info!("Checking {} commits on {}", commits.len(), repo);

        for commit in &commits {
            let result = match self.policy.check(commit) {
                Ok(result) => result,
                Err(e) => {
                    error!(
                        "{} errored on commit {}: {}",
                        self.policy.name(),
                        commit.sha,
                        e
                    );
                    continue;
                }
            };

            info!(
                "{}: commit {} -> {:?}",
                self.policy.name(),
                commit.sha,
                result.state
            );

            // A failed report must not stop the remaining commits.
            if let Err(e) = self.client.set_status(repo, &commit.sha, &result).await {
                error!("Failed to set status on commit {}: {}", commit.sha, e);
            }
        }

        Ok("OK".to_string())
    }
}
