//! Minimal GitHub REST client: list pull-request commits, set commit statuses

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{HookError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// State reported to the commit-status API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Success,
    Failure,
    Pending,
    Error,
}

/// Verdict of one policy check on one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub context: String,
    pub state: CheckState,
    pub message: Option<String>,
}

impl CheckResult {
    pub fn success(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            state: CheckState::Success,
            message: None,
        }
    }

    pub fn failure(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            state: CheckState::Failure,
            message: Some(message.into()),
        }
    }
}

/// Minimal projection of GitHub's commit JSON, just what a policy check needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
struct CommitDetail {
    message: String,
}

impl Commit {
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            commit: CommitDetail {
                message: message.into(),
            },
        }
    }

    pub fn message(&self) -> &str {
        &self.commit.message
    }
}

/// Body of a `POST /repos/{repo}/statuses/{sha}` call. `description` is
/// omitted entirely when the check produced no message.
#[derive(Debug, Serialize)]
struct StatusBody<'a> {
    context: &'a str,
    state: CheckState,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Authenticated client for the two GitHub endpoints this service needs.
pub struct StatusClient {
    http: reqwest::Client,
    api_base: String,
}

impl StatusClient {
    pub fn new(token: &SecretString, api_base: impl Into<String>) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("token {}", token.expose_secret()))
            .map_err(|_| {
                HookError::Config("GITHUB_AUTH_TOKEN is not a valid header value".to_string())
            })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.into(),
        })
    }

    /// Fetches the commits on a pull request. The URL comes straight from the
    /// webhook payload and is requested as-is, never reconstructed.
    pub async fn list_commits(&self, commits_url: &str) -> Result<Vec<Commit>> {
        let response = self.http.get(commits_url).send().await?;
        if !response.status().is_success() {
            return Err(HookError::Api {
                status: response.status().as_u16(),
                url: commits_url.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// Reports one check verdict on one commit.
    pub async fn set_status(&self, repo: &str, sha: &str, result: &CheckResult) -> Result<()> {
        let url = format!("{}/repos/{}/statuses/{}", self.api_base, repo, sha);
        let body = StatusBody {
            context: &result.context,
            state: result.state,
            description: result.message.as_deref(),
        };

        let response = self.http.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(HookError::Api {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(())
    }
}
