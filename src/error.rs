/// Custom error type for commit_gate operations
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Payload(String),

    #[error("GitHub request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitHub returned HTTP {status} for {url}")]
    Api { status: u16, url: String },

    #[error("Policy check failed: {0}")]
    Policy(String),
}

/// Helper type for Results that use HookError
pub type Result<T> = std::result::Result<T, HookError>;
