use reqwest::StatusCode;

/// Failure talking to the remote link store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Errors surfaced by the board's user-facing operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("link store is not configured yet")]
    ConfigNotReady,

    #[error("could not load links: {0}")]
    Sync(#[source] StoreError),

    #[error("{0} is required")]
    Validation(&'static str),

    #[error("admin authorization failed")]
    Auth,

    #[error("could not save changes: {0}")]
    Write(#[source] StoreError),
}

/// Errors loading preferences or store secrets.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("keyring: {0}")]
    Keyring(String),
}
