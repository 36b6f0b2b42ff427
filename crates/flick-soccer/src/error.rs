use thiserror::Error;

/// Problems loading or validating a [`crate::config::MatchConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Delivery failure reported by a [`crate::session::SessionSink`].
/// The match logs these and carries on.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session transport error: {0}")]
    Transport(String),

    #[error("Session sink unavailable")]
    Unavailable,
}
