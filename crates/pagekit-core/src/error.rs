use thiserror::Error;

/// Failures that are returned to the caller.
///
/// User-facing problems (bad registrations, unknown keys) are not errors in
/// this sense; they are reported through [`crate::notice::Notice`] instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no active page on the page stack")]
    NoActivePage,

    #[error("navigation to '{url}' failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("payload error: {0}")]
    Payload(String),

    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
