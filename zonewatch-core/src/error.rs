use thiserror::Error;

/// Errors raised while building a poller or its client.
#[derive(Error, Debug)]
pub enum ZoneWatchError {
    #[error("Invalid zone id: {0:?}")]
    InvalidZoneId(String),

    #[error("Invalid poll interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid API base URL: {0}")]
    InvalidApiBase(String),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}

pub type Result<T> = std::result::Result<T, ZoneWatchError>;

/// Why a single zone status check did not produce a status.
///
/// A zone that is still syncing is not an error; it comes back as a normal
/// [`ZoneQueryResult`](crate::zone::ZoneQueryResult).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PollError {
    /// The request never produced a response (connect, DNS, reset, timeout).
    #[error("transport failure: {0}")]
    Transport(String),

    /// A response arrived but could not be interpreted.
    #[error("protocol failure: {0}")]
    Protocol(String),

    /// The provider answered with `success: false`.
    #[error("API reported failure: {raw}")]
    Application { raw: serde_json::Value },
}

impl PollError {
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Transport(_) => "transport",
            PollError::Protocol(_) => "protocol",
            PollError::Application { .. } => "application",
        }
    }
}

impl From<serde_json::Error> for PollError {
    fn from(e: serde_json::Error) -> Self {
        PollError::Protocol(format!("malformed JSON: {}", e))
    }
}
