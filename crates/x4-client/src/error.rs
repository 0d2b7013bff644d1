//! Error types for the hub client.

/// Errors returned by [`X4ApiClient`](crate::X4ApiClient) calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request did not complete within the configured timeout.
    #[error("request timeout")]
    Timeout,

    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Transport(reqwest::Error),

    /// The hub answered with a non-success status.
    ///
    /// `message` is the hub's `error` field when the body carries one,
    /// otherwise the status line.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the hub.
        message: String,
    },

    /// The response body did not match the expected type.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// A request URL could not be built from the base URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Command parameters could not be serialized.
    #[error("invalid command parameters: {0}")]
    Params(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status code, if the hub answered at all.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the hub reported the resource as absent.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e)
        }
    }
}
