/// The request never produced an HTTP response (offline, DNS failure, timeout, bad setup).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("Server unreachable: {message}")]
    Unreachable { message: String },
}

/// Errors crossing the server boundary.
///
/// Application-level refusals (`success: false`, non-2xx) are not errors; they
/// parse into `ActionOutcome::Failure`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Malformed response (HTTP {status}): {reason}")]
    Malformed { status: u16, reason: String },
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
