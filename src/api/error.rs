use thiserror::Error;

/// Failure of a single request to the classification service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Nothing came back: DNS, connect, reset, or timeout
    #[error("no response from {url}: {message}")]
    NoResponse { url: String, message: String },

    /// The service answered with a failure status or an explicit error body
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The service answered 2xx but the body could not be understood
    #[error("unreadable response (HTTP {status}): {message}")]
    Decode { status: u16, message: String },
}

impl TransportError {
    pub(crate) fn no_response(url: &str, err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };

        TransportError::NoResponse {
            url: url.to_string(),
            message,
        }
    }

    /// Status code when a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::NoResponse { .. } => None,
            TransportError::Server { status, .. } | TransportError::Decode { status, .. } => {
                Some(*status)
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            TransportError::NoResponse { message, .. }
            | TransportError::Server { message, .. }
            | TransportError::Decode { message, .. } => message,
        }
    }

    /// True when no response was received at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::NoResponse { .. })
    }
}
