//! User-facing error text, one message class per failure category

use super::phase::Phase;
use crate::api::TransportError;
use crate::session::{ErrorCategory, ErrorState};

pub const EMPTY_TEXT: &str = "Please enter a message to check";

pub const EMPTY_BATCH: &str = "Please enter at least one message to check";

pub fn validation(message: &str) -> ErrorState {
    ErrorState::new(ErrorCategory::Validation, message)
}

pub fn not_connected(phase: Phase) -> ErrorState {
    let message = match phase {
        Phase::Probing => "Still connecting to the classification service, please wait",
        Phase::Submitting => "A prediction is already in progress",
        _ => "Not connected to the classification service. Retry the connection first",
    };
    ErrorState::new(ErrorCategory::NotConnected, message)
}

fn category(err: &TransportError) -> ErrorCategory {
    if err.is_unreachable() {
        ErrorCategory::Unreachable
    } else {
        ErrorCategory::Server
    }
}

/// Failure of the connectivity probe
pub fn probe_failure(err: &TransportError, base_url: &str) -> ErrorState {
    let message = match err {
        TransportError::NoResponse { .. } => format!(
            "Cannot reach the classification service at {}; it may be offline or still starting up. Try again in a moment",
            base_url
        ),
        TransportError::Server { status: 404, .. } => format!(
            "The classification service at {} answered 404. Check that the service URL points at the deployed API",
            base_url
        ),
        TransportError::Server { status, message } | TransportError::Decode { status, message } => {
            format!(
                "The classification service responded with HTTP {}: {}",
                status, message
            )
        }
    };
    ErrorState::new(category(err), message)
}

/// Failure of a predict call; `action` names the operation ("prediction", "batch prediction")
pub fn request_failure(err: &TransportError, action: &str) -> ErrorState {
    let message = match err {
        TransportError::NoResponse { .. } => format!(
            "Could not reach the classification service for the {}. Check the connection and submit again",
            action
        ),
        TransportError::Server { status, message } => {
            format!("The {} failed (HTTP {}): {}", action, status, message)
        }
        TransportError::Decode { status, message } => format!(
            "The {} returned an unreadable response (HTTP {}): {}",
            action, status, message
        ),
    };
    ErrorState::new(category(err), message)
}

/// Secondary warning for failed history/analytics refreshes
pub fn refresh_warning(failures: &[String]) -> String {
    format!("Could not refresh {}", failures.join(" or "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_failure_categories() {
        let unreachable = TransportError::NoResponse {
            url: "http://svc/".to_string(),
            message: "connection failed".to_string(),
        };
        let missing = TransportError::Server {
            status: 404,
            message: "Not Found".to_string(),
        };
        let broken = TransportError::Server {
            status: 503,
            message: "warming up".to_string(),
        };

        assert_eq!(
            probe_failure(&unreachable, "http://svc").category,
            ErrorCategory::Unreachable
        );
        assert!(probe_failure(&missing, "http://svc").message.contains("404"));

        let state = probe_failure(&broken, "http://svc");
        assert_eq!(state.category, ErrorCategory::Server);
        assert!(state.message.contains("503"));
        assert!(state.message.contains("warming up"));
    }

    #[test]
    fn test_request_failure_keeps_server_message() {
        let err = TransportError::Server {
            status: 422,
            message: "text too long".to_string(),
        };
        let state = request_failure(&err, "prediction");
        assert_eq!(state.category, ErrorCategory::Server);
        assert_eq!(state.message, "The prediction failed (HTTP 422): text too long");
    }
}
