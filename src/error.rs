use std::fmt;

use serde::Serialize;

/// Coarse classification shared by every domain error.
///
/// Callers at the edge (an HTTP layer, a CLI) map on the kind rather than on the
/// concrete variant, and use [`ErrorKind::is_retryable`] to pick a retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Caller-supplied data violates a precondition.
    InvalidInput,
    /// A referenced entity does not exist.
    NotFound,
    /// The requested status change is not a legal edge for the order's current status.
    InvalidTransition,
    /// The payment provider could not be reached or refused the request.
    GatewayUnavailable,
    /// A gateway notification could not be parsed.
    MalformedCallback,
    /// Transaction, mailbox or timeout failure in the storage path.
    StorageFailure,
}

impl ErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::GatewayUnavailable | ErrorKind::StorageFailure)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InvalidTransition => "INVALID_TRANSITION",
            ErrorKind::GatewayUnavailable => "GATEWAY_UNAVAILABLE",
            ErrorKind::MalformedCallback => "MALFORMED_CALLBACK",
            ErrorKind::StorageFailure => "STORAGE_FAILURE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_kinds_are_retryable() {
        assert!(ErrorKind::GatewayUnavailable.is_retryable());
        assert!(ErrorKind::StorageFailure.is_retryable());
        assert!(!ErrorKind::InvalidInput.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
        assert!(!ErrorKind::InvalidTransition.is_retryable());
        assert!(!ErrorKind::MalformedCallback.is_retryable());
    }

    #[test]
    fn kind_serializes_as_error_code() {
        let code = serde_json::to_string(&ErrorKind::MalformedCallback).unwrap();
        assert_eq!(code, "\"MALFORMED_CALLBACK\"");
        assert_eq!(ErrorKind::NotFound.to_string(), "NOT_FOUND");
    }
}
