//! Error types for selector resolution, extraction, and registry operations.
//!
//! Every error maps to a stable [`ErrorCode`] and a `recoverable` flag so
//! callers above this crate can decide whether a failed operation is worth
//! retrying (transient page or transport state) or must be aborted
//! (configuration defect, authentication loss).

use crate::resolve::Attempt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, AutomationError>;

/// Stable error codes surfaced across the crate boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No strategy in a selector chain produced a unique match
    SelectorError,
    /// The document is not in the state the caller expected
    ValidationError,
    /// Transport-level failure passed through from a boundary layer
    NetworkError,
    /// An operation exceeded its deadline
    TimeoutError,
    /// Authentication was lost or rejected
    AuthError,
    /// A registry lookup named a page or entry that does not exist
    NotFoundError,
    /// A registry registration collided with an existing version
    ConflictError,
    /// Anything that does not fit the categories above
    UnknownError,
}

/// Errors produced by the selector registry, resolver, and extractors
#[derive(Debug, Error)]
pub enum AutomationError {
    /// All strategies for a selector entry were exhausted without a unique match
    #[error("selector '{entry}' exhausted {} strategies without a unique match", attempts.len())]
    SelectorExhausted {
        /// Name of the selector entry that failed
        entry: String,
        /// Outcome of every strategy that was tried, in order
        attempts: Vec<Attempt>,
    },

    /// The page or document is not in the expected state
    #[error("validation failed: {0}")]
    Validation(String),

    /// Transport failure reported by a boundary layer
    #[error("network failure: {0}")]
    Network(String),

    /// Deadline exceeded
    #[error("timed out: {0}")]
    Timeout(String),

    /// Authentication failure reported by a boundary layer
    #[error("authentication failure: {0}")]
    Auth(String),

    /// Registry lookup for a missing page or entry
    #[error("not found: {0}")]
    NotFound(String),

    /// Registry registration conflicting with an already published version
    #[error("conflict: page '{page_id}' version {version} is already published with different content")]
    Conflict {
        /// Page whose version collided
        page_id: String,
        /// The colliding version number
        version: u32,
    },

    /// Catch-all for failures outside the taxonomy
    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl AutomationError {
    /// Stable code for this error, suitable for serialization
    pub fn code(&self) -> ErrorCode {
        match self {
            AutomationError::SelectorExhausted { .. } => ErrorCode::SelectorError,
            AutomationError::Validation(_) => ErrorCode::ValidationError,
            AutomationError::Network(_) => ErrorCode::NetworkError,
            AutomationError::Timeout(_) => ErrorCode::TimeoutError,
            AutomationError::Auth(_) => ErrorCode::AuthError,
            AutomationError::NotFound(_) => ErrorCode::NotFoundError,
            AutomationError::Conflict { .. } => ErrorCode::ConflictError,
            AutomationError::Unknown(_) => ErrorCode::UnknownError,
        }
    }

    /// Whether a caller may reasonably retry the failed operation.
    ///
    /// Selector, network, and timeout failures are often transient page or
    /// transport states. Registry and validation failures indicate a
    /// configuration defect and retrying cannot fix them.
    pub fn recoverable(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::SelectorError | ErrorCode::NetworkError | ErrorCode::TimeoutError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AutomationError::NotFound("page 'orders'".to_string());
        assert_eq!(err.code(), ErrorCode::NotFoundError);

        let err = AutomationError::Conflict {
            page_id: "cart".to_string(),
            version: 2,
        };
        assert_eq!(err.code(), ErrorCode::ConflictError);

        let err = AutomationError::SelectorExhausted {
            entry: "order_list".to_string(),
            attempts: vec![],
        };
        assert_eq!(err.code(), ErrorCode::SelectorError);
    }

    #[test]
    fn test_recoverable_flags() {
        assert!(AutomationError::Network("reset".to_string()).recoverable());
        assert!(AutomationError::Timeout("5s elapsed".to_string()).recoverable());
        assert!(
            AutomationError::SelectorExhausted {
                entry: "cart_item".to_string(),
                attempts: vec![],
            }
            .recoverable()
        );

        assert!(!AutomationError::Validation("wrong page".to_string()).recoverable());
        assert!(!AutomationError::Auth("session expired".to_string()).recoverable());
        assert!(!AutomationError::NotFound("entry".to_string()).recoverable());
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::SelectorError).unwrap();
        assert_eq!(json, "\"SELECTOR_ERROR\"");

        let json = serde_json::to_string(&ErrorCode::TimeoutError).unwrap();
        assert_eq!(json, "\"TIMEOUT_ERROR\"");
    }

    #[test]
    fn test_display_messages() {
        let err = AutomationError::Conflict {
            page_id: "orders".to_string(),
            version: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("orders"));
        assert!(msg.contains('3'));
    }
}
