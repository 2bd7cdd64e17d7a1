//! Error types for core domain operations.

use thiserror::Error;

/// Result type alias for core domain operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while constructing or transitioning domain types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid participant address format.
    #[error("invalid address: {message}")]
    InvalidAddress {
        /// Description of the address error.
        message: String,
    },

    /// Invalid payment amount.
    #[error("invalid amount: {message}")]
    InvalidAmount {
        /// Description of the amount error.
        message: String,
    },

    /// Invalid job fields (empty title/description, zero payment).
    #[error("invalid job: {message}")]
    InvalidJob {
        /// Description of the validation failure.
        message: String,
    },

    /// Illegal job lifecycle transition.
    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition {
        /// The current status.
        from: String,
        /// The attempted target status.
        to: String,
    },
}

impl CoreError {
    /// Create an invalid address error.
    #[must_use]
    pub fn invalid_address(message: impl Into<String>) -> Self {
        Self::InvalidAddress {
            message: message.into(),
        }
    }

    /// Create an invalid amount error.
    #[must_use]
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }

    /// Create an invalid job error.
    #[must_use]
    pub fn invalid_job(message: impl Into<String>) -> Self {
        Self::InvalidJob {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_job_display() {
        let err = CoreError::invalid_job("title must not be empty");
        assert!(err.to_string().contains("title must not be empty"));
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = CoreError::InvalidTransition {
            from: "released".to_string(),
            to: "assigned".to_string(),
        };
        assert!(err.to_string().contains("released"));
        assert!(err.to_string().contains("assigned"));
    }
}
