//! Error types for engine operations.

use gig_core::{JobId, JobStatus};
use gig_ledger::LedgerError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by [`crate::JobEscrowEngine`] operations.
///
/// Every failure is returned to the caller as a typed value; nothing is
/// swallowed. Only collaborator outages ([`EngineError::EscrowUnavailable`],
/// [`EngineError::OracleUnavailable`]) are worth retrying.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed request (empty fields, zero payment). Never retried.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the validation failure.
        message: String,
    },

    /// Unknown job id.
    #[error("job {job_id} not found")]
    NotFound {
        /// The job id.
        job_id: JobId,
    },

    /// Caller lacks authority for this job. Never retried.
    #[error("forbidden: {reason}")]
    Forbidden {
        /// Why the caller is not allowed.
        reason: String,
    },

    /// Operation illegal for the job's current lifecycle state.
    #[error("invalid state for job {job_id}: currently {current}")]
    InvalidState {
        /// The job id.
        job_id: JobId,
        /// The job's current status, so the caller can reconcile.
        current: JobStatus,
    },

    /// The payment for this job was already released.
    #[error("payment for job {job_id} already released")]
    AlreadyReleased {
        /// The job id.
        job_id: JobId,
    },

    /// The escrow ledger's backend is unreachable or refused the transfer.
    /// Retryable by the caller with backoff; the engine never auto-retries
    /// money movement.
    #[error("escrow unavailable: {reason}")]
    EscrowUnavailable {
        /// Description of the outage.
        reason: String,
    },

    /// The price oracle is unreachable. Degrades display only; job state
    /// is unaffected.
    #[error("oracle unavailable: {reason}")]
    OracleUnavailable {
        /// Description of the outage.
        reason: String,
    },

    /// Ledger consistency violation (duplicate hold, missing hold,
    /// replayed refund). Fatal to the operation, logged, never ignored.
    #[error("ledger error: {0}")]
    Ledger(LedgerError),
}

impl EngineError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a forbidden error.
    #[must_use]
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Create an invalid state error.
    #[must_use]
    pub const fn invalid_state(job_id: JobId, current: JobStatus) -> Self {
        Self::InvalidState { job_id, current }
    }

    /// Check whether the failed operation is safe to retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::EscrowUnavailable { .. } | Self::OracleUnavailable { .. }
        )
    }
}

impl From<LedgerError> for EngineError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::BackendUnavailable { .. } => Self::EscrowUnavailable {
                reason: e.to_string(),
            },
            LedgerError::TransferRejected { ref reason } => Self::EscrowUnavailable {
                reason: reason.clone(),
            },
            LedgerError::AlreadyReleased { job_id } => Self::AlreadyReleased { job_id },
            LedgerError::DuplicateHold { .. }
            | LedgerError::NoActiveHold { .. }
            | LedgerError::AlreadyRefunded { .. }
            | LedgerError::InvalidHoldState { .. } => Self::Ledger(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_display() {
        let err = EngineError::invalid_state(JobId::from(3), JobStatus::Assigned);
        let s = err.to_string();
        assert!(s.contains('3'));
        assert!(s.contains("assigned"));
    }

    #[test]
    fn test_retryability() {
        assert!(
            EngineError::EscrowUnavailable {
                reason: "timeout".to_string()
            }
            .is_retryable()
        );
        assert!(
            EngineError::OracleUnavailable {
                reason: "timeout".to_string()
            }
            .is_retryable()
        );
        assert!(!EngineError::forbidden("not the employer").is_retryable());
        assert!(!EngineError::invalid_input("empty title").is_retryable());
        assert!(
            !EngineError::AlreadyReleased {
                job_id: JobId::from(1)
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_ledger_timeout_maps_to_escrow_unavailable() {
        let err: EngineError = LedgerError::BackendUnavailable {
            operation: "credit",
            timeout_secs: 10,
        }
        .into();
        assert!(matches!(err, EngineError::EscrowUnavailable { .. }));
    }

    #[test]
    fn test_ledger_replay_maps_to_already_released() {
        let err: EngineError = LedgerError::AlreadyReleased {
            job_id: JobId::from(4),
        }
        .into();
        assert!(matches!(
            err,
            EngineError::AlreadyReleased { job_id } if job_id == JobId::from(4)
        ));
    }

    #[test]
    fn test_ledger_consistency_is_preserved() {
        let err: EngineError = LedgerError::DuplicateHold {
            job_id: JobId::from(2),
        }
        .into();
        assert!(matches!(err, EngineError::Ledger(_)));
    }
}
