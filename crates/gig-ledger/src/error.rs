//! Error types for ledger operations.

use gig_core::JobId;
use thiserror::Error;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur during escrow ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A hold already exists (or existed) for this job id.
    ///
    /// Job ids are never reused, so even a finalized hold blocks a new one.
    #[error("duplicate hold for job {job_id}")]
    DuplicateHold {
        /// The job id.
        job_id: JobId,
    },

    /// No funds are held for this job.
    #[error("no active hold for job {job_id}")]
    NoActiveHold {
        /// The job id.
        job_id: JobId,
    },

    /// The hold for this job was already released.
    #[error("hold for job {job_id} already released")]
    AlreadyReleased {
        /// The job id.
        job_id: JobId,
    },

    /// The hold for this job was already refunded.
    #[error("hold for job {job_id} already refunded")]
    AlreadyRefunded {
        /// The job id.
        job_id: JobId,
    },

    /// The hold is in a state the requested operation cannot act on.
    #[error("hold for job {job_id} is {state}, cannot {operation}")]
    InvalidHoldState {
        /// The job id.
        job_id: JobId,
        /// Current hold state.
        state: String,
        /// The rejected operation.
        operation: &'static str,
    },

    /// The funds-transfer backend rejected the operation.
    #[error("transfer rejected: {reason}")]
    TransferRejected {
        /// Reason reported by the backend.
        reason: String,
    },

    /// The funds-transfer backend did not answer within the timeout.
    #[error("backend unavailable: {operation} did not complete in {timeout_secs} seconds")]
    BackendUnavailable {
        /// Operation that timed out.
        operation: &'static str,
        /// Timeout duration.
        timeout_secs: u64,
    },
}

impl LedgerError {
    /// Check whether the failed operation is safe to retry.
    ///
    /// Only collaborator outages are retryable; consistency violations are
    /// final for the operation that produced them.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. })
    }
}
