//! Escrow entries and their hold state machine.
//!
//! One [`EscrowEntry`] tracks the funds held against one job. The state
//! machine splits each money movement into a start/complete pair so that
//! an entry is only marked `Released` or `Refunded` after the backend has
//! confirmed the transfer:
//!
//! - `Holding -> Locked` (debit confirmed)
//! - `Locked -> Releasing -> Released` (credit to the freelancer)
//! - `Locked -> Refunding -> Refunded` (credit back to the employer)
//!
//! `Releasing` and `Refunding` permit re-entry: a retry after a timed-out
//! backend call starts from the in-flight state again, and the backend
//! dedups the credit by job id.

use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use gig_core::{Address, Amount, JobId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of an escrow hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldState {
    /// Debit from the employer is in flight; funds not yet locked.
    Holding,
    /// Funds locked for the job.
    Locked,
    /// Credit to the freelancer is in flight.
    Releasing,
    /// Funds paid to the freelancer. Terminal.
    Released,
    /// Credit back to the employer is in flight.
    Refunding,
    /// Funds returned to the employer. Terminal.
    Refunded,
}

impl HoldState {
    /// Check if the hold is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Refunded)
    }

    /// Check if the hold currently locks funds.
    #[must_use]
    pub const fn holds_funds(&self) -> bool {
        matches!(self, Self::Locked | Self::Releasing | Self::Refunding)
    }

    /// Check if a release can start (or restart) from this state.
    #[must_use]
    pub const fn can_release(&self) -> bool {
        matches!(self, Self::Locked | Self::Releasing)
    }

    /// Check if a refund can start (or restart) from this state.
    #[must_use]
    pub const fn can_refund(&self) -> bool {
        matches!(self, Self::Locked | Self::Refunding)
    }
}

impl fmt::Display for HoldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Holding => write!(f, "holding"),
            Self::Locked => write!(f, "locked"),
            Self::Releasing => write!(f, "releasing"),
            Self::Released => write!(f, "released"),
            Self::Refunding => write!(f, "refunding"),
            Self::Refunded => write!(f, "refunded"),
        }
    }
}

/// Funds held against one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowEntry {
    /// The job this hold is for.
    pub job_id: JobId,

    /// The employer whose funds are held; refund target.
    pub employer: Address,

    /// Amount held.
    pub amount: Amount,

    /// Current hold state.
    pub state: HoldState,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last state change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl EscrowEntry {
    /// Create a new entry in the `Holding` state.
    #[must_use]
    pub fn new(job_id: JobId, employer: Address, amount: Amount) -> Self {
        let now = Utc::now();
        Self {
            job_id,
            employer,
            amount,
            state: HoldState::Holding,
            created_at: now,
            updated_at: now,
        }
    }

    fn set_state(&mut self, state: HoldState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    /// Mark the hold as locked (debit confirmed).
    ///
    /// # Errors
    ///
    /// Returns error if the entry is not `Holding`.
    pub fn lock(&mut self) -> Result<()> {
        if self.state != HoldState::Holding {
            return Err(LedgerError::InvalidHoldState {
                job_id: self.job_id,
                state: self.state.to_string(),
                operation: "lock",
            });
        }
        self.set_state(HoldState::Locked);
        Ok(())
    }

    /// Start (or restart) releasing the hold to the freelancer.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AlreadyReleased`] on replay of a completed
    /// release, [`LedgerError::AlreadyRefunded`] if the hold went the
    /// refund way, and [`LedgerError::NoActiveHold`] if the debit never
    /// completed.
    pub fn start_release(&mut self) -> Result<()> {
        match self.state {
            s if s.can_release() => {
                self.set_state(HoldState::Releasing);
                Ok(())
            }
            HoldState::Released => Err(LedgerError::AlreadyReleased {
                job_id: self.job_id,
            }),
            HoldState::Refunding | HoldState::Refunded => Err(LedgerError::AlreadyRefunded {
                job_id: self.job_id,
            }),
            _ => Err(LedgerError::NoActiveHold {
                job_id: self.job_id,
            }),
        }
    }

    /// Complete a release (credit confirmed).
    ///
    /// # Errors
    ///
    /// Returns error if no release is in flight.
    pub fn complete_release(&mut self) -> Result<()> {
        if self.state != HoldState::Releasing {
            return Err(LedgerError::InvalidHoldState {
                job_id: self.job_id,
                state: self.state.to_string(),
                operation: "complete release",
            });
        }
        self.set_state(HoldState::Released);
        Ok(())
    }

    /// Start (or restart) refunding the hold to the employer.
    ///
    /// # Errors
    ///
    /// Mirrors [`EscrowEntry::start_release`] with the directions swapped.
    pub fn start_refund(&mut self) -> Result<()> {
        match self.state {
            s if s.can_refund() => {
                self.set_state(HoldState::Refunding);
                Ok(())
            }
            HoldState::Refunded => Err(LedgerError::AlreadyRefunded {
                job_id: self.job_id,
            }),
            HoldState::Releasing | HoldState::Released => Err(LedgerError::AlreadyReleased {
                job_id: self.job_id,
            }),
            _ => Err(LedgerError::NoActiveHold {
                job_id: self.job_id,
            }),
        }
    }

    /// Complete a refund (credit confirmed).
    ///
    /// # Errors
    ///
    /// Returns error if no refund is in flight.
    pub fn complete_refund(&mut self) -> Result<()> {
        if self.state != HoldState::Refunding {
            return Err(LedgerError::InvalidHoldState {
                job_id: self.job_id,
                state: self.state.to_string(),
                operation: "complete refund",
            });
        }
        self.set_state(HoldState::Refunded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> EscrowEntry {
        EscrowEntry::new(
            JobId::from(1),
            Address::from_bytes(&[0x11; 20]),
            Amount::eth(2.0),
        )
    }

    #[test]
    fn test_new_entry_is_holding() {
        let e = entry();
        assert_eq!(e.state, HoldState::Holding);
        assert!(!e.state.holds_funds());
        assert!(!e.state.is_terminal());
    }

    #[test]
    fn test_release_path() {
        let mut e = entry();
        e.lock().expect("lock");
        assert!(e.state.holds_funds());

        e.start_release().expect("start release");
        assert_eq!(e.state, HoldState::Releasing);
        assert!(e.state.holds_funds());

        e.complete_release().expect("complete release");
        assert_eq!(e.state, HoldState::Released);
        assert!(e.state.is_terminal());
    }

    #[test]
    fn test_refund_path() {
        let mut e = entry();
        e.lock().expect("lock");
        e.start_refund().expect("start refund");
        assert_eq!(e.state, HoldState::Refunding);
        e.complete_refund().expect("complete refund");
        assert_eq!(e.state, HoldState::Refunded);
        assert!(e.state.is_terminal());
    }

    #[test]
    fn test_release_retry_from_releasing() {
        let mut e = entry();
        e.lock().expect("lock");
        e.start_release().expect("first attempt");
        // Timed out; retry restarts from Releasing.
        e.start_release().expect("retry");
        assert_eq!(e.state, HoldState::Releasing);
    }

    #[test]
    fn test_release_replay_rejected() {
        let mut e = entry();
        e.lock().expect("lock");
        e.start_release().expect("start");
        e.complete_release().expect("complete");

        let result = e.start_release();
        assert!(matches!(result, Err(LedgerError::AlreadyReleased { .. })));
    }

    #[test]
    fn test_refund_after_release_rejected() {
        let mut e = entry();
        e.lock().expect("lock");
        e.start_release().expect("start");
        e.complete_release().expect("complete");

        let result = e.start_refund();
        assert!(matches!(result, Err(LedgerError::AlreadyReleased { .. })));
    }

    #[test]
    fn test_release_after_refund_rejected() {
        let mut e = entry();
        e.lock().expect("lock");
        e.start_refund().expect("start");
        e.complete_refund().expect("complete");

        let result = e.start_release();
        assert!(matches!(result, Err(LedgerError::AlreadyRefunded { .. })));
    }

    #[test]
    fn test_release_before_lock_rejected() {
        let mut e = entry();
        let result = e.start_release();
        assert!(matches!(result, Err(LedgerError::NoActiveHold { .. })));
    }

    #[test]
    fn test_double_lock_rejected() {
        let mut e = entry();
        e.lock().expect("first lock");
        assert!(e.lock().is_err());
    }

    #[test]
    fn test_complete_without_start_rejected() {
        let mut e = entry();
        e.lock().expect("lock");
        assert!(e.complete_release().is_err());
        assert!(e.complete_refund().is_err());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(HoldState::Locked.to_string(), "locked");
        assert_eq!(HoldState::Releasing.to_string(), "releasing");
        assert_eq!(HoldState::Refunded.to_string(), "refunded");
    }

    #[test]
    fn test_serialization() {
        let e = entry();
        let json = serde_json::to_string(&e).expect("serialize");
        let parsed: EscrowEntry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(e.job_id, parsed.job_id);
        assert_eq!(e.state, parsed.state);
        assert_eq!(e.amount, parsed.amount);
    }
}
