//! The escrow ledger.
//!
//! [`EscrowLedger`] owns all escrow entries and orchestrates money
//! movement through the [`TransferBackend`]. Backend calls run under a
//! bounded timeout; the entries map is only locked for short, await-free
//! sections, so holds for distinct jobs never block one another.

use crate::backend::TransferBackend;
use crate::entry::{EscrowEntry, HoldState};
use crate::error::{LedgerError, Result};
use gig_core::{Address, Amount, JobId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Maximum time to wait for a single backend debit/credit.
    pub backend_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend_timeout: Duration::from_secs(10),
        }
    }
}

/// Per-job escrow bookkeeping over a funds-transfer backend.
///
/// The ledger guarantees exactly-once payout per job: a release (or
/// refund) is only finalized after the backend confirms the credit, and a
/// replay of a finalized operation is rejected, never silently re-paid.
#[derive(Debug)]
pub struct EscrowLedger<B> {
    backend: B,
    config: LedgerConfig,
    entries: Mutex<HashMap<JobId, EscrowEntry>>,
}

impl<B: TransferBackend> EscrowLedger<B> {
    /// Create a ledger with the default configuration.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, LedgerConfig::default())
    }

    /// Create a ledger with an explicit configuration.
    #[must_use]
    pub fn with_config(backend: B, config: LedgerConfig) -> Self {
        Self {
            backend,
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Hold `amount` of the employer's funds against `job_id`.
    ///
    /// Debits the employer through the backend and records the hold. On
    /// backend failure or timeout the placeholder entry is removed and the
    /// hold never existed as far as later operations are concerned.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateHold`] if a hold was ever recorded
    /// for this job id, [`LedgerError::TransferRejected`] if the backend
    /// refuses the debit, or [`LedgerError::BackendUnavailable`] on
    /// timeout.
    pub async fn hold(&self, job_id: JobId, employer: &Address, amount: Amount) -> Result<()> {
        {
            let mut entries = self.entries.lock();
            if entries.contains_key(&job_id) {
                return Err(LedgerError::DuplicateHold { job_id });
            }
            entries.insert(job_id, EscrowEntry::new(job_id, employer.clone(), amount));
        }

        match timeout(
            self.config.backend_timeout,
            self.backend.debit(employer, amount, job_id),
        )
        .await
        {
            Ok(Ok(())) => {
                let mut entries = self.entries.lock();
                let entry = entries
                    .get_mut(&job_id)
                    .ok_or(LedgerError::NoActiveHold { job_id })?;
                entry.lock()?;
                info!(job_id = %job_id, employer = %employer, amount = %amount, "hold locked");
                Ok(())
            }
            Ok(Err(e)) => {
                self.entries.lock().remove(&job_id);
                warn!(job_id = %job_id, error = %e, "hold debit rejected");
                Err(LedgerError::TransferRejected {
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                self.entries.lock().remove(&job_id);
                warn!(job_id = %job_id, "hold debit timed out");
                Err(LedgerError::BackendUnavailable {
                    operation: "debit",
                    timeout_secs: self.config.backend_timeout.as_secs(),
                })
            }
        }
    }

    /// Release the hold for `job_id` to `to`, exactly once.
    ///
    /// The entry moves to `Releasing` before the backend credit and to
    /// `Released` only after the credit confirms. A timeout leaves the
    /// entry `Releasing`; retrying is safe because the backend dedups the
    /// credit by job id.
    ///
    /// Returns the amount paid.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NoActiveHold`] if nothing is held,
    /// [`LedgerError::AlreadyReleased`]/[`LedgerError::AlreadyRefunded`]
    /// on replay of a finalized hold, or a backend failure.
    pub async fn release(&self, job_id: JobId, to: &Address) -> Result<Amount> {
        let amount = {
            let mut entries = self.entries.lock();
            let entry = entries
                .get_mut(&job_id)
                .ok_or(LedgerError::NoActiveHold { job_id })?;
            entry.start_release()?;
            entry.amount
        };

        match timeout(
            self.config.backend_timeout,
            self.backend.credit(to, amount, job_id),
        )
        .await
        {
            Ok(Ok(())) => {
                let mut entries = self.entries.lock();
                let entry = entries
                    .get_mut(&job_id)
                    .ok_or(LedgerError::NoActiveHold { job_id })?;
                entry.complete_release()?;
                info!(job_id = %job_id, to = %to, amount = %amount, "hold released");
                Ok(amount)
            }
            Ok(Err(e)) => {
                // Entry stays Releasing; the caller may retry.
                warn!(job_id = %job_id, error = %e, "release credit rejected");
                Err(LedgerError::TransferRejected {
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                warn!(job_id = %job_id, "release credit timed out");
                Err(LedgerError::BackendUnavailable {
                    operation: "credit",
                    timeout_secs: self.config.backend_timeout.as_secs(),
                })
            }
        }
    }

    /// Refund the hold for `job_id` back to the employer, exactly once.
    ///
    /// Same two-phase, retry-safe shape as [`EscrowLedger::release`], for
    /// abnormal cancellation paths.
    ///
    /// # Errors
    ///
    /// Mirrors [`EscrowLedger::release`] with the directions swapped.
    pub async fn refund(&self, job_id: JobId) -> Result<Amount> {
        let (amount, employer) = {
            let mut entries = self.entries.lock();
            let entry = entries
                .get_mut(&job_id)
                .ok_or(LedgerError::NoActiveHold { job_id })?;
            entry.start_refund()?;
            (entry.amount, entry.employer.clone())
        };

        match timeout(
            self.config.backend_timeout,
            self.backend.credit(&employer, amount, job_id),
        )
        .await
        {
            Ok(Ok(())) => {
                let mut entries = self.entries.lock();
                let entry = entries
                    .get_mut(&job_id)
                    .ok_or(LedgerError::NoActiveHold { job_id })?;
                entry.complete_refund()?;
                info!(job_id = %job_id, employer = %employer, amount = %amount, "hold refunded");
                Ok(amount)
            }
            Ok(Err(e)) => {
                warn!(job_id = %job_id, error = %e, "refund credit rejected");
                Err(LedgerError::TransferRejected {
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                warn!(job_id = %job_id, "refund credit timed out");
                Err(LedgerError::BackendUnavailable {
                    operation: "credit",
                    timeout_secs: self.config.backend_timeout.as_secs(),
                })
            }
        }
    }

    /// Amount currently locked for `job_id`, if any.
    #[must_use]
    pub fn held(&self, job_id: JobId) -> Option<Amount> {
        self.entries
            .lock()
            .get(&job_id)
            .filter(|e| e.state.holds_funds())
            .map(|e| e.amount)
    }

    /// Snapshot of the entry for `job_id`.
    #[must_use]
    pub fn entry(&self, job_id: JobId) -> Option<EscrowEntry> {
        self.entries.lock().get(&job_id).cloned()
    }

    /// Sum of all currently locked hold amounts.
    #[must_use]
    pub fn total_locked(&self) -> Amount {
        self.entries
            .lock()
            .values()
            .filter(|e| e.state.holds_funds())
            .fold(Amount::ZERO, |acc, e| acc.saturating_add(e.amount))
    }

    /// Check whether the hold for `job_id` was released.
    #[must_use]
    pub fn is_released(&self, job_id: JobId) -> bool {
        self.entries
            .lock()
            .get(&job_id)
            .is_some_and(|e| e.state == HoldState::Released)
    }
}
