//! Funds-transfer backend collaborator.
//!
//! The ledger never touches balances itself; it asks a [`TransferBackend`]
//! to move value. Every call carries the job id as an idempotency key: the
//! backend must apply at most one debit and at most one credit per key, so
//! the ledger may safely retry after a timeout.

use gig_core::{Address, Amount, JobId};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Errors reported by a funds-transfer backend.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The source account does not cover the debit.
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds {
        /// Current balance.
        have: Amount,
        /// Required balance.
        need: Amount,
    },

    /// The backend refused the transfer.
    #[error("transfer rejected: {reason}")]
    Rejected {
        /// Reason for the rejection.
        reason: String,
    },
}

/// External service that moves funds between accounts.
///
/// Implementations must be idempotent per `key`: replaying a debit or a
/// credit with a key that was already applied is a successful no-op. The
/// ledger relies on this for at-least-once retry of money movement.
#[allow(async_fn_in_trait)]
pub trait TransferBackend: Send + Sync {
    /// Debit `amount` from `from`, at most once per `key`.
    async fn debit(
        &self,
        from: &Address,
        amount: Amount,
        key: JobId,
    ) -> std::result::Result<(), TransferError>;

    /// Credit `amount` to `to`, at most once per `key`.
    async fn credit(
        &self,
        to: &Address,
        amount: Amount,
        key: JobId,
    ) -> std::result::Result<(), TransferError>;
}

#[derive(Debug, Default)]
struct BankState {
    accounts: HashMap<Address, Amount>,
    applied_debits: HashSet<JobId>,
    applied_credits: HashSet<JobId>,
}

/// In-process funds-transfer backend for development and tests.
///
/// Keeps balances in memory and dedups debits and credits by job id, which
/// makes it a faithful stand-in for the real backend's idempotency
/// contract.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    state: Mutex<BankState>,
}

impl InMemoryBank {
    /// Create an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add funds to an account (test/bootstrap helper, no idempotency key).
    pub fn deposit(&self, to: &Address, amount: Amount) {
        let mut state = self.state.lock();
        let balance = state.accounts.entry(to.clone()).or_insert(Amount::ZERO);
        *balance = balance.saturating_add(amount);
        debug!(account = %to, amount = %amount, "deposit");
    }

    /// Get the balance of an account.
    #[must_use]
    pub fn balance(&self, account: &Address) -> Amount {
        self.state
            .lock()
            .accounts
            .get(account)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Sum of all account balances.
    #[must_use]
    pub fn total_balance(&self) -> Amount {
        self.state
            .lock()
            .accounts
            .values()
            .fold(Amount::ZERO, |acc, b| acc.saturating_add(*b))
    }
}

impl TransferBackend for InMemoryBank {
    async fn debit(
        &self,
        from: &Address,
        amount: Amount,
        key: JobId,
    ) -> std::result::Result<(), TransferError> {
        let mut state = self.state.lock();
        if state.applied_debits.contains(&key) {
            debug!(account = %from, key = %key, "debit replay ignored");
            return Ok(());
        }

        let have = state.accounts.get(from).copied().unwrap_or(Amount::ZERO);
        let remaining = have
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientFunds { have, need: amount })?;

        state.accounts.insert(from.clone(), remaining);
        state.applied_debits.insert(key);
        debug!(account = %from, amount = %amount, key = %key, "debit applied");
        Ok(())
    }

    async fn credit(
        &self,
        to: &Address,
        amount: Amount,
        key: JobId,
    ) -> std::result::Result<(), TransferError> {
        let mut state = self.state.lock();
        if state.applied_credits.contains(&key) {
            debug!(account = %to, key = %key, "credit replay ignored");
            return Ok(());
        }

        let balance = state.accounts.entry(to.clone()).or_insert(Amount::ZERO);
        *balance = balance.saturating_add(amount);
        state.applied_credits.insert(key);
        debug!(account = %to, amount = %amount, key = %key, "credit applied");
        Ok(())
    }
}
