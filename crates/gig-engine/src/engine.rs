//! Job escrow lifecycle orchestration.
//!
//! [`JobEscrowEngine`] drives every job through
//! `Open -> Assigned -> Completed -> Released`, pairing each money-moving
//! transition with the escrow ledger:
//!
//! - `post_job` holds the payment before the job becomes visible; a failed
//!   hold rolls the posting back, so no open job ever lacks backing funds.
//! - `release_payment` credits the freelancer before the job is marked
//!   released; a timed-out release leaves the job `Completed` and may be
//!   retried, and a replay of a finished release is rejected.
//!
//! Completion and release are deliberately independent operations: the
//! employer can acknowledge work without moving money, and the money move
//! is the single idempotency-sensitive step.
//!
//! All operations on one job run under that job's slot lock, so concurrent
//! callers observe a total order per job while distinct jobs proceed in
//! parallel.

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::oracle::{PriceOracle, UsdAmount};
use crate::store::JobStore;
use gig_core::{Address, Amount, Job, JobId, JobStatus};
use gig_ledger::{EscrowLedger, LedgerConfig, TransferBackend};
use tokio::time::timeout;
use tracing::{info, warn};

/// Orchestrates the job lifecycle over the store, the escrow ledger, and
/// the price oracle.
#[derive(Debug)]
pub struct JobEscrowEngine<B, O> {
    store: JobStore,
    ledger: EscrowLedger<B>,
    oracle: O,
    config: EngineConfig,
}

impl<B: TransferBackend, O: PriceOracle> JobEscrowEngine<B, O> {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new(backend: B, oracle: O) -> Self {
        Self::with_config(backend, oracle, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration.
    #[must_use]
    pub fn with_config(backend: B, oracle: O, config: EngineConfig) -> Self {
        let ledger = EscrowLedger::with_config(
            backend,
            LedgerConfig {
                backend_timeout: config.escrow_timeout,
            },
        );
        Self {
            store: JobStore::new(),
            ledger,
            oracle,
            config,
        }
    }

    /// Access the job store (read paths).
    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Access the escrow ledger (observability).
    pub fn ledger(&self) -> &EscrowLedger<B> {
        &self.ledger
    }

    /// Post a new job, escrowing its payment.
    ///
    /// The payment is debited from the employer and locked before the job
    /// becomes visible to anyone. If the hold fails, the posting is rolled
    /// back and the allocated id is burned.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] for empty fields or a zero
    /// payment, or [`EngineError::EscrowUnavailable`] when the hold cannot
    /// be placed.
    pub async fn post_job(
        &self,
        employer: &Address,
        title: &str,
        description: &str,
        payment: Amount,
    ) -> Result<Job> {
        Job::validate_fields(title, description, payment)
            .map_err(|e| EngineError::invalid_input(e.to_string()))?;

        let (id, mut guard) = self.store.reserve().await;
        if let Err(e) = self.ledger.hold(id, employer, payment).await {
            self.store.discard(id);
            warn!(job_id = %id, error = %e, "posting rolled back, escrow hold failed");
            return Err(e.into());
        }

        let job = match Job::post(id, employer.clone(), title, description, payment) {
            Ok(job) => job,
            Err(e) => {
                // Unreachable after validate_fields, but never leave a
                // locked hold behind a half-posted job.
                self.store.discard(id);
                return Err(EngineError::invalid_input(e.to_string()));
            }
        };

        guard.job = Some(job.clone());
        info!(job_id = %id, employer = %employer, payment = %payment, "job posted");
        Ok(job)
    }

    /// Apply to an open job as its single freelancer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`], [`EngineError::InvalidState`] if
    /// the job already left `Open`, or [`EngineError::Forbidden`] if the
    /// employer applies to their own job.
    pub async fn apply_to_job(&self, freelancer: &Address, job_id: JobId) -> Result<Job> {
        let mut guard = self.store.lock(job_id).await?;
        let Some(job) = guard.job.as_mut() else {
            return Err(EngineError::NotFound { job_id });
        };

        if job.status != JobStatus::Open {
            return Err(EngineError::invalid_state(job_id, job.status));
        }
        if job.is_employer(freelancer) {
            return Err(EngineError::forbidden(
                "employer cannot apply to their own job",
            ));
        }

        let current = job.status;
        job.assign(freelancer.clone())
            .map_err(|_| EngineError::invalid_state(job_id, current))?;
        info!(job_id = %job_id, freelancer = %freelancer, "job assigned");
        Ok(job.clone())
    }

    /// Acknowledge completed work. Moves no money.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`], [`EngineError::Forbidden`] if
    /// the caller is not the employer, or [`EngineError::InvalidState`]
    /// if the job is not `Assigned`.
    pub async fn complete_job(&self, caller: &Address, job_id: JobId) -> Result<Job> {
        let mut guard = self.store.lock(job_id).await?;
        let Some(job) = guard.job.as_mut() else {
            return Err(EngineError::NotFound { job_id });
        };

        if !job.is_employer(caller) {
            return Err(EngineError::forbidden("only the employer can complete a job"));
        }
        if job.status != JobStatus::Assigned {
            return Err(EngineError::invalid_state(job_id, job.status));
        }

        let current = job.status;
        job.complete()
            .map_err(|_| EngineError::invalid_state(job_id, current))?;
        info!(job_id = %job_id, "job completed");
        Ok(job.clone())
    }

    /// Release the escrowed payment to the freelancer, exactly once.
    ///
    /// The ledger credit must confirm before the job is marked `Released`.
    /// If the credit times out the job stays `Completed` and the call may
    /// be retried; the transfer itself is idempotent by job id, so a retry
    /// can never pay twice.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`], [`EngineError::Forbidden`],
    /// [`EngineError::InvalidState`] if the job is not `Completed`,
    /// [`EngineError::AlreadyReleased`] on replay, or
    /// [`EngineError::EscrowUnavailable`] when the ledger backend fails.
    pub async fn release_payment(&self, caller: &Address, job_id: JobId) -> Result<Job> {
        let mut guard = self.store.lock(job_id).await?;
        let Some(job) = guard.job.as_mut() else {
            return Err(EngineError::NotFound { job_id });
        };

        if !job.is_employer(caller) {
            return Err(EngineError::forbidden(
                "only the employer can release payment",
            ));
        }
        match job.status {
            JobStatus::Completed => {}
            JobStatus::Released => return Err(EngineError::AlreadyReleased { job_id }),
            current => return Err(EngineError::invalid_state(job_id, current)),
        }
        let Some(freelancer) = job.freelancer.clone() else {
            // A completed job always has a freelancer; treat a violation
            // as a state error rather than paying nobody.
            return Err(EngineError::invalid_state(job_id, job.status));
        };

        let amount = self.ledger.release(job_id, &freelancer).await?;

        let current = job.status;
        job.release()
            .map_err(|_| EngineError::invalid_state(job_id, current))?;
        info!(
            job_id = %job_id,
            freelancer = %freelancer,
            amount = %amount,
            "payment released"
        );
        Ok(job.clone())
    }

    /// Quote an amount in USD for display.
    ///
    /// Advisory only: runs under its own timeout, touches no job or escrow
    /// state, and is never called from a mutating operation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OracleUnavailable`] on oracle failure or
    /// timeout.
    pub async fn quote(&self, amount: Amount) -> Result<UsdAmount> {
        match timeout(self.config.oracle_timeout, self.oracle.quote(amount)).await {
            Ok(Ok(quoted)) => Ok(quoted),
            Ok(Err(e)) => {
                warn!(amount = %amount, error = %e, "quote failed");
                Err(EngineError::OracleUnavailable {
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                warn!(amount = %amount, "quote timed out");
                Err(EngineError::OracleUnavailable {
                    reason: format!(
                        "quote did not complete in {} seconds",
                        self.config.oracle_timeout.as_secs()
                    ),
                })
            }
        }
    }

    /// Get a snapshot of one job.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for an unknown id.
    pub async fn get_job(&self, job_id: JobId) -> Result<Job> {
        self.store.get(job_id).await
    }

    /// Snapshot of all jobs in id order. Safe to re-enumerate at any time.
    pub async fn list_jobs(&self) -> Vec<Job> {
        self.store.list().await
    }

    /// Number of jobs known to the engine.
    #[must_use]
    pub fn job_count(&self) -> usize {
        self.store.len()
    }
}
