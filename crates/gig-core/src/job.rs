//! Jobs and their lifecycle.
//!
//! A [`Job`] moves through a linear state machine:
//! `Open -> Assigned -> Completed -> Released`. `Released` is terminal.
//! The transition methods on [`Job`] enforce machine legality and keep the
//! freelancer field consistent with the status (a freelancer is recorded
//! if and only if the job has left `Open`).

use crate::amount::Amount;
use crate::error::{CoreError, Result};
use crate::identity::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique job identifier.
///
/// Ids are allocated monotonically starting at 1 and never reused. The id
/// doubles as the idempotency key for escrow transfers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct JobId(u64);

impl JobId {
    /// Get the raw id value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Posted and escrowed, awaiting a freelancer.
    Open,
    /// Claimed by exactly one freelancer.
    Assigned,
    /// Work acknowledged by the employer; payment not yet moved.
    Completed,
    /// Escrowed payment transferred to the freelancer. Terminal.
    Released,
}

impl JobStatus {
    /// Checks if a transition to the target status is valid.
    ///
    /// The machine is linear: no cycles, no skipped steps.
    #[must_use]
    pub const fn can_transition_to(&self, target: &Self) -> bool {
        use JobStatus::{Assigned, Completed, Open, Released};

        matches!(
            (self, target),
            (Open, Assigned) | (Assigned, Completed) | (Completed, Released)
        )
    }

    /// Check if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Released)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Assigned => write!(f, "assigned"),
            Self::Completed => write!(f, "completed"),
            Self::Released => write!(f, "released"),
        }
    }
}

/// One posted work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job id.
    pub id: JobId,

    /// The employer who posted the job. Immutable after creation.
    pub employer: Address,

    /// The freelancer assigned to the job. `None` until assignment,
    /// immutable once set.
    pub freelancer: Option<Address>,

    /// Job title. Immutable.
    pub title: String,

    /// Job description. Immutable.
    pub description: String,

    /// Payment fixed at creation; this is what the escrow holds and what
    /// the freelancer is paid on release.
    pub payment: Amount,

    /// Current lifecycle status.
    pub status: JobStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last transition timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Validate the user-supplied fields of a job posting.
    ///
    /// # Errors
    ///
    /// Returns error if the title or description is empty (after trimming)
    /// or the payment is zero.
    pub fn validate_fields(title: &str, description: &str, payment: Amount) -> Result<()> {
        if title.trim().is_empty() {
            return Err(CoreError::invalid_job("title must not be empty"));
        }
        if description.trim().is_empty() {
            return Err(CoreError::invalid_job("description must not be empty"));
        }
        if payment.is_zero() {
            return Err(CoreError::invalid_job("payment must be greater than zero"));
        }
        Ok(())
    }

    /// Create a new job in the `Open` state.
    ///
    /// # Errors
    ///
    /// Returns error if the fields fail [`Job::validate_fields`].
    pub fn post(
        id: JobId,
        employer: Address,
        title: impl Into<String>,
        description: impl Into<String>,
        payment: Amount,
    ) -> Result<Self> {
        let title = title.into();
        let description = description.into();
        Self::validate_fields(&title, &description, payment)?;

        let now = Utc::now();
        Ok(Self {
            id,
            employer,
            freelancer: None,
            title,
            description,
            payment,
            status: JobStatus::Open,
            created_at: now,
            updated_at: now,
        })
    }

    /// Attempts to transition to a new status.
    fn transition_to(&mut self, target: JobStatus) -> Result<()> {
        if self.status.can_transition_to(&target) {
            self.status = target;
            self.updated_at = Utc::now();
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            })
        }
    }

    /// Assign a freelancer to an open job.
    ///
    /// # Errors
    ///
    /// Returns error if the job is not `Open`.
    pub fn assign(&mut self, freelancer: Address) -> Result<()> {
        self.transition_to(JobStatus::Assigned)?;
        self.freelancer = Some(freelancer);
        Ok(())
    }

    /// Mark an assigned job as completed.
    ///
    /// # Errors
    ///
    /// Returns error if the job is not `Assigned`.
    pub fn complete(&mut self) -> Result<()> {
        self.transition_to(JobStatus::Completed)
    }

    /// Mark a completed job as released.
    ///
    /// # Errors
    ///
    /// Returns error if the job is not `Completed`.
    pub fn release(&mut self) -> Result<()> {
        self.transition_to(JobStatus::Released)
    }

    /// Check whether `caller` is the employer of this job.
    #[must_use]
    pub fn is_employer(&self, caller: &Address) -> bool {
        self.employer == *caller
    }
}
