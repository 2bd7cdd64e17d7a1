//! Authoritative job storage.
//!
//! [`JobStore`] owns the `JobId -> Job` mapping and the per-job
//! serialization primitive. Each job lives in a slot behind its own
//! `tokio::sync::Mutex`; the map itself sits behind a `parking_lot`
//! read-write lock that is only held long enough to clone a slot handle.
//! Operations on distinct jobs therefore never block one another, while
//! all operations on one job are totally ordered by its slot lock.
//!
//! Ids are allocated from an atomic counter starting at 1 and are never
//! reused, including ids of postings that were rolled back.

use crate::error::{EngineError, Result};
use gig_core::{Address, Amount, Job, JobId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// A job's slot. `None` means the posting is still in flight or was
/// rolled back; readers treat it as not found.
#[derive(Debug, Default)]
pub struct Slot {
    pub(crate) job: Option<Job>,
}

/// In-memory store of jobs with per-job locking.
#[derive(Debug)]
pub struct JobStore {
    slots: RwLock<HashMap<JobId, Arc<Mutex<Slot>>>>,
    next_id: AtomicU64,
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn allocate_id(&self) -> JobId {
        JobId::from(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Validate and insert a new `Open` job directly.
    ///
    /// This is the plain creation path with no escrow coupling. The engine
    /// posts jobs through [`JobStore::reserve`] instead so that the job
    /// only becomes visible once its escrow hold has committed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if the fields fail validation.
    pub fn create(
        &self,
        employer: Address,
        title: impl Into<String>,
        description: impl Into<String>,
        payment: Amount,
    ) -> Result<Job> {
        let id = self.allocate_id();
        let job = Job::post(id, employer, title, description, payment)
            .map_err(|e| EngineError::invalid_input(e.to_string()))?;

        let slot = Arc::new(Mutex::new(Slot {
            job: Some(job.clone()),
        }));
        self.slots.write().insert(id, slot);
        debug!(job_id = %id, "job inserted");
        Ok(job)
    }

    /// Reserve a slot for a job being posted.
    ///
    /// The slot is inserted already locked and empty: concurrent readers
    /// of the same id queue on the lock until the caller either publishes
    /// the job into the guard or discards the reservation. Nothing can
    /// observe a half-posted job.
    pub(crate) async fn reserve(&self) -> (JobId, OwnedMutexGuard<Slot>) {
        let id = self.allocate_id();
        let slot = Arc::new(Mutex::new(Slot::default()));
        // Uncontended: the slot is not yet shared.
        let guard = slot.clone().lock_owned().await;
        self.slots.write().insert(id, slot);
        (id, guard)
    }

    /// Drop a reservation whose escrow hold failed.
    pub(crate) fn discard(&self, id: JobId) {
        self.slots.write().remove(&id);
        debug!(job_id = %id, "reservation discarded");
    }

    /// Lock the slot for `id` for a compound operation.
    ///
    /// The returned guard serializes every operation on this job; hold it
    /// across the ledger call so transition and money movement are atomic
    /// to other observers.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the id is unknown or the
    /// posting was rolled back.
    pub(crate) async fn lock(&self, id: JobId) -> Result<OwnedMutexGuard<Slot>> {
        let slot = self
            .slots
            .read()
            .get(&id)
            .cloned()
            .ok_or(EngineError::NotFound { job_id: id })?;

        let guard = slot.lock_owned().await;
        if guard.job.is_none() {
            return Err(EngineError::NotFound { job_id: id });
        }
        Ok(guard)
    }

    /// Get a snapshot of one job.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the id is unknown.
    pub async fn get(&self, id: JobId) -> Result<Job> {
        let guard = self.lock(id).await?;
        guard
            .job
            .clone()
            .ok_or(EngineError::NotFound { job_id: id })
    }

    /// Snapshot of all jobs in id order.
    ///
    /// Safe to call repeatedly; each call reflects current state. A job
    /// whose posting is still in flight is waited for (bounded by the
    /// collaborator timeouts), never silently skipped.
    pub async fn list(&self) -> Vec<Job> {
        let mut handles: Vec<(JobId, Arc<Mutex<Slot>>)> = {
            let slots = self.slots.read();
            slots.iter().map(|(id, s)| (*id, s.clone())).collect()
        };
        handles.sort_by_key(|(id, _)| *id);

        let mut jobs = Vec::with_capacity(handles.len());
        for (_, slot) in handles {
            let guard = slot.lock().await;
            if let Some(job) = guard.job.clone() {
                jobs.push(job);
            }
        }
        jobs
    }

    /// Number of slots currently in the store (including in-flight posts).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Check if the store holds no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}
