//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`crate::JobEscrowEngine`].
///
/// Both timeouts bound collaborator calls: a slow funds-transfer backend
/// or oracle surfaces as a typed unavailability error, never as a hang.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum time to wait for a single escrow backend debit/credit.
    pub escrow_timeout: Duration,
    /// Maximum time to wait for a price quote.
    pub oracle_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            escrow_timeout: Duration::from_secs(10),
            oracle_timeout: Duration::from_secs(5),
        }
    }
}
