//! Price oracle boundary.
//!
//! The oracle is a pure, stateless read: it converts an [`Amount`] of the
//! base currency into USD for display. It never participates in job or
//! escrow state, and the engine never calls it from a mutating operation.
//! A failed quote degrades display, not correctness.

use gig_core::{Amount, WEI_PER_ETH};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors reported by a price oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The oracle could not produce a quote.
    #[error("oracle unavailable: {reason}")]
    Unavailable {
        /// Description of the outage.
        reason: String,
    },
}

impl OracleError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// A quoted USD amount, in integer cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UsdAmount(u64);

impl UsdAmount {
    /// Zero dollars.
    pub const ZERO: Self = Self(0);

    /// Create from integer cents.
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Get the amount in cents.
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UsdAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Read-only quoting service converting base-currency amounts to USD.
#[allow(async_fn_in_trait)]
pub trait PriceOracle: Send + Sync {
    /// Quote `amount` in USD.
    async fn quote(&self, amount: Amount) -> std::result::Result<UsdAmount, OracleError>;
}

/// Oracle with a fixed conversion rate.
///
/// Converts with `u128` fixed-point intermediates and saturates at
/// `u64::MAX` cents; no floating point on the quoting path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FixedRateOracle {
    cents_per_eth: u64,
}

impl FixedRateOracle {
    /// Create an oracle quoting `cents_per_eth` USD cents per whole ETH.
    #[must_use]
    pub const fn new(cents_per_eth: u64) -> Self {
        Self { cents_per_eth }
    }

    /// The configured rate in cents per ETH.
    #[must_use]
    pub const fn rate(&self) -> u64 {
        self.cents_per_eth
    }

    fn convert(&self, amount: Amount) -> UsdAmount {
        let cents = amount
            .wei()
            .checked_mul(u128::from(self.cents_per_eth))
            .map_or(u128::MAX, |n| n / WEI_PER_ETH);

        if cents > u128::from(u64::MAX) {
            UsdAmount::from_cents(u64::MAX)
        } else {
            UsdAmount::from_cents(cents as u64)
        }
    }
}

impl PriceOracle for FixedRateOracle {
    async fn quote(&self, amount: Amount) -> std::result::Result<UsdAmount, OracleError> {
        Ok(self.convert(amount))
    }
}
