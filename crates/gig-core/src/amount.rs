//! Payment amount representation.
//!
//! Amounts are stored as wei (base units) internally for precision, with
//! convenient conversion to/from ETH (decimal) representation. Wei counts
//! use `u128` because one ETH is already 10^18 wei.

use crate::error::{CoreError, Result};
use crate::WEI_PER_ETH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// An amount of currency held or paid for a job.
///
/// Internally stored as wei (1 ETH = 10^18 wei). Amounts are unsigned and
/// therefore non-negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount {
    wei: u128,
}

impl Amount {
    /// Zero ETH.
    pub const ZERO: Self = Self { wei: 0 };

    /// Maximum amount (`u128::MAX` wei).
    pub const MAX: Self = Self { wei: u128::MAX };

    /// Create an amount from wei (base units).
    #[must_use]
    pub const fn from_wei(wei: u128) -> Self {
        Self { wei }
    }

    /// Create an amount from ETH (decimal representation).
    ///
    /// # Panics
    ///
    /// Panics if the amount is negative.
    #[must_use]
    pub fn eth(amount: f64) -> Self {
        assert!(amount >= 0.0, "amount must be non-negative");
        let wei = (amount * WEI_PER_ETH as f64).round() as u128;
        Self { wei }
    }

    /// Try to create an amount from ETH.
    ///
    /// # Errors
    ///
    /// Returns error if amount is negative or not finite.
    pub fn try_eth(amount: f64) -> Result<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::invalid_amount(
                "amount must be a non-negative finite number",
            ));
        }
        Ok(Self::eth(amount))
    }

    /// Get the amount in wei.
    #[must_use]
    pub const fn wei(&self) -> u128 {
        self.wei
    }

    /// Get the amount in ETH (decimal).
    #[must_use]
    pub fn as_eth(&self) -> f64 {
        self.wei as f64 / WEI_PER_ETH as f64
    }

    /// Check if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.wei == 0
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(&self, other: Self) -> Self {
        Self {
            wei: self.wei.saturating_add(other.wei),
        }
    }

    /// Saturating subtraction.
    #[must_use]
    pub const fn saturating_sub(&self, other: Self) -> Self {
        Self {
            wei: self.wei.saturating_sub(other.wei),
        }
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(&self, other: Self) -> Option<Self> {
        match self.wei.checked_add(other.wei) {
            Some(wei) => Some(Self { wei }),
            None => None,
        }
    }

    /// Checked subtraction.
    #[must_use]
    pub const fn checked_sub(&self, other: Self) -> Option<Self> {
        match self.wei.checked_sub(other.wei) {
            Some(wei) => Some(Self { wei }),
            None => None,
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} ETH", self.as_eth())
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            wei: self.wei + other.wei,
        }
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            wei: self.wei - other.wei,
        }
    }
}

impl From<u128> for Amount {
    fn from(wei: u128) -> Self {
        Self::from_wei(wei)
    }
}
