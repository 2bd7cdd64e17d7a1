//! # gig-core
//!
//! Core domain types for the Gigvault job escrow platform.
//!
//! This crate provides:
//! - Payment amounts ([`Amount`], fixed-point ETH stored as wei)
//! - Participant identities ([`Address`], normalized once at the boundary)
//! - Jobs and their lifecycle ([`Job`], [`JobId`], [`JobStatus`])
//!
//! ## Example
//!
//! ```rust
//! use gig_core::{Address, Amount, Job, JobId, JobStatus};
//!
//! # fn example() -> gig_core::Result<()> {
//! let employer = Address::parse("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B")?;
//! let freelancer = Address::parse("0x00a329c0648769a73afac7f9381e08fb43dbea72")?;
//!
//! let mut job = Job::post(
//!     JobId::from(1),
//!     employer,
//!     "Landing page",
//!     "Build the landing page",
//!     Amount::eth(2.0),
//! )?;
//! assert_eq!(job.status, JobStatus::Open);
//!
//! job.assign(freelancer)?;
//! job.complete()?;
//! job.release()?;
//! assert_eq!(job.status, JobStatus::Released);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod error;
pub mod identity;
pub mod job;

pub use amount::Amount;
pub use error::{CoreError, Result};
pub use identity::Address;
pub use job::{Job, JobId, JobStatus};

/// One ETH in base units (wei).
pub const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;
