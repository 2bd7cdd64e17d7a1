//! # gig-engine
//!
//! Job escrow engine for the Gigvault platform.
//!
//! This crate provides:
//!
//! - [`JobStore`] - authoritative job records with per-job serialization
//! - [`JobEscrowEngine`] - lifecycle orchestration over store and ledger
//! - [`PriceOracle`] - advisory USD quoting boundary
//!
//! The engine guarantees the funds-safety properties of the platform: a
//! posted job is always backed by an escrow hold, a single freelancer wins
//! an open job, and the escrowed payment is released exactly once.
//!
//! ## Example
//!
//! ```rust
//! use gig_core::{Address, Amount};
//! use gig_engine::{FixedRateOracle, JobEscrowEngine};
//! use gig_ledger::InMemoryBank;
//!
//! # async fn example() -> gig_engine::Result<()> {
//! let employer = Address::from_bytes(&[0x11; 20]);
//! let freelancer = Address::from_bytes(&[0x22; 20]);
//!
//! let bank = InMemoryBank::new();
//! bank.deposit(&employer, Amount::eth(10.0));
//! let engine = JobEscrowEngine::new(bank, FixedRateOracle::new(250_000));
//!
//! let job = engine
//!     .post_job(&employer, "Landing page", "Build it", Amount::eth(2.0))
//!     .await?;
//! engine.apply_to_job(&freelancer, job.id).await?;
//! engine.complete_job(&employer, job.id).await?;
//! engine.release_payment(&employer, job.id).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod oracle;
pub mod store;

pub use config::EngineConfig;
pub use engine::JobEscrowEngine;
pub use error::{EngineError, Result};
pub use oracle::{FixedRateOracle, OracleError, PriceOracle, UsdAmount};
pub use store::JobStore;
