//! # gig-ledger
//!
//! Escrow ledger for the Gigvault job platform.
//!
//! The ledger is the only component allowed to move value. It records one
//! hold per job, debited from the employer when the job is posted, and
//! guarantees that the held amount is paid out (or refunded) exactly once,
//! even across retries after collaborator timeouts.
//!
//! Actual fund movement is delegated to a [`TransferBackend`] collaborator;
//! an [`InMemoryBank`] implementation is provided for development and tests.
//!
//! ## Example
//!
//! ```rust
//! use gig_core::{Address, Amount, JobId};
//! use gig_ledger::{EscrowLedger, InMemoryBank};
//!
//! # async fn example() -> gig_ledger::Result<()> {
//! let employer = Address::from_bytes(&[0x11; 20]);
//! let freelancer = Address::from_bytes(&[0x22; 20]);
//!
//! let bank = InMemoryBank::new();
//! bank.deposit(&employer, Amount::eth(10.0));
//!
//! let ledger = EscrowLedger::new(bank);
//! let job = JobId::from(1);
//!
//! ledger.hold(job, &employer, Amount::eth(2.0)).await?;
//! assert_eq!(ledger.held(job), Some(Amount::eth(2.0)));
//!
//! let paid = ledger.release(job, &freelancer).await?;
//! assert_eq!(paid, Amount::eth(2.0));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod entry;
pub mod error;
pub mod ledger;

pub use backend::{InMemoryBank, TransferBackend, TransferError};
pub use entry::{EscrowEntry, HoldState};
pub use error::{LedgerError, Result};
pub use ledger::{EscrowLedger, LedgerConfig};
