//! Integration tests for the Gigvault job escrow platform.
//!
//! The actual tests live in `tests/`; this crate exists only to anchor
//! them in the workspace.
