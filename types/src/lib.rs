//! Fundamental types for the vigil optimistic verification gate.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: identities (administrator, watchers, submodules), message
//! fingerprints, and timestamps.

pub mod address;
pub mod hash;
pub mod time;

pub use address::{Address, AddressParseError};
pub use hash::MessageId;
pub use time::Timestamp;
