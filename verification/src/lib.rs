//! Optimistic verification gate for cross-chain messages.
//!
//! Two-phase process:
//! 1. **Pre-verify**: a fast, possibly-untrusted submodule oracle provisionally
//!    accepts a message; the gate stamps its fingerprint with the current time.
//! 2. **Verify**: after the fraud window has elapsed with no disqualifying vote
//!    outcome against the submodule, anyone can finalize the message.
//!
//! In between, authorized **watchers** may cast irrevocable fraud votes against
//! a submodule. Once a submodule's tally strictly exceeds its threshold, it can
//! neither pre-verify new messages nor finalize pending ones.
//!
//! The submodule's own verification algorithm is opaque — the gate treats it as
//! an untrusted boolean oracle and never substitutes its answer for the fraud
//! and window checks.

pub mod error;
pub mod fraud;
pub mod messages;
pub mod oracle;
pub mod orchestrator;
pub mod submodule;
pub mod watchers;

pub use error::VerifierError;
pub use fraud::FraudVoteLedger;
pub use messages::{fingerprint, MessageLedger, MessageState};
pub use oracle::{OracleDirectory, OracleError, SubmoduleOracle};
pub use orchestrator::{OptimisticVerifier, VerifierEvent, VerifierSnapshot};
pub use submodule::{SubmoduleStatus, SubmoduleTable};
pub use watchers::WatcherRegistry;
