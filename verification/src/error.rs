use thiserror::Error;

use crate::oracle::OracleError;
use vigil_types::{Address, MessageId};

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("administrator address must not be zero")]
    InvalidAdmin,

    #[error("submodule {0} does not resolve to a live oracle")]
    SubmoduleUnavailable(Address),

    #[error("caller {0} lacks the required capability")]
    Unauthorized(Address),

    #[error("watcher {watcher} has already marked submodule {submodule} fraudulent")]
    AlreadyMarked { watcher: Address, submodule: Address },

    #[error("submodule {0} is marked fraudulent")]
    FraudulentSubmodule(Address),

    #[error("message {0} is already pre-verified")]
    AlreadyPreverified(MessageId),

    #[error("message {0} has not been pre-verified")]
    NotPreverified(MessageId),

    #[error("message {0} is already finalized")]
    AlreadyVerified(MessageId),

    #[error("fraud window has not elapsed: {remaining_secs}s remaining")]
    FraudWindowNotElapsed { remaining_secs: u64 },

    #[error("submodule oracle error: {0}")]
    Oracle(#[from] OracleError),
}
