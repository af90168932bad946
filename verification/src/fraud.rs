//! Fraud-vote ledger — one irrevocable vote per (watcher, submodule) pair.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use vigil_types::Address;

/// Records which (watcher, submodule) pairs have voted.
///
/// Entries are immutable once set: no operation clears or toggles them, so a
/// watcher can never contribute more than one increment to a submodule's
/// tally, even across reconfiguration of the same identity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FraudVoteLedger {
    votes: BTreeSet<(Address, Address)>,
}

impl FraudVoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, watcher: &Address, submodule: &Address) -> bool {
        self.votes.contains(&(*watcher, *submodule))
    }

    /// Record a vote. Returns `false` (and stores nothing) if the pair has
    /// already voted.
    pub fn record(&mut self, watcher: Address, submodule: Address) -> bool {
        self.votes.insert((watcher, submodule))
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}
