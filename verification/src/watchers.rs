//! Watcher registry — the set of identities empowered to accuse a submodule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use vigil_types::Address;

/// The mutable set of authorized watchers.
///
/// Administrator gating happens in the orchestrator; this type only maintains
/// exact membership. Add and remove are idempotent: re-adding a member or
/// removing an absent one is a no-op, not an error.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WatcherRegistry {
    members: BTreeSet<Address>,
}

impl WatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add watchers. Returns the identities that were actually new.
    pub fn add(&mut self, ids: &[Address]) -> Vec<Address> {
        ids.iter()
            .filter(|id| self.members.insert(**id))
            .copied()
            .collect()
    }

    /// Remove watchers. Returns the identities that were actually present.
    pub fn remove(&mut self, ids: &[Address]) -> Vec<Address> {
        ids.iter()
            .filter(|id| self.members.remove(id))
            .copied()
            .collect()
    }

    pub fn contains(&self, id: &Address) -> bool {
        self.members.contains(id)
    }

    /// Current membership, sorted, no duplicates.
    pub fn to_vec(&self) -> Vec<Address> {
        self.members.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
