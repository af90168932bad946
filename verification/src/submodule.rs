//! Per-submodule configuration and live fraud tally.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use vigil_types::Address;

/// Configuration and fraud tally for one submodule identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmoduleStatus {
    /// Fraud votes cast against this submodule. Monotonically non-decreasing.
    pub fraudulent_votes: u64,
    /// Votes strictly above this count disqualify the submodule.
    pub vote_threshold: u64,
    /// Minimum seconds between pre-verification and allowed finalization.
    pub fraud_window_secs: u64,
}

impl SubmoduleStatus {
    /// Strict inequality: a tally exactly equal to the threshold is not yet
    /// disqualifying.
    pub fn is_fraudulent(&self) -> bool {
        self.fraudulent_votes > self.vote_threshold
    }
}

/// All submodule records plus the single active pointer.
///
/// Records are never deleted; a previously active submodule's status stays
/// readable but no longer receives new pre-verifications.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmoduleTable {
    statuses: HashMap<Address, SubmoduleStatus>,
    active: Address,
}

impl SubmoduleTable {
    pub fn new(submodule: Address, vote_threshold: u64, fraud_window_secs: u64) -> Self {
        let mut table = Self {
            statuses: HashMap::new(),
            active: submodule,
        };
        table.configure(submodule, vote_threshold, fraud_window_secs);
        table
    }

    /// Set threshold and window for a submodule and make it active.
    ///
    /// An existing fraud tally for the same identity is preserved: reconfiguring
    /// a fraudulent submodule does not clear its fraud status. The administrator
    /// must either raise the threshold above the tally or activate a different
    /// identity.
    pub fn configure(&mut self, submodule: Address, vote_threshold: u64, fraud_window_secs: u64) {
        let status = self.statuses.entry(submodule).or_default();
        status.vote_threshold = vote_threshold;
        status.fraud_window_secs = fraud_window_secs;
        self.active = submodule;
    }

    /// Count one fraud vote against a submodule, returning the new tally.
    ///
    /// A vote against a never-configured identity creates a zero-threshold
    /// record, so the first vote already disqualifies it.
    pub fn record_vote(&mut self, submodule: Address) -> u64 {
        let status = self.statuses.entry(submodule).or_default();
        status.fraudulent_votes += 1;
        status.fraudulent_votes
    }

    pub fn status(&self, submodule: &Address) -> Option<SubmoduleStatus> {
        self.statuses.get(submodule).copied()
    }

    /// The submodule used for new pre-verifications.
    pub fn active(&self) -> Address {
        self.active
    }

    /// Status of the active submodule. The active identity always has a record
    /// (construction and configuration both create one).
    pub fn active_status(&self) -> SubmoduleStatus {
        self.statuses.get(&self.active).copied().unwrap_or_default()
    }
}
