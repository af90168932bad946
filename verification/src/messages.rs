//! Message verification ledger — per-fingerprint acceptance state machine.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::VerifierError;
use vigil_types::{MessageId, Timestamp};

type Blake2b256 = Blake2b<U32>;

/// Compute the content fingerprint of a raw message.
pub fn fingerprint(message: &[u8]) -> MessageId {
    let mut hasher = Blake2b256::new();
    hasher.update(message);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    MessageId::new(output)
}

/// Acceptance state of one message fingerprint.
///
/// Absence from the ledger means *unseen*. An explicit tag replaces the
/// sentinel-timestamp trick so real timestamps near the numeric boundary stay
/// unambiguous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageState {
    /// Provisionally accepted at the given time; awaiting the fraud window.
    PreVerified { at: Timestamp },
    /// Irreversibly accepted.
    Finalized,
}

/// Tracks every fingerprint's state. Transitions are monotonic:
/// unseen → pre-verified → finalized, never backwards.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MessageLedger {
    states: HashMap<MessageId, MessageState>,
}

impl MessageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: &MessageId) -> Option<MessageState> {
        self.states.get(id).copied()
    }

    /// Transition a fingerprint from unseen to pre-verified.
    pub fn mark_preverified(&mut self, id: MessageId, now: Timestamp) -> Result<(), VerifierError> {
        if self.states.contains_key(&id) {
            return Err(VerifierError::AlreadyPreverified(id));
        }
        self.states.insert(id, MessageState::PreVerified { at: now });
        Ok(())
    }

    /// Transition a fingerprint from pre-verified to finalized, enforcing the
    /// fraud window. All guards pass or the state is left untouched.
    pub fn finalize(
        &mut self,
        id: MessageId,
        fraud_window_secs: u64,
        now: Timestamp,
    ) -> Result<(), VerifierError> {
        let at = match self.states.get(&id) {
            None => return Err(VerifierError::NotPreverified(id)),
            Some(MessageState::Finalized) => return Err(VerifierError::AlreadyVerified(id)),
            Some(MessageState::PreVerified { at }) => *at,
        };
        if !at.has_expired(fraud_window_secs, now) {
            let remaining_secs = fraud_window_secs - at.elapsed_since(now);
            return Err(VerifierError::FraudWindowNotElapsed { remaining_secs });
        }
        self.states.insert(id, MessageState::Finalized);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
