//! Optimistic verifier — composes the watcher registry, submodule table, and
//! both ledgers with the external submodule oracle into the two-phase
//! acceptance protocol.

use serde::{Deserialize, Serialize};

use crate::error::VerifierError;
use crate::fraud::FraudVoteLedger;
use crate::messages::{fingerprint, MessageLedger, MessageState};
use crate::oracle::OracleDirectory;
use crate::submodule::{SubmoduleStatus, SubmoduleTable};
use crate::watchers::WatcherRegistry;
use vigil_types::{Address, MessageId, Timestamp};

/// Events emitted by the verifier for the host process to log or relay.
#[derive(Clone, Debug)]
pub enum VerifierEvent {
    /// A submodule was (re)configured and made active.
    SubmoduleConfigured {
        submodule: Address,
        vote_threshold: u64,
        fraud_window_secs: u64,
    },
    /// Watchers were added to the registry (only genuinely new members).
    WatchersAdded { added: Vec<Address> },
    /// Watchers were removed from the registry (only members actually present).
    WatchersRemoved { removed: Vec<Address> },
    /// A watcher's fraud vote was counted.
    FraudVoteRecorded {
        watcher: Address,
        submodule: Address,
        tally: u64,
    },
    /// This vote pushed the tally strictly above the threshold.
    SubmoduleDisqualified {
        submodule: Address,
        tally: u64,
        threshold: u64,
    },
    /// A message was provisionally accepted.
    MessagePreVerified { id: MessageId, at: Timestamp },
    /// A message was irreversibly accepted.
    MessageFinalized { id: MessageId },
}

/// The optimistic verification gate.
///
/// Exclusively owns all mutable state; external actors (administrator,
/// watchers, relayers) only trigger mutations through its operations. Every
/// mutating operation takes `&mut self`, which gives single-sequencer
/// semantics: hosts that field concurrent requests serialize calls through one
/// lock (see the rpc crate).
#[derive(Debug)]
pub struct OptimisticVerifier {
    admin: Address,
    oracles: OracleDirectory,
    watchers: WatcherRegistry,
    submodules: SubmoduleTable,
    fraud_votes: FraudVoteLedger,
    messages: MessageLedger,
    pending_events: Vec<VerifierEvent>,
}

impl OptimisticVerifier {
    /// Initialize the gate with its administrator and first active submodule.
    ///
    /// Fails with `InvalidAdmin` for a zero administrator address and
    /// `SubmoduleUnavailable` if the submodule is not registered in the oracle
    /// directory. Construction is the one-and-only initialization; there is no
    /// re-initialize operation.
    pub fn initialize(
        admin: Address,
        submodule: Address,
        vote_threshold: u64,
        fraud_window_secs: u64,
        oracles: OracleDirectory,
    ) -> Result<Self, VerifierError> {
        if admin.is_zero() {
            return Err(VerifierError::InvalidAdmin);
        }
        if !oracles.contains(&submodule) {
            return Err(VerifierError::SubmoduleUnavailable(submodule));
        }
        Ok(Self {
            admin,
            oracles,
            watchers: WatcherRegistry::new(),
            submodules: SubmoduleTable::new(submodule, vote_threshold, fraud_window_secs),
            fraud_votes: FraudVoteLedger::new(),
            messages: MessageLedger::new(),
            pending_events: Vec::new(),
        })
    }

    // ── Administration ─────────────────────────────────────────────────

    /// Reconfigure a submodule and make it active (administrator only).
    ///
    /// The identity's existing fraud tally survives: pointing back at a
    /// disqualified submodule without raising its threshold leaves it
    /// disqualified.
    pub fn configure_submodule(
        &mut self,
        caller: Address,
        submodule: Address,
        vote_threshold: u64,
        fraud_window_secs: u64,
    ) -> Result<(), VerifierError> {
        self.require_admin(caller)?;
        if !self.oracles.contains(&submodule) {
            return Err(VerifierError::SubmoduleUnavailable(submodule));
        }
        self.submodules
            .configure(submodule, vote_threshold, fraud_window_secs);
        self.pending_events.push(VerifierEvent::SubmoduleConfigured {
            submodule,
            vote_threshold,
            fraud_window_secs,
        });
        Ok(())
    }

    /// Add watchers (administrator only, idempotent).
    pub fn add_watchers(&mut self, caller: Address, ids: &[Address]) -> Result<(), VerifierError> {
        self.require_admin(caller)?;
        let added = self.watchers.add(ids);
        if !added.is_empty() {
            self.pending_events.push(VerifierEvent::WatchersAdded { added });
        }
        Ok(())
    }

    /// Remove watchers (administrator only, idempotent).
    pub fn remove_watchers(
        &mut self,
        caller: Address,
        ids: &[Address],
    ) -> Result<(), VerifierError> {
        self.require_admin(caller)?;
        let removed = self.watchers.remove(ids);
        if !removed.is_empty() {
            self.pending_events
                .push(VerifierEvent::WatchersRemoved { removed });
        }
        Ok(())
    }

    fn require_admin(&self, caller: Address) -> Result<(), VerifierError> {
        if caller != self.admin {
            return Err(VerifierError::Unauthorized(caller));
        }
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Current watcher membership, sorted.
    pub fn watchers(&self) -> Vec<Address> {
        self.watchers.to_vec()
    }

    pub fn is_watcher(&self, id: &Address) -> bool {
        self.watchers.contains(id)
    }

    /// The submodule used for new pre-verifications.
    pub fn active_submodule(&self) -> Address {
        self.submodules.active()
    }

    /// Status record of any known submodule.
    pub fn submodule_status(&self, submodule: &Address) -> Option<SubmoduleStatus> {
        self.submodules.status(submodule)
    }

    pub fn message_state(&self, id: &MessageId) -> Option<MessageState> {
        self.messages.state(id)
    }

    // ── Fraud voting ───────────────────────────────────────────────────

    /// Cast an irrevocable fraud vote against a submodule (watchers only).
    ///
    /// The duplicate check and the tally increment happen in one sequenced
    /// step, so a watcher retrying the call can never double-count.
    pub fn mark_fraudulent(
        &mut self,
        caller: Address,
        submodule: Address,
    ) -> Result<(), VerifierError> {
        if !self.watchers.contains(&caller) {
            return Err(VerifierError::Unauthorized(caller));
        }
        if !self.fraud_votes.record(caller, submodule) {
            return Err(VerifierError::AlreadyMarked {
                watcher: caller,
                submodule,
            });
        }
        let tally = self.submodules.record_vote(submodule);
        self.pending_events.push(VerifierEvent::FraudVoteRecorded {
            watcher: caller,
            submodule,
            tally,
        });

        // Report the exact vote that crossed the threshold.
        if let Some(status) = self.submodules.status(&submodule) {
            if status.is_fraudulent() && tally == status.vote_threshold + 1 {
                self.pending_events.push(VerifierEvent::SubmoduleDisqualified {
                    submodule,
                    tally,
                    threshold: status.vote_threshold,
                });
            }
        }
        Ok(())
    }

    // ── Two-phase acceptance ───────────────────────────────────────────

    /// Phase one: forward a message to the active submodule oracle and, on a
    /// positive answer, stamp its fingerprint with the current time.
    ///
    /// A disqualified submodule can never mint new pre-verifications, even if
    /// its oracle would answer `true` — the fraud check runs before the oracle
    /// call. A negative oracle answer is returned as `Ok(false)` with no state
    /// change; an oracle failure propagates and also leaves no state change.
    pub fn pre_verify(
        &mut self,
        metadata: &[u8],
        message: &[u8],
        now: Timestamp,
    ) -> Result<bool, VerifierError> {
        let id = fingerprint(message);
        if self.messages.state(&id).is_some() {
            return Err(VerifierError::AlreadyPreverified(id));
        }

        let active = self.submodules.active();
        if self.submodules.active_status().is_fraudulent() {
            return Err(VerifierError::FraudulentSubmodule(active));
        }

        let oracle = self
            .oracles
            .resolve(&active)
            .ok_or(VerifierError::SubmoduleUnavailable(active))?;
        if !oracle.verify(metadata, message)? {
            return Ok(false);
        }

        self.messages.mark_preverified(id, now)?;
        self.pending_events
            .push(VerifierEvent::MessagePreVerified { id, at: now });
        Ok(true)
    }

    /// Phase two: finalize a pre-verified message once the fraud window has
    /// elapsed and the active submodule is still in good standing.
    ///
    /// Fraud is re-checked here because votes may land after pre-verification
    /// but before the window elapses — that contest period is the entire point
    /// of the optimistic design. The window compared against is the active
    /// submodule's configured `fraud_window_secs`.
    pub fn verify(&mut self, message: &[u8], now: Timestamp) -> Result<bool, VerifierError> {
        let active = self.submodules.active();
        let status = self.submodules.active_status();
        if status.is_fraudulent() {
            return Err(VerifierError::FraudulentSubmodule(active));
        }

        let id = fingerprint(message);
        self.messages.finalize(id, status.fraud_window_secs, now)?;
        self.pending_events.push(VerifierEvent::MessageFinalized { id });
        Ok(true)
    }

    // ── Events & persistence ───────────────────────────────────────────

    /// Drain pending events for the host process.
    pub fn drain_events(&mut self) -> Vec<VerifierEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Serialize all state tables for persistence.
    pub fn snapshot(&self) -> VerifierSnapshot {
        VerifierSnapshot {
            admin: self.admin,
            watchers: self.watchers.clone(),
            submodules: self.submodules.clone(),
            fraud_votes: self.fraud_votes.clone(),
            messages: self.messages.clone(),
        }
    }

    /// Restore from a persisted snapshot, re-attaching live oracles.
    pub fn restore(snapshot: VerifierSnapshot, oracles: OracleDirectory) -> Self {
        Self {
            admin: snapshot.admin,
            oracles,
            watchers: snapshot.watchers,
            submodules: snapshot.submodules,
            fraud_votes: snapshot.fraud_votes,
            messages: snapshot.messages,
            pending_events: Vec::new(),
        }
    }
}

/// Serializable snapshot of the verifier's state tables.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifierSnapshot {
    pub admin: Address,
    pub watchers: WatcherRegistry,
    pub submodules: SubmoduleTable,
    pub fraud_votes: FraudVoteLedger,
    pub messages: MessageLedger,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OracleError, SubmoduleOracle};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const DAY_SECS: u64 = 86_400;
    const WEEK_SECS: u64 = 7 * DAY_SECS;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    /// Oracle that always answers the same and counts invocations.
    struct FixedOracle {
        answer: bool,
        calls: AtomicU32,
    }

    impl FixedOracle {
        fn new(answer: bool) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicU32::new(0),
            })
        }
    }

    impl SubmoduleOracle for FixedOracle {
        fn verify(&self, _metadata: &[u8], _message: &[u8]) -> Result<bool, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer)
        }
    }

    struct CrashingOracle;

    impl SubmoduleOracle for CrashingOracle {
        fn verify(&self, _metadata: &[u8], _message: &[u8]) -> Result<bool, OracleError> {
            Err(OracleError::Failed("oracle reverted".into()))
        }
    }

    fn admin() -> Address {
        addr(0xAA)
    }

    fn submodule() -> Address {
        addr(0x51)
    }

    /// Gate with one always-yes submodule, threshold 1, 7-day window.
    fn gate() -> OptimisticVerifier {
        gate_with(FixedOracle::new(true), 1, WEEK_SECS)
    }

    fn gate_with(
        oracle: Arc<dyn SubmoduleOracle>,
        threshold: u64,
        window_secs: u64,
    ) -> OptimisticVerifier {
        let mut oracles = OracleDirectory::new();
        oracles.register(submodule(), oracle);
        OptimisticVerifier::initialize(admin(), submodule(), threshold, window_secs, oracles)
            .unwrap()
    }

    // ── Initialization ─────────────────────────────────────────────────

    #[test]
    fn initialize_rejects_zero_admin() {
        let mut oracles = OracleDirectory::new();
        oracles.register(submodule(), FixedOracle::new(true));
        let err = OptimisticVerifier::initialize(Address::ZERO, submodule(), 1, 60, oracles)
            .err()
            .unwrap();
        assert!(matches!(err, VerifierError::InvalidAdmin));
    }

    #[test]
    fn initialize_rejects_unresolved_submodule() {
        let err =
            OptimisticVerifier::initialize(admin(), submodule(), 1, 60, OracleDirectory::new())
                .err()
                .unwrap();
        assert!(matches!(err, VerifierError::SubmoduleUnavailable(s) if s == submodule()));
    }

    // ── Administration ─────────────────────────────────────────────────

    #[test]
    fn configure_requires_admin() {
        let mut gate = gate();
        let err = gate
            .configure_submodule(addr(0xBB), submodule(), 2, 60)
            .unwrap_err();
        assert!(matches!(err, VerifierError::Unauthorized(c) if c == addr(0xBB)));
    }

    #[test]
    fn configure_rejects_unresolved_submodule() {
        let mut gate = gate();
        let err = gate
            .configure_submodule(admin(), addr(0x99), 2, 60)
            .unwrap_err();
        assert!(matches!(err, VerifierError::SubmoduleUnavailable(_)));
    }

    #[test]
    fn watcher_mutations_require_admin() {
        let mut gate = gate();
        assert!(gate.add_watchers(addr(0xBB), &[addr(1)]).is_err());
        assert!(gate.remove_watchers(addr(0xBB), &[addr(1)]).is_err());
        assert!(gate.watchers().is_empty());
    }

    #[test]
    fn watcher_add_remove_idempotent_and_exact() {
        let mut gate = gate();
        gate.add_watchers(admin(), &[addr(1), addr(2), addr(1)]).unwrap();
        gate.add_watchers(admin(), &[addr(2)]).unwrap();
        gate.remove_watchers(admin(), &[addr(3)]).unwrap();
        assert_eq!(gate.watchers(), vec![addr(1), addr(2)]);
        gate.remove_watchers(admin(), &[addr(1)]).unwrap();
        assert_eq!(gate.watchers(), vec![addr(2)]);
    }

    // ── Vote uniqueness ────────────────────────────────────────────────

    #[test]
    fn duplicate_fraud_vote_rejected_tally_increments_once() {
        let mut gate = gate();
        gate.add_watchers(admin(), &[addr(1)]).unwrap();

        gate.mark_fraudulent(addr(1), submodule()).unwrap();
        let err = gate.mark_fraudulent(addr(1), submodule()).unwrap_err();
        assert!(matches!(
            err,
            VerifierError::AlreadyMarked { watcher, submodule: s }
                if watcher == addr(1) && s == submodule()
        ));
        assert_eq!(
            gate.submodule_status(&submodule()).unwrap().fraudulent_votes,
            1
        );
    }

    #[test]
    fn fraud_vote_requires_watcher() {
        let mut gate = gate();
        let err = gate.mark_fraudulent(addr(1), submodule()).unwrap_err();
        assert!(matches!(err, VerifierError::Unauthorized(_)));
        assert_eq!(
            gate.submodule_status(&submodule()).unwrap().fraudulent_votes,
            0
        );
    }

    #[test]
    fn vote_survives_watcher_removal_and_readd() {
        // The flag is keyed by identity, not registry membership: a removed and
        // re-added watcher still cannot vote twice.
        let mut gate = gate();
        gate.add_watchers(admin(), &[addr(1)]).unwrap();
        gate.mark_fraudulent(addr(1), submodule()).unwrap();

        gate.remove_watchers(admin(), &[addr(1)]).unwrap();
        gate.add_watchers(admin(), &[addr(1)]).unwrap();

        let err = gate.mark_fraudulent(addr(1), submodule()).unwrap_err();
        assert!(matches!(err, VerifierError::AlreadyMarked { .. }));
    }

    // ── Fraud predicate monotonicity ───────────────────────────────────

    #[test]
    fn reconfigure_does_not_clear_fraud_but_raised_threshold_does() {
        let mut gate = gate_with(FixedOracle::new(true), 0, WEEK_SECS);
        gate.add_watchers(admin(), &[addr(1)]).unwrap();
        gate.mark_fraudulent(addr(1), submodule()).unwrap();
        assert!(gate.submodule_status(&submodule()).unwrap().is_fraudulent());

        // Same threshold, new window: still fraudulent.
        gate.configure_submodule(admin(), submodule(), 0, DAY_SECS)
            .unwrap();
        assert!(gate.submodule_status(&submodule()).unwrap().is_fraudulent());

        // Threshold above tally: cleared.
        gate.configure_submodule(admin(), submodule(), 1, DAY_SECS)
            .unwrap();
        assert!(!gate.submodule_status(&submodule()).unwrap().is_fraudulent());
    }

    // ── Pre-verify ─────────────────────────────────────────────────────

    #[test]
    fn preverify_twice_rejected_without_oracle_call() {
        let oracle = FixedOracle::new(true);
        let mut gate = gate_with(oracle.clone(), 1, WEEK_SECS);
        let now = Timestamp::new(1000);

        assert!(gate.pre_verify(b"meta", b"M", now).unwrap());
        let err = gate.pre_verify(b"meta", b"M", now).unwrap_err();
        assert!(matches!(err, VerifierError::AlreadyPreverified(_)));
        // The second call never reached the oracle.
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn negative_oracle_answer_is_retryable() {
        let mut gate = gate_with(FixedOracle::new(false), 1, WEEK_SECS);
        let now = Timestamp::new(1000);

        assert!(!gate.pre_verify(b"meta", b"M", now).unwrap());
        assert!(gate.message_state(&fingerprint(b"M")).is_none());
        // Same message can be attempted again.
        assert!(!gate.pre_verify(b"meta", b"M", now).unwrap());
    }

    #[test]
    fn oracle_failure_propagates_without_state_change() {
        let mut gate = gate_with(Arc::new(CrashingOracle), 1, WEEK_SECS);
        let err = gate
            .pre_verify(b"meta", b"M", Timestamp::new(1000))
            .unwrap_err();
        assert!(matches!(err, VerifierError::Oracle(_)));
        assert!(gate.message_state(&fingerprint(b"M")).is_none());
    }

    #[test]
    fn fraudulent_submodule_blocks_preverify_before_oracle() {
        let oracle = FixedOracle::new(true);
        let mut gate = gate_with(oracle.clone(), 0, WEEK_SECS);
        gate.add_watchers(admin(), &[addr(1)]).unwrap();
        gate.mark_fraudulent(addr(1), submodule()).unwrap();

        let err = gate
            .pre_verify(b"meta", b"M", Timestamp::new(1000))
            .unwrap_err();
        assert!(matches!(err, VerifierError::FraudulentSubmodule(_)));
        // The oracle was never consulted.
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    // ── Finalization ordering ──────────────────────────────────────────

    #[test]
    fn verify_before_preverify_fails() {
        let mut gate = gate();
        let err = gate.verify(b"M", Timestamp::new(1000)).unwrap_err();
        assert!(matches!(err, VerifierError::NotPreverified(_)));
    }

    #[test]
    fn verify_inside_window_fails() {
        let mut gate = gate();
        let t0 = Timestamp::new(1000);
        gate.pre_verify(b"meta", b"M", t0).unwrap();

        let err = gate
            .verify(b"M", Timestamp::new(1000 + WEEK_SECS - 1))
            .unwrap_err();
        assert!(matches!(err, VerifierError::FraudWindowNotElapsed { remaining_secs: 1 }));
    }

    #[test]
    fn late_fraud_votes_block_finalization_even_after_window() {
        // End-to-end: threshold 1, window 7 days, oracle says yes. Two distinct
        // watchers vote after pre-verification; tally 2 > 1 blocks verify
        // forever, regardless of elapsed time.
        let mut gate = gate();
        gate.add_watchers(admin(), &[addr(1), addr(2)]).unwrap();

        let t0 = Timestamp::new(1000);
        assert!(gate.pre_verify(b"meta", b"M", t0).unwrap());

        gate.mark_fraudulent(addr(1), submodule()).unwrap();
        gate.mark_fraudulent(addr(2), submodule()).unwrap();

        let after_window = Timestamp::new(1000 + WEEK_SECS + 1);
        let err = gate.verify(b"M", after_window).unwrap_err();
        assert!(matches!(err, VerifierError::FraudulentSubmodule(s) if s == submodule()));

        // State is still pre-verified, not finalized and not reverted.
        assert!(matches!(
            gate.message_state(&fingerprint(b"M")),
            Some(MessageState::PreVerified { .. })
        ));
    }

    #[test]
    fn clean_run_finalizes_once_then_already_verified() {
        // End-to-end: zero fraud votes; after the window the message finalizes
        // exactly once.
        let mut gate = gate();
        let t0 = Timestamp::new(1000);
        assert!(gate.pre_verify(b"meta", b"M", t0).unwrap());

        let after_window = Timestamp::new(1000 + WEEK_SECS);
        assert!(gate.verify(b"M", after_window).unwrap());

        let err = gate.verify(b"M", after_window).unwrap_err();
        assert!(matches!(err, VerifierError::AlreadyVerified(_)));
        assert_eq!(
            gate.message_state(&fingerprint(b"M")),
            Some(MessageState::Finalized)
        );
    }

    #[test]
    fn tally_at_threshold_does_not_block() {
        // Strict inequality: tally == threshold is not yet disqualifying.
        let mut gate = gate();
        gate.add_watchers(admin(), &[addr(1)]).unwrap();
        let t0 = Timestamp::new(1000);
        gate.pre_verify(b"meta", b"M", t0).unwrap();
        gate.mark_fraudulent(addr(1), submodule()).unwrap();

        assert!(gate.verify(b"M", Timestamp::new(1000 + WEEK_SECS)).unwrap());
    }

    #[test]
    fn verify_honors_reconfigured_window() {
        let mut gate = gate();
        let t0 = Timestamp::new(1000);
        gate.pre_verify(b"meta", b"M", t0).unwrap();

        // Shrink the window to one day; the message becomes finalizable a day
        // after its stamp, not a week.
        gate.configure_submodule(admin(), submodule(), 1, DAY_SECS)
            .unwrap();
        assert!(gate.verify(b"M", Timestamp::new(1000 + DAY_SECS)).unwrap());
    }

    #[test]
    fn switching_active_submodule_routes_new_preverifications() {
        let first = FixedOracle::new(true);
        let second = FixedOracle::new(true);
        let mut oracles = OracleDirectory::new();
        oracles.register(submodule(), first.clone());
        oracles.register(addr(0x52), second.clone());

        let mut gate =
            OptimisticVerifier::initialize(admin(), submodule(), 1, WEEK_SECS, oracles).unwrap();
        gate.configure_submodule(admin(), addr(0x52), 1, WEEK_SECS)
            .unwrap();
        assert_eq!(gate.active_submodule(), addr(0x52));

        gate.pre_verify(b"meta", b"M", Timestamp::new(1000)).unwrap();
        assert_eq!(first.calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
        // The old submodule's record is still readable.
        assert!(gate.submodule_status(&submodule()).is_some());
    }

    // ── Events & snapshot ──────────────────────────────────────────────

    #[test]
    fn disqualification_event_fires_on_crossing_vote_only() {
        let mut gate = gate();
        gate.add_watchers(admin(), &[addr(1), addr(2), addr(3)]).unwrap();
        gate.drain_events();

        gate.mark_fraudulent(addr(1), submodule()).unwrap();
        gate.mark_fraudulent(addr(2), submodule()).unwrap();
        gate.mark_fraudulent(addr(3), submodule()).unwrap();

        let events = gate.drain_events();
        let disqualified: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, VerifierEvent::SubmoduleDisqualified { .. }))
            .collect();
        assert_eq!(disqualified.len(), 1);
        match disqualified[0] {
            VerifierEvent::SubmoduleDisqualified { tally, threshold, .. } => {
                assert_eq!(*tally, 2);
                assert_eq!(*threshold, 1);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn drain_events_clears_buffer() {
        let mut gate = gate();
        gate.add_watchers(admin(), &[addr(1)]).unwrap();
        assert!(!gate.drain_events().is_empty());
        assert!(gate.drain_events().is_empty());
    }

    #[test]
    fn snapshot_restore_preserves_all_tables() {
        let mut gate = gate();
        gate.add_watchers(admin(), &[addr(1), addr(2)]).unwrap();
        gate.mark_fraudulent(addr(1), submodule()).unwrap();
        gate.pre_verify(b"meta", b"M", Timestamp::new(1000)).unwrap();

        let encoded = bincode::serialize(&gate.snapshot()).unwrap();
        let snapshot: VerifierSnapshot = bincode::deserialize(&encoded).unwrap();

        let mut oracles = OracleDirectory::new();
        oracles.register(submodule(), FixedOracle::new(true));
        let mut restored = OptimisticVerifier::restore(snapshot, oracles);

        assert_eq!(restored.admin(), admin());
        assert_eq!(restored.watchers(), vec![addr(1), addr(2)]);
        assert_eq!(
            restored.submodule_status(&submodule()).unwrap().fraudulent_votes,
            1
        );
        // The recorded vote is still irrevocable after restore.
        let err = restored.mark_fraudulent(addr(1), submodule()).unwrap_err();
        assert!(matches!(err, VerifierError::AlreadyMarked { .. }));
        // The pre-verification stamp survived.
        assert!(matches!(
            restored.message_state(&fingerprint(b"M")),
            Some(MessageState::PreVerified { .. })
        ));
    }
}
