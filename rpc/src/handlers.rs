//! RPC request handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::server::AppState;
use vigil_types::{Address, Timestamp};
use vigil_verification::{OptimisticVerifier, VerifierEvent};

// ── Wire helpers ─────────────────────────────────────────────────────────

fn parse_address(raw: &str) -> Result<Address, RpcError> {
    Address::from_str(raw).map_err(|e| RpcError::InvalidRequest(format!("address {raw:?}: {e}")))
}

fn parse_addresses(raw: &[String]) -> Result<Vec<Address>, RpcError> {
    raw.iter().map(|s| parse_address(s)).collect()
}

/// Decode a hex byte payload, with or without a `0x` prefix.
fn parse_bytes(raw: &str) -> Result<Vec<u8>, RpcError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits).map_err(|e| RpcError::InvalidRequest(format!("hex payload: {e}")))
}

/// Hand drained verifier events to the log.
fn log_events(verifier: &mut OptimisticVerifier) {
    for event in verifier.drain_events() {
        match event {
            VerifierEvent::SubmoduleConfigured {
                submodule,
                vote_threshold,
                fraud_window_secs,
            } => tracing::info!(
                %submodule,
                vote_threshold,
                fraud_window = %vigil_utils::format_duration(fraud_window_secs),
                "submodule configured"
            ),
            VerifierEvent::WatchersAdded { added } => {
                tracing::info!(count = added.len(), "watchers added")
            }
            VerifierEvent::WatchersRemoved { removed } => {
                tracing::info!(count = removed.len(), "watchers removed")
            }
            VerifierEvent::FraudVoteRecorded {
                watcher,
                submodule,
                tally,
            } => tracing::info!(%watcher, %submodule, tally, "fraud vote recorded"),
            VerifierEvent::SubmoduleDisqualified {
                submodule,
                tally,
                threshold,
            } => tracing::warn!(%submodule, tally, threshold, "submodule disqualified"),
            VerifierEvent::MessagePreVerified { id, at } => {
                tracing::info!(message = %id, %at, "message pre-verified")
            }
            VerifierEvent::MessageFinalized { id } => {
                tracing::info!(message = %id, "message finalized")
            }
        }
    }
}

fn lock_verifier(state: &AppState) -> std::sync::MutexGuard<'_, OptimisticVerifier> {
    // A panic while holding the lock poisons it; the state tables themselves
    // are never left half-mutated, so the guard stays usable.
    state
        .verifier
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── Two-phase acceptance ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PreVerifyRequest {
    pub metadata: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct PreVerifyResponse {
    pub accepted: bool,
}

/// `POST /v1/pre_verify` — forward to the active submodule oracle and stamp
/// the fingerprint on success. Runs on the blocking pool because the oracle
/// call may take non-trivial time.
pub async fn pre_verify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PreVerifyRequest>,
) -> Result<Json<PreVerifyResponse>, RpcError> {
    let metadata = parse_bytes(&req.metadata)?;
    let message = parse_bytes(&req.message)?;
    state.stats.increment("pre_verify");

    let accepted = tokio::task::spawn_blocking(move || {
        let mut verifier = lock_verifier(&state);
        let result = verifier.pre_verify(&metadata, &message, Timestamp::now());
        log_events(&mut verifier);
        result
    })
    .await
    .map_err(|e| RpcError::Server(e.to_string()))??;

    Ok(Json(PreVerifyResponse { accepted }))
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub finalized: bool,
}

/// `POST /v1/verify` — finalize a pre-verified message after the fraud window.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, RpcError> {
    let message = parse_bytes(&req.message)?;
    state.stats.increment("verify");

    let mut verifier = lock_verifier(&state);
    let finalized = verifier.verify(&message, Timestamp::now())?;
    log_events(&mut verifier);
    Ok(Json(VerifyResponse { finalized }))
}

// ── Fraud voting ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MarkFraudulentRequest {
    pub caller: String,
    pub submodule: String,
}

#[derive(Serialize)]
pub struct MarkFraudulentResponse {
    pub tally: u64,
}

/// `POST /v1/fraud/mark` — cast an irrevocable fraud vote (watchers only).
pub async fn mark_fraudulent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MarkFraudulentRequest>,
) -> Result<Json<MarkFraudulentResponse>, RpcError> {
    let caller = parse_address(&req.caller)?;
    let submodule = parse_address(&req.submodule)?;
    state.stats.increment("mark_fraudulent");

    let mut verifier = lock_verifier(&state);
    verifier.mark_fraudulent(caller, submodule)?;
    let tally = verifier
        .submodule_status(&submodule)
        .map(|s| s.fraudulent_votes)
        .unwrap_or(0);
    log_events(&mut verifier);
    Ok(Json(MarkFraudulentResponse { tally }))
}

// ── Administration ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConfigureSubmoduleRequest {
    pub caller: String,
    pub submodule: String,
    pub vote_threshold: u64,
    pub fraud_window_secs: u64,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// `POST /v1/submodule/configure` — administrator only.
pub async fn configure_submodule(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConfigureSubmoduleRequest>,
) -> Result<Json<OkResponse>, RpcError> {
    let caller = parse_address(&req.caller)?;
    let submodule = parse_address(&req.submodule)?;

    let mut verifier = lock_verifier(&state);
    verifier.configure_submodule(caller, submodule, req.vote_threshold, req.fraud_window_secs)?;
    log_events(&mut verifier);
    Ok(Json(OkResponse { ok: true }))
}

#[derive(Deserialize)]
pub struct WatcherSetRequest {
    pub caller: String,
    pub watchers: Vec<String>,
}

/// `POST /v1/watchers/add` — administrator only, idempotent.
pub async fn add_watchers(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WatcherSetRequest>,
) -> Result<Json<OkResponse>, RpcError> {
    let caller = parse_address(&req.caller)?;
    let ids = parse_addresses(&req.watchers)?;

    let mut verifier = lock_verifier(&state);
    verifier.add_watchers(caller, &ids)?;
    log_events(&mut verifier);
    Ok(Json(OkResponse { ok: true }))
}

/// `POST /v1/watchers/remove` — administrator only, idempotent.
pub async fn remove_watchers(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WatcherSetRequest>,
) -> Result<Json<OkResponse>, RpcError> {
    let caller = parse_address(&req.caller)?;
    let ids = parse_addresses(&req.watchers)?;

    let mut verifier = lock_verifier(&state);
    verifier.remove_watchers(caller, &ids)?;
    log_events(&mut verifier);
    Ok(Json(OkResponse { ok: true }))
}

// ── Queries ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct WatchersResponse {
    pub watchers: Vec<String>,
}

/// `GET /v1/watchers` — exact current membership.
pub async fn list_watchers(State(state): State<Arc<AppState>>) -> Json<WatchersResponse> {
    let verifier = lock_verifier(&state);
    let watchers = verifier.watchers().iter().map(|a| a.to_string()).collect();
    Json(WatchersResponse { watchers })
}

#[derive(Serialize)]
pub struct ActiveSubmoduleResponse {
    pub submodule: String,
}

/// `GET /v1/submodule` — the active submodule identity.
pub async fn active_submodule(State(state): State<Arc<AppState>>) -> Json<ActiveSubmoduleResponse> {
    let verifier = lock_verifier(&state);
    Json(ActiveSubmoduleResponse {
        submodule: verifier.active_submodule().to_string(),
    })
}

#[derive(Serialize)]
pub struct SubmoduleStatusResponse {
    pub fraudulent_votes: u64,
    pub vote_threshold: u64,
    pub fraud_window_secs: u64,
    pub fraudulent: bool,
}

/// `GET /v1/submodule/:address/status`.
pub async fn submodule_status(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<SubmoduleStatusResponse>, RpcError> {
    let submodule = parse_address(&address)?;
    let verifier = lock_verifier(&state);
    let status = verifier
        .submodule_status(&submodule)
        .ok_or_else(|| RpcError::InvalidRequest(format!("unknown submodule {submodule}")))?;
    Ok(Json(SubmoduleStatusResponse {
        fraudulent_votes: status.fraudulent_votes,
        vote_threshold: status.vote_threshold,
        fraud_window_secs: status.fraud_window_secs,
        fraudulent: status.is_fraudulent(),
    }))
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub pre_verify: u64,
    pub verify: u64,
    pub mark_fraudulent: u64,
}

/// `GET /v1/stats` — operation counters since startup.
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        pre_verify: state.stats.get("pre_verify"),
        verify: state.stats.get("verify"),
        mark_fraudulent: state.stats.get("mark_fraudulent"),
    })
}
