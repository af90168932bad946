//! Axum-based RPC server.

use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;

use crate::error::RpcError;
use crate::handlers;
use vigil_utils::StatsCounter;
use vigil_verification::OptimisticVerifier;

/// Shared server state: the verifier behind its single sequencing lock, plus
/// operation counters.
pub struct AppState {
    pub verifier: Mutex<OptimisticVerifier>,
    pub stats: StatsCounter,
}

impl AppState {
    pub fn new(verifier: OptimisticVerifier) -> Arc<Self> {
        Arc::new(Self {
            verifier: Mutex::new(verifier),
            stats: StatsCounter::new(&["pre_verify", "verify", "mark_fraudulent"]),
        })
    }
}

pub struct RpcServer {
    port: u16,
    state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(port: u16, verifier: OptimisticVerifier) -> Self {
        Self {
            port,
            state: AppState::new(verifier),
        }
    }

    /// Build the route table against a given state (also used by tests).
    pub fn router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/v1/pre_verify", post(handlers::pre_verify))
            .route("/v1/verify", post(handlers::verify))
            .route("/v1/fraud/mark", post(handlers::mark_fraudulent))
            .route("/v1/submodule/configure", post(handlers::configure_submodule))
            .route("/v1/submodule", get(handlers::active_submodule))
            .route("/v1/submodule/:address/status", get(handlers::submodule_status))
            .route("/v1/watchers", get(handlers::list_watchers))
            .route("/v1/watchers/add", post(handlers::add_watchers))
            .route("/v1/watchers/remove", post(handlers::remove_watchers))
            .route("/v1/stats", get(handlers::stats))
            .with_state(state)
    }

    /// Bind and serve until the process shuts down.
    pub async fn start(self) -> Result<(), RpcError> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        tracing::info!("RPC server listening on {addr}");
        axum::serve(listener, Self::router(self.state))
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
