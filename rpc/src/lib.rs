//! HTTP RPC surface for the vigil gate.
//!
//! Every boundary operation is a synchronous request/response over JSON; byte
//! payloads (metadata, message) travel hex-encoded. All mutations are
//! serialized through one lock around the verifier, matching its
//! single-sequencer execution model.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{AppState, RpcServer};
