//! The submodule oracle seam.
//!
//! The gate does not specify HOW a submodule verifies a message — only THAT it
//! answers yes or no. Different submodules can run entirely different
//! verification algorithms behind this trait.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use vigil_types::Address;

/// A pluggable submodule oracle.
///
/// `Ok(false)` is a legitimate negative answer (the caller may retry later,
/// e.g. after more off-chain evidence accrues). `Err` means the oracle itself
/// failed and is surfaced verbatim — it is never interpreted as `false`.
pub trait SubmoduleOracle: Send + Sync {
    /// Assess a (metadata, message) pair.
    fn verify(&self, metadata: &[u8], message: &[u8]) -> Result<bool, OracleError>;
}

/// Failure of the oracle itself, distinct from a negative verification result.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle unreachable: {0}")]
    Unreachable(String),

    #[error("oracle call failed: {0}")]
    Failed(String),

    #[error("oracle returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Maps submodule identities to live oracle instances.
///
/// A submodule identity "resolves" iff it is registered here; configuration of
/// an unregistered identity is rejected by the orchestrator.
#[derive(Clone, Default)]
pub struct OracleDirectory {
    oracles: HashMap<Address, Arc<dyn SubmoduleOracle>>,
}

impl std::fmt::Debug for OracleDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleDirectory")
            .field("submodules", &self.oracles.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl OracleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an oracle for a submodule identity, replacing any previous one.
    pub fn register(&mut self, submodule: Address, oracle: Arc<dyn SubmoduleOracle>) {
        self.oracles.insert(submodule, oracle);
    }

    pub fn resolve(&self, submodule: &Address) -> Option<Arc<dyn SubmoduleOracle>> {
        self.oracles.get(submodule).cloned()
    }

    pub fn contains(&self, submodule: &Address) -> bool {
        self.oracles.contains_key(submodule)
    }

    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }
}
