//! HTTP client for remote submodule oracles.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use vigil_verification::{OracleError, SubmoduleOracle};

/// A submodule oracle reached over HTTP.
///
/// `POST {endpoint}/verify` with hex payloads; the oracle answers
/// `{ "valid": bool }`. Transport failures, non-2xx statuses, and malformed
/// bodies map to distinct [`OracleError`] variants so the gate can surface
/// them verbatim — a crashing oracle is never read as "verification failed".
pub struct HttpOracle {
    endpoint: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct VerifyRequest {
    metadata: String,
    message: String,
}

#[derive(Deserialize)]
struct VerifyResponse {
    valid: bool,
}

impl HttpOracle {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, OracleError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Failed(e.to_string()))?;
        Ok(Self { endpoint, client })
    }

    fn verify_url(&self) -> String {
        format!("{}/verify", self.endpoint.trim_end_matches('/'))
    }
}

impl SubmoduleOracle for HttpOracle {
    fn verify(&self, metadata: &[u8], message: &[u8]) -> Result<bool, OracleError> {
        let request = VerifyRequest {
            metadata: hex::encode(metadata),
            message: hex::encode(message),
        };
        let response = self
            .client
            .post(self.verify_url())
            .json(&request)
            .send()
            .map_err(|e| OracleError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Failed(format!("oracle answered {status}")));
        }
        let body: VerifyResponse = response
            .json()
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;
        Ok(body.valid)
    }
}
