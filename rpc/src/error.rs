//! RPC error types and HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use vigil_verification::VerifierError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Verifier(#[from] VerifierError),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    /// The HTTP status a failure surfaces as.
    ///
    /// Guard violations of the message state machine and duplicate votes are
    /// conflicts; a not-yet-elapsed fraud window is 425 Too Early; submodule
    /// resolution and oracle failures are upstream (502) problems.
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RpcError::Verifier(err) => match err {
                VerifierError::InvalidAdmin => StatusCode::BAD_REQUEST,
                VerifierError::Unauthorized(_) => StatusCode::FORBIDDEN,
                VerifierError::NotPreverified(_) => StatusCode::NOT_FOUND,
                VerifierError::AlreadyMarked { .. }
                | VerifierError::FraudulentSubmodule(_)
                | VerifierError::AlreadyPreverified(_)
                | VerifierError::AlreadyVerified(_) => StatusCode::CONFLICT,
                VerifierError::FraudWindowNotElapsed { .. } => {
                    StatusCode::from_u16(425).unwrap_or(StatusCode::CONFLICT)
                }
                VerifierError::SubmoduleUnavailable(_) | VerifierError::Oracle(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_types::{Address, MessageId};
    use vigil_verification::OracleError;

    #[test]
    fn unauthorized_is_forbidden() {
        let err = RpcError::from(VerifierError::Unauthorized(Address::ZERO));
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn state_machine_guards_are_conflicts() {
        let id = MessageId::ZERO;
        for err in [
            VerifierError::AlreadyPreverified(id),
            VerifierError::AlreadyVerified(id),
            VerifierError::FraudulentSubmodule(Address::ZERO),
            VerifierError::AlreadyMarked {
                watcher: Address::ZERO,
                submodule: Address::ZERO,
            },
        ] {
            assert_eq!(RpcError::from(err).status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn window_not_elapsed_is_too_early() {
        let err = RpcError::from(VerifierError::FraudWindowNotElapsed { remaining_secs: 9 });
        assert_eq!(err.status().as_u16(), 425);
    }

    #[test]
    fn oracle_failures_are_bad_gateway() {
        let err = RpcError::from(VerifierError::Oracle(OracleError::Unreachable("x".into())));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        let err = RpcError::from(VerifierError::SubmoduleUnavailable(Address::ZERO));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unseen_message_is_not_found() {
        let err = RpcError::from(VerifierError::NotPreverified(MessageId::ZERO));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
