//! Error types for the identity gateway

use crate::gateway::Operation;
use thiserror::Error;

/// Gateway-wide result type
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Failures raised to the caller.
///
/// A backend that cannot be reached at all is not an error here: dispatch
/// reports it as an internal status inside the response envelope.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The backend call failed after a client was obtained
    #[error("gateway: error calling {operation}")]
    Dispatch {
        operation: Operation,
        #[source]
        source: tonic::Status,
    },

    /// A scheme-encoded user id could not be turned into a canonical one
    #[error("error resolving UID to user ID: {reason}")]
    Resolution { opaque_id: String, reason: String },
}

impl GatewayError {
    pub fn dispatch(operation: Operation, source: tonic::Status) -> Self {
        GatewayError::Dispatch { operation, source }
    }

    pub fn resolution(opaque_id: impl Into<String>, reason: impl Into<String>) -> Self {
        GatewayError::Resolution {
            opaque_id: opaque_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<GatewayError> for tonic::Status {
    fn from(err: GatewayError) -> Self {
        match &err {
            GatewayError::Dispatch { source, .. } => {
                tonic::Status::new(source.code(), format!("{}: {}", err, source.message()))
            }
            GatewayError::Resolution { .. } => tonic::Status::not_found(err.to_string()),
        }
    }
}
