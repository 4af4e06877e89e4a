//! Error types for contract clients.
//!
//! # Design
//! Every failure aborts the single in-flight invocation, so one enum covers
//! the whole pipeline. Missing verb or role metadata is not an error; those
//! gaps fall back silently in the resolver and the binder. A non-2xx status
//! is not an error either: only a body that cannot be decoded into the
//! requested type is, and in that case the raw response travels with the
//! error for diagnostics.

use thiserror::Error;

use crate::http::HttpResponse;
use crate::transport::TransportError;

/// Errors returned while preparing, executing or decoding an operation call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The contract has no operation registered under this name.
    #[error("operation '{0}' is not declared by the contract")]
    UnknownOperation(String),

    /// Two descriptors were registered under the same name.
    #[error("operation '{0}' is declared more than once")]
    DuplicateOperation(String),

    /// The call supplied a different number of arguments than the
    /// operation declares parameters.
    #[error("operation '{operation}' takes {expected} arguments, got {actual}")]
    ArgumentCount {
        operation: String,
        expected: usize,
        actual: usize,
    },

    /// A body argument could not be converted into its declared target type.
    #[error("failed to encode argument {position} of '{operation}' as {target}: {source}")]
    Serialization {
        operation: String,
        position: usize,
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A mandatory request field was missing or malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The connection could not be opened, written to or read from.
    #[error("transport failure in '{operation}': {source}")]
    Transport {
        operation: String,
        #[source]
        source: TransportError,
    },

    /// The response body could not be decoded into the declared result type.
    #[error("failed to decode response of '{operation}' from {url} (HTTP {status}): {source}")]
    Decode {
        operation: String,
        url: String,
        status: u16,
        response: Box<HttpResponse>,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// The raw response, when the failure happened after a round trip.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ClientError::Decode { response, .. } => Some(&**response),
            _ => None,
        }
    }

    /// HTTP status of the exchange, when one took place.
    pub fn status(&self) -> Option<u16> {
        self.response().map(HttpResponse::status)
    }
}
