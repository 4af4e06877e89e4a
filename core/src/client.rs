//! Request dispatcher for declared operations.
//!
//! # Design
//! `Client` turns one operation call into exactly one executed request:
//! resolve the verb and URL, bind the arguments, assemble an [`HttpRequest`],
//! hand it to the transport and decode the body of the resulting
//! [`HttpResponse`]. The three stages are also exposed separately
//! (`prepare`, `call`, `invoke`) so a caller can stop before the network or
//! before decoding.
//!
//! The client holds only the base URL, the shared contract and the
//! transport. It keeps no per-call state, so clones can be used from many
//! threads at once.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::error::Category;
use serde_json::Value;
use tracing::{debug, warn};

use crate::bind::bind;
use crate::config::ClientConfig;
use crate::contract::Contract;
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse};
use crate::resolve::resolve;
use crate::transport::{Transport, UreqTransport};

/// A callable implementation of a [`Contract`].
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    base_url: Arc<str>,
    contract: Arc<Contract>,
    transport: T,
}

impl Client<UreqTransport> {
    /// Client over the blocking `ureq` transport configured by `config`.
    pub fn new(config: ClientConfig, contract: Contract) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(config.base_url, contract, transport)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(base_url: impl Into<String>, contract: Contract, transport: T) -> Self {
        Self {
            base_url: Arc::from(base_url.into()),
            contract: Arc::new(contract),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Assemble the request for `operation` without performing any I/O.
    pub fn prepare(&self, operation: &str, args: &[Value]) -> Result<HttpRequest, ClientError> {
        let descriptor = self.contract.operation(operation)?;
        let (method, url) = resolve(&self.base_url, descriptor);
        let bound = bind(descriptor, args)?;
        let request = HttpRequest::new(url, method)?
            .with_headers(bound.headers)
            .with_query(bound.query)
            .with_body(bound.body);
        Ok(request)
    }

    /// Execute `operation` and return the raw response, whatever its status.
    pub fn call(&self, operation: &str, args: &[Value]) -> Result<HttpResponse, ClientError> {
        let request = self.prepare(operation, args)?;
        self.round_trip(operation, &request)
    }

    /// Execute `operation` and decode the response body into `R`.
    ///
    /// The status code is not checked: an error status whose body happens to
    /// decode into `R` is returned like any other value.
    pub fn invoke<R: DeserializeOwned>(&self, operation: &str, args: &[Value]) -> Result<R, ClientError> {
        let request = self.prepare(operation, args)?;
        let response = self.round_trip(operation, &request)?;
        decode(response.data()).map_err(|source| {
            warn!(operation, status = response.status(), error = %source, "failed to decode response");
            ClientError::Decode {
                operation: operation.to_string(),
                url: request.uri(),
                status: response.status(),
                response: Box::new(response),
                source,
            }
        })
    }

    fn round_trip(&self, operation: &str, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        debug!(
            operation,
            method = %request.method(),
            uri = %request.uri(),
            "dispatching operation"
        );
        request
            .execute(&self.transport)
            .map_err(|source| ClientError::Transport {
                operation: operation.to_string(),
                source,
            })
    }
}

/// Decode a response body into `R`.
///
/// Text that is not valid JSON is read as a bare string (or as `null` when
/// blank) before giving up, so a plain `hello` body decodes into a `String`.
/// A number or boolean body that does not fit `R` is retried as its text, so
/// `123` also decodes into a `String`. Any other mismatch is reported as is.
pub fn decode<R: DeserializeOwned>(data: &str) -> Result<R, serde_json::Error> {
    match serde_json::from_str(data) {
        Ok(value) => Ok(value),
        Err(err) if matches!(err.classify(), Category::Syntax | Category::Eof) => {
            let fallback = if data.trim().is_empty() {
                Value::Null
            } else {
                Value::String(data.to_string())
            };
            R::deserialize(fallback).map_err(|_| err)
        }
        Err(err) if matches!(err.classify(), Category::Data) => match serde_json::from_str::<Value>(data) {
            Ok(Value::Number(_) | Value::Bool(_)) => {
                R::deserialize(Value::String(data.trim().to_string())).map_err(|_| err)
            }
            _ => Err(err),
        },
        Err(err) => Err(err),
    }
}
