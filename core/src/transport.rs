//! Network execution of assembled requests.
//!
//! # Design
//! [`Transport`] is the single I/O seam of the crate: the dispatcher hands it
//! an [`HttpRequest`] and gets back an [`HttpResponse`] for every status
//! code. Only failures to connect, write or read are errors.
//!
//! [`UreqTransport`] is the blocking default. It builds a fresh `ureq` agent
//! for every call so no connection outlives its invocation, and it disables
//! ureq's status-as-error behavior so 4xx/5xx bodies come back as data.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use ureq::http::header::CONTENT_TYPE;

use crate::config::{BodyMode, ClientConfig};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A round trip that failed below the HTTP layer.
#[derive(Debug, Error)]
#[error("{method} {uri}: {source}")]
pub struct TransportError {
    pub method: HttpMethod,
    pub uri: String,
    #[source]
    source: BoxError,
}

impl TransportError {
    pub fn new(method: HttpMethod, uri: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            method,
            uri: uri.into(),
            source: source.into(),
        }
    }
}

/// Executes one request and returns its response, whatever the status.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking HTTP/1.1 transport backed by `ureq`.
#[derive(Clone)]
pub struct UreqTransport {
    config: ureq::config::Config,
    body_mode: BodyMode,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("body_mode", &self.body_mode)
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_timeouts(config.connect_timeout, config.timeout, config.body_mode)
    }

    pub fn with_timeouts(connect: Option<Duration>, global: Option<Duration>, body_mode: BodyMode) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(connect)
            .timeout_global(global)
            .build();
        Self { config, body_mode }
    }

    fn send(&self, request: &HttpRequest, uri: &str) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let agent = self.config.clone().new_agent();
        match request.method() {
            HttpMethod::Get => with_headers(agent.get(uri), request).call(),
            HttpMethod::Delete => with_headers(agent.delete(uri), request).call(),
            HttpMethod::Patch => with_headers(agent.patch(uri), request).send_empty(),
            HttpMethod::Post | HttpMethod::Put => {
                let builder = if request.method() == HttpMethod::Post {
                    agent.post(uri)
                } else {
                    agent.put(uri)
                };
                let builder = with_headers(builder, request);
                if !request.transmits_body() {
                    return builder.send_empty();
                }
                let declares_content_type = request
                    .headers()
                    .keys()
                    .any(|key| key.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
                let builder = if declares_content_type {
                    builder
                } else {
                    builder.content_type("application/json")
                };
                builder.send(request.body().as_bytes())
            }
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::with_timeouts(None, None, BodyMode::default())
    }
}

fn with_headers<B>(builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    request
        .headers()
        .iter()
        .fold(builder, |builder, (key, value)| builder.header(key.as_str(), value.as_str()))
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let uri = request.uri();
        let method = request.method();
        let mut response = self
            .send(request, &uri)
            .map_err(|e| TransportError::new(method, uri.as_str(), e))?;

        let status = response.status();
        let message = status.canonical_reason().unwrap_or_default().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()
            .map_err(|e| TransportError::new(method, uri.as_str(), e))?;
        let data = self.body_mode.assemble(text);

        let response = HttpResponse::new(status.as_u16(), message)
            .with_content_type(content_type)
            .with_data(data);
        debug!(
            %method,
            uri = %uri,
            status = response.status(),
            stream = if response.is_ok() { "success" } else { "error" },
            bytes = response.data().len(),
            "exchange complete"
        );
        Ok(response)
    }
}
