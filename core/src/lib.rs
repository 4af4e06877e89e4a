//! Blocking HTTP client for declared service contracts.
//!
//! # Overview
//! A service is described as a [`Contract`]: named operations, each with an
//! optional verb and path and one role (body, header or query) per
//! argument. A [`Client`] built from it turns every call into one HTTP
//! request and decodes the response body into the type the caller asks for.
//!
//! ```no_run
//! use contract_client::{BodyType, Client, ClientConfig, Contract, OperationDescriptor, Parameter};
//! use serde_json::json;
//!
//! # fn run() -> Result<(), contract_client::ClientError> {
//! let contract = Contract::builder()
//!     .operation(OperationDescriptor::get("search", "/search").param(Parameter::query("q")))
//!     .operation(OperationDescriptor::post("submit", "/submit").param(Parameter::body(BodyType::of::<String>())))
//!     .build()?;
//! let client = Client::new(ClientConfig::new("http://localhost:8080"), contract);
//!
//! let hits: Vec<String> = client.invoke("search", &[json!("rust")])?;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - Resolution ([`resolve()`]) and binding ([`bind()`]) are pure functions over
//!   the descriptor; missing metadata falls back silently instead of failing.
//! - [`HttpRequest`] and [`HttpResponse`] are immutable plain data.
//! - All network I/O goes through the [`Transport`] trait. [`UreqTransport`]
//!   is the default and opens a new connection for every call.
//! - Calls block the current thread. The client has no mutable state and is
//!   safe to share across threads.

pub mod bind;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod http;
pub mod resolve;
pub mod transport;

pub use bind::{bind, BoundParameters};
pub use client::{decode, Client};
pub use config::{BodyMode, ClientConfig};
pub use contract::{BodyType, Contract, ContractBuilder, OperationDescriptor, Parameter, ParameterRole, RoleKind, Route};
pub use error::ClientError;
pub use http::{is_ok_status, HttpMethod, HttpRequest, HttpResponse};
pub use resolve::resolve;
pub use transport::{Transport, TransportError, UreqTransport};
