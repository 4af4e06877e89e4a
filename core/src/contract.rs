//! Declared operations and the registry that holds them.
//!
//! # Design
//! A service contract is described by plain values rather than discovered at
//! runtime: each [`OperationDescriptor`] names an operation, optionally binds
//! it to a verb and path, and lists one [`Parameter`] per call argument. The
//! [`Contract`] built from them is immutable and shared by every clone of a
//! client, so lookups need no synchronization.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::http::HttpMethod;

/// The target type a body argument is serialized as.
///
/// [`BodyType::of`] converts the argument into `T` first and serializes that
/// value, so only what `T` declares reaches the wire. A wider argument can
/// thereby be sent as a narrower type.
#[derive(Clone, Copy)]
pub struct BodyType {
    name: &'static str,
    encode: fn(&Value) -> Result<String, serde_json::Error>,
}

impl BodyType {
    pub fn of<T: Serialize + DeserializeOwned>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            encode: encode_as::<T>,
        }
    }

    /// Serialize the argument exactly as given.
    pub fn json() -> Self {
        Self {
            name: "json",
            encode: serde_json::to_string::<Value>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn encode(&self, value: &Value) -> Result<String, serde_json::Error> {
        (self.encode)(value)
    }
}

fn encode_as<T: Serialize + DeserializeOwned>(value: &Value) -> Result<String, serde_json::Error> {
    let typed = T::deserialize(value)?;
    serde_json::to_string(&typed)
}

impl fmt::Debug for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BodyType").field(&self.name).finish()
    }
}

/// Where a role puts its argument, in binding precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    Body,
    Header,
    Query,
}

/// How one argument maps onto the request.
#[derive(Debug, Clone)]
pub enum ParameterRole {
    Body(BodyType),
    Header(String),
    Query(String),
}

impl ParameterRole {
    pub fn kind(&self) -> RoleKind {
        match self {
            ParameterRole::Body(_) => RoleKind::Body,
            ParameterRole::Header(_) => RoleKind::Header,
            ParameterRole::Query(_) => RoleKind::Query,
        }
    }
}

/// Role metadata for one argument position.
///
/// A parameter normally carries zero or one role. When it carries more, only
/// the one with the highest precedence (Body, then Header, then Query) is
/// ever applied.
#[derive(Debug, Clone, Default)]
pub struct Parameter {
    roles: Vec<ParameterRole>,
}

impl Parameter {
    /// A parameter the request ignores.
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn body(target: BodyType) -> Self {
        Self::ignored().and(ParameterRole::Body(target))
    }

    pub fn header(key: impl Into<String>) -> Self {
        Self::ignored().and(ParameterRole::Header(key.into()))
    }

    pub fn query(key: impl Into<String>) -> Self {
        Self::ignored().and(ParameterRole::Query(key.into()))
    }

    /// Attach another role to the same parameter.
    pub fn and(mut self, role: ParameterRole) -> Self {
        self.roles.push(role);
        self
    }

    pub fn roles(&self) -> &[ParameterRole] {
        &self.roles
    }

    /// The single role binding honours, if any.
    pub fn effective_role(&self) -> Option<&ParameterRole> {
        [RoleKind::Body, RoleKind::Header, RoleKind::Query]
            .into_iter()
            .find_map(|kind| self.roles.iter().find(|role| role.kind() == kind))
    }
}

/// Verb and path template of a routed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
}

/// Metadata for one declared operation.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    name: String,
    route: Option<Route>,
    parameters: Vec<Parameter>,
}

impl OperationDescriptor {
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            route: Some(Route {
                method,
                path: path.into(),
            }),
            parameters: Vec::new(),
        }
    }

    /// An operation without verb metadata. It resolves to a GET on the base URL.
    pub fn unrouted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            route: None,
            parameters: Vec::new(),
        }
    }

    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    pub fn post(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Post, path)
    }

    pub fn put(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Put, path)
    }

    pub fn delete(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Delete, path)
    }

    pub fn patch(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Patch, path)
    }

    /// Append the metadata for the next argument position.
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

/// Immutable registry of a service's operations, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Contract {
    operations: HashMap<String, OperationDescriptor>,
}

impl Contract {
    pub fn builder() -> ContractBuilder {
        ContractBuilder::default()
    }

    pub fn operation(&self, name: &str) -> Result<&OperationDescriptor, ClientError> {
        self.operations
            .get(name)
            .ok_or_else(|| ClientError::UnknownOperation(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ContractBuilder {
    operations: Vec<OperationDescriptor>,
}

impl ContractBuilder {
    pub fn operation(mut self, descriptor: OperationDescriptor) -> Self {
        self.operations.push(descriptor);
        self
    }

    /// Fails when two descriptors share a name.
    pub fn build(self) -> Result<Contract, ClientError> {
        let mut operations = HashMap::with_capacity(self.operations.len());
        for descriptor in self.operations {
            let name = descriptor.name.clone();
            if operations.insert(name.clone(), descriptor).is_some() {
                return Err(ClientError::DuplicateOperation(name));
            }
        }
        Ok(Contract { operations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn body_type_projects_onto_the_declared_type() {
        let arg = json!({"name": "widget", "secret": "hidden"});
        let encoded = BodyType::of::<Named>().encode(&arg).unwrap();
        assert_eq!(encoded, r#"{"name":"widget"}"#);
    }

    #[test]
    fn body_type_rejects_incompatible_arguments() {
        let arg = json!({"title": "no name"});
        assert!(BodyType::of::<Named>().encode(&arg).is_err());
    }

    #[test]
    fn string_body_is_encoded_as_a_json_string() {
        let encoded = BodyType::of::<String>().encode(&json!("post")).unwrap();
        assert_eq!(encoded, r#""post""#);
    }

    #[test]
    fn json_body_type_passes_the_value_through() {
        let arg = json!({"b": [1, 2], "a": null});
        let encoded = BodyType::json().encode(&arg).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&encoded).unwrap(), arg);
    }

    #[test]
    fn effective_role_follows_body_header_query_precedence() {
        let param = Parameter::query("q")
            .and(ParameterRole::Header("h".to_string()))
            .and(ParameterRole::Body(BodyType::json()));
        assert_eq!(param.effective_role().map(ParameterRole::kind), Some(RoleKind::Body));

        let param = Parameter::query("q").and(ParameterRole::Header("h".to_string()));
        assert_eq!(param.effective_role().map(ParameterRole::kind), Some(RoleKind::Header));

        assert!(Parameter::ignored().effective_role().is_none());
    }

    #[test]
    fn builder_rejects_duplicate_names() {
        let err = Contract::builder()
            .operation(OperationDescriptor::get("list", "/items"))
            .operation(OperationDescriptor::post("list", "/items"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::DuplicateOperation(name) if name == "list"));
    }

    #[test]
    fn lookup_of_unknown_operation_fails() {
        let contract = Contract::builder()
            .operation(OperationDescriptor::get("list", "/items"))
            .build()
            .unwrap();
        assert_eq!(contract.len(), 1);
        assert!(contract.operation("list").is_ok());
        assert!(matches!(
            contract.operation("missing"),
            Err(ClientError::UnknownOperation(name)) if name == "missing"
        ));
    }
}
