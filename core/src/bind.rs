//! Argument binding: turns call arguments into body, headers and query.
//!
//! # Design
//! Each argument position is matched with its [`Parameter`] metadata and
//! bound by the parameter's effective role only (Body, then Header, then
//! Query). Later bindings overwrite earlier ones, whether that is a second
//! body parameter or a repeated header/query key. Arguments without a role
//! do not touch the request.

use indexmap::IndexMap;
use serde_json::Value;

use crate::contract::{OperationDescriptor, ParameterRole};
use crate::error::ClientError;

/// The request parts produced from one call's arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundParameters {
    pub body: String,
    pub headers: IndexMap<String, String>,
    pub query: IndexMap<String, String>,
}

/// Bind `args` positionally against the parameters of `descriptor`.
pub fn bind(descriptor: &OperationDescriptor, args: &[Value]) -> Result<BoundParameters, ClientError> {
    let parameters = descriptor.parameters();
    if parameters.len() != args.len() {
        return Err(ClientError::ArgumentCount {
            operation: descriptor.name().to_string(),
            expected: parameters.len(),
            actual: args.len(),
        });
    }

    let mut bound = BoundParameters::default();
    for (position, (parameter, arg)) in parameters.iter().zip(args).enumerate() {
        match parameter.effective_role() {
            Some(ParameterRole::Body(target)) => {
                bound.body = target.encode(arg).map_err(|source| ClientError::Serialization {
                    operation: descriptor.name().to_string(),
                    position,
                    target: target.name(),
                    source,
                })?;
            }
            Some(ParameterRole::Header(key)) => {
                bound.headers.insert(key.clone(), natural_text(arg));
            }
            Some(ParameterRole::Query(key)) => {
                bound.query.insert(key.clone(), natural_text(arg));
            }
            None => {}
        }
    }
    Ok(bound)
}

/// Textual form of an argument: strings as they are, anything else as
/// compact JSON (`null`, `42`, `true`, `[1,2]`).
pub fn natural_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
