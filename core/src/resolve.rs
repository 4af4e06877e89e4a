//! Verb and URL resolution for declared operations.

use crate::contract::OperationDescriptor;
use crate::http::HttpMethod;

/// Resolve the verb and full URL of `descriptor` against `base_url`.
///
/// A routed operation appends its path template to the base URL verbatim.
/// An operation without verb metadata becomes a GET on the base URL itself;
/// that fallback is deliberate and never reported as an error.
pub fn resolve(base_url: &str, descriptor: &OperationDescriptor) -> (HttpMethod, String) {
    match descriptor.route() {
        Some(route) => (route.method, format!("{base_url}{}", route.path)),
        None => (HttpMethod::Get, base_url.to_string()),
    }
}
