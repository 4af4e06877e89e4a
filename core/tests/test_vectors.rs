//! Verify request assembly against the JSON vectors in `test-vectors/`.
//!
//! Each case declares one operation (verb, path, roles per parameter), the
//! call arguments and the request the client must assemble from them.
//! Requests are built with `Client::prepare`, so no network is involved.

use contract_client::{
    BodyType, Client, Contract, HttpMethod, HttpRequest, HttpResponse, OperationDescriptor, Parameter, ParameterRole,
    Transport, TransportError,
};
use serde_json::Value;

/// Transport for clients that only ever prepare requests.
struct Unreachable;

impl Transport for Unreachable {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::new(request.method(), request.uri(), "vectors never execute"))
    }
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    s.parse().unwrap_or_else(|_| panic!("unknown method: {s}"))
}

/// Parse one role object, e.g. `{"query": "page"}` or `{"body": "string"}`.
fn parse_role(role: &Value) -> ParameterRole {
    let (kind, value) = role.as_object().unwrap().iter().next().unwrap();
    let value = value.as_str().unwrap();
    match kind.as_str() {
        "body" => ParameterRole::Body(match value {
            "string" => BodyType::of::<String>(),
            "json" => BodyType::json(),
            other => panic!("unknown body type: {other}"),
        }),
        "header" => ParameterRole::Header(value.to_string()),
        "query" => ParameterRole::Query(value.to_string()),
        other => panic!("unknown role: {other}"),
    }
}

fn parse_descriptor(name: &str, operation: &Value) -> OperationDescriptor {
    let descriptor = match operation["method"].as_str() {
        Some(method) => OperationDescriptor::new(name, parse_method(method), operation["path"].as_str().unwrap()),
        None => OperationDescriptor::unrouted(name),
    };
    operation["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|roles| {
            roles
                .as_array()
                .unwrap()
                .iter()
                .map(parse_role)
                .fold(Parameter::ignored(), Parameter::and)
        })
        .fold(descriptor, OperationDescriptor::param)
}

#[test]
fn request_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let contract = Contract::builder()
            .operation(parse_descriptor(name, &case["operation"]))
            .build()
            .unwrap();
        let client = Client::with_transport(base_url, contract, Unreachable);
        let args = case["args"].as_array().unwrap();
        let expected = &case["expected_request"];

        let req = client.prepare(name, args).unwrap();
        assert_eq!(req.method(), parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.uri(), expected["uri"].as_str().unwrap(), "{name}: uri");

        let expected_headers: Vec<(String, String)> = expected["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        let headers: Vec<(String, String)> = req
            .headers()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        assert_eq!(headers, expected_headers, "{name}: headers");

        assert_eq!(req.body(), expected["body"].as_str().unwrap(), "{name}: body");
        assert_eq!(
            req.transmits_body(),
            expected["transmits_body"].as_bool().unwrap(),
            "{name}: transmits_body"
        );
    }
}

#[test]
fn vectors_never_touch_the_network() {
    let contract = Contract::builder()
        .operation(OperationDescriptor::get("get", "/get"))
        .build()
        .unwrap();
    let client = Client::with_transport("http://localhost:8080", contract, Unreachable);

    assert!(client.prepare("get", &[]).is_ok());
    assert!(client.call("get", &[]).is_err());
}
