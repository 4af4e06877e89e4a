//! HTTP request and response models.
//!
//! # Design
//! Both types are immutable once constructed. `HttpRequest::new` enforces the
//! mandatory fields (a non-empty URL and a verb); the optional parts default
//! to empty and are attached with consuming `with_*` methods before the value
//! is handed to a [`Transport`]. Nothing here touches the network: execution
//! is delegated to the transport so the models stay plain data.
//!
//! Headers and query parameters are kept in an `IndexMap`, so the query
//! string is assembled in the order the parameters were bound.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::ClientError;
use crate::transport::{Transport, TransportError};

/// HTTP verb of a declared operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Only POST and PUT ever put a body on the wire.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            other => Err(ClientError::InvalidRequest(format!(
                "unsupported HTTP method '{other}'"
            ))),
        }
    }
}

/// Status codes whose body is read from the success stream.
pub fn is_ok_status(status: u16) -> bool {
    (200..=206).contains(&status)
}

/// A fully assembled request for one operation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    url: String,
    method: HttpMethod,
    headers: IndexMap<String, String>,
    query: IndexMap<String, String>,
    body: String,
}

impl HttpRequest {
    /// Fails fast when `url` is empty.
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Result<Self, ClientError> {
        let url = url.into();
        if url.is_empty() {
            return Err(ClientError::InvalidRequest("request url must not be empty".to_string()));
        }
        Ok(Self {
            url,
            method,
            headers: IndexMap::new(),
            query: IndexMap::new(),
            body: String::new(),
        })
    }

    pub fn with_headers(mut self, headers: IndexMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_query(mut self, query: IndexMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    pub fn query(&self) -> &IndexMap<String, String> {
        &self.query
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// The URL with the query string appended.
    ///
    /// Keys and values are written as they are; no percent-encoding happens
    /// here.
    pub fn uri(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.url)
    }

    /// Whether the body is written to the wire for this request.
    pub fn transmits_body(&self) -> bool {
        self.method.carries_body() && !self.body.is_empty()
    }

    /// Perform the round trip through `transport`.
    pub fn execute<T: Transport + ?Sized>(&self, transport: &T) -> Result<HttpResponse, TransportError> {
        transport.execute(self)
    }
}

/// The raw outcome of one round trip, before the body is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    message: String,
    content_type: String,
    data: String,
}

impl HttpResponse {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            content_type: String::new(),
            data: String::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Raw body text.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// True when the body came from the success stream.
    pub fn is_ok(&self) -> bool {
        is_ok_status(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = HttpRequest::new("", HttpMethod::Get).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn uri_without_query_has_no_question_mark() {
        let req = HttpRequest::new("http://localhost:8080/get", HttpMethod::Get).unwrap();
        assert_eq!(req.uri(), "http://localhost:8080/get");
    }

    #[test]
    fn uri_joins_query_pairs_in_insertion_order() {
        let req = HttpRequest::new("http://localhost:8080/search", HttpMethod::Get)
            .unwrap()
            .with_query(pairs(&[("q", "rust"), ("page", "2"), ("sort", "asc")]));
        assert_eq!(req.uri(), "http://localhost:8080/search?q=rust&page=2&sort=asc");
    }

    #[test]
    fn query_values_are_not_encoded() {
        let req = HttpRequest::new("http://h/p", HttpMethod::Get)
            .unwrap()
            .with_query(pairs(&[("name", "a b&c")]));
        assert_eq!(req.uri(), "http://h/p?name=a b&c");
    }

    #[test]
    fn only_post_and_put_transmit_a_body() {
        for method in [HttpMethod::Post, HttpMethod::Put] {
            let req = HttpRequest::new("http://h", method).unwrap().with_body("{}");
            assert!(req.transmits_body(), "{method}");
        }
        for method in [HttpMethod::Get, HttpMethod::Delete, HttpMethod::Patch] {
            let req = HttpRequest::new("http://h", method).unwrap().with_body("{}");
            assert!(!req.transmits_body(), "{method}");
        }
    }

    #[test]
    fn empty_body_is_never_transmitted() {
        let req = HttpRequest::new("http://h", HttpMethod::Post).unwrap();
        assert!(!req.transmits_body());
    }

    #[test]
    fn ok_status_set_is_200_through_206() {
        for status in 200..=206 {
            assert!(is_ok_status(status), "{status}");
        }
        for status in [100, 199, 207, 226, 301, 404, 500] {
            assert!(!is_ok_status(status), "{status}");
        }
    }

    #[test]
    fn response_defaults_to_empty_content_type_and_data() {
        let resp = HttpResponse::new(204, "No Content");
        assert_eq!(resp.content_type(), "");
        assert_eq!(resp.data(), "");
        assert!(resp.is_ok());
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }
}
