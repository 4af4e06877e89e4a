use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    extract::Path,
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

/// Body returned by `/status/{code}`.
pub const ERROR_BODY: &str = r#"{"error":"x"}"#;

/// Body returned by `/multiline`.
pub const MULTILINE_BODY: &str = "[\n  \"a\",\n  \"b\"\n]";

/// Length of the JSON string served by `/big`, quotes included. Larger than
/// ureq's default body limit.
pub const BIG_BODY_LEN: usize = 11 * 1024 * 1024;

/// How long `/slow` waits before answering.
pub const SLOW_DELAY: Duration = Duration::from_secs(2);

/// What `/inspect` saw of the incoming request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/get", get(|| async { "get" }))
        .route("/post", post(|| async { r#"["post"]"# }))
        .route("/put", put(|| async { r#"{"put":0}"# }))
        .route("/echo", any(echo))
        .route("/inspect", any(inspect))
        .route("/status/{code}", any(status))
        .route("/multiline", get(|| async { MULTILINE_BODY }))
        .route("/big", get(big))
        .route("/slow", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(body: String) -> String {
    body
}

async fn inspect(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Inspection> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();
    let inspection = Inspection {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    };
    debug!(method = %inspection.method, path = %inspection.path, "inspected request");
    Json(inspection)
}

async fn big() -> String {
    format!("\"{}\"", "a".repeat(BIG_BODY_LEN - 2))
}

async fn slow() -> &'static str {
    tokio::time::sleep(SLOW_DELAY).await;
    r#""slow""#
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, &'static str), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, ERROR_BODY))
}
