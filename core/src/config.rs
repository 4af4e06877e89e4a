//! Client configuration.
//!
//! A host either builds a [`ClientConfig`] in code or deserializes one from
//! its own configuration file. Timeouts are expressed in milliseconds on the
//! serialized form.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the response body text is assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyMode {
    /// Concatenate the body's lines without their separators. Safe for
    /// single-line JSON, lossy for anything relying on embedded newlines.
    #[default]
    JoinLines,
    /// Keep the body exactly as received.
    Raw,
}

impl BodyMode {
    pub fn assemble(self, text: String) -> String {
        match self {
            BodyMode::Raw => text,
            BodyMode::JoinLines => text.chars().filter(|c| !matches!(c, '\r' | '\n')).collect(),
        }
    }
}

/// Settings shared by every call made through one client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for every resolved URL. Used verbatim, without normalization.
    pub base_url: String,

    /// Upper bound for establishing the connection. `None` waits for the
    /// transport to give up on its own.
    #[serde(rename = "connect_timeout_ms", with = "millis")]
    pub connect_timeout: Option<Duration>,

    /// Upper bound for the whole round trip.
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Option<Duration>,

    pub body_mode: BodyMode,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_body_mode(mut self, body_mode: BodyMode) -> Self {
        self.body_mode = body_mode;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => {
                let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
                serializer.serialize_some(&millis)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
