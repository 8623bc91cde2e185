use std::fmt;

use serde_json::Value;

/// Category of API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Backend answered with a non-success status.
    HttpStatus,
    /// Connection or transport failure.
    Network,
    /// The configured request timeout elapsed.
    Timeout,
    /// Response body did not match the expected shape.
    Parse,
    /// The session could not be persisted locally.
    Storage,
}

/// Structured error returned by every [`super::ApiClient`] call.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, when the backend answered.
    pub status: Option<u16>,
    /// One-line summary suitable for logs and the CLI.
    pub message: String,
    /// The backend's own `error` / `errors` text, if present.
    pub server_message: Option<String>,
    /// Raw response body or underlying error.
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            server_message: None,
            details: None,
        }
    }

    /// Builds an error from a non-success response body.
    pub fn http_status(status: u16, body: &str) -> Self {
        let server_message = extract_server_message(body);
        let message = match &server_message {
            Some(msg) => format!("HTTP {status}: {msg}"),
            None => format!("HTTP {status}"),
        };
        Self {
            kind: ApiErrorKind::HttpStatus,
            status: Some(status),
            message,
            server_message,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn network(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::new(ApiErrorKind::Timeout, "Request timed out");
        }
        let mut error = Self::new(ApiErrorKind::Network, format!("Request failed: {err}"));
        error.details = std::error::Error::source(err).map(ToString::to_string);
        error
    }

    pub fn parse(context: &str, err: &serde_json::Error, body: &str) -> Self {
        let mut error = Self::new(
            ApiErrorKind::Parse,
            format!("Unexpected response from {context}: {err}"),
        );
        error.details = (!body.is_empty()).then(|| body.to_string());
        error
    }

    pub fn storage(err: &anyhow::Error) -> Self {
        Self::new(ApiErrorKind::Storage, format!("{err:#}"))
    }

    /// The backend's message when it sent one, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match (&self.server_message, self.kind) {
            (Some(msg), _) => msg.clone(),
            (None, ApiErrorKind::Storage) => self.message.clone(),
            (None, _) => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Pulls `error` (string) or `errors` (string, strings, or `{msg}` objects)
/// out of a JSON error body.
pub fn extract_server_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;

    if let Some(msg) = json.get("error").and_then(Value::as_str)
        && !msg.trim().is_empty()
    {
        return Some(msg.to_string());
    }

    match json.get("errors")? {
        Value::String(msg) if !msg.trim().is_empty() => Some(msg.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(obj) => obj.get("msg").and_then(Value::as_str),
                    _ => None,
                })
                .filter(|s| !s.trim().is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}
