//! Error taxonomy for every call made through the client.

use civic_core::error::CoreError;
use reqwest::StatusCode;

/// Failure reading or writing persisted tokens.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors surfaced by the HTTP client core and the resource clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    ///
    /// `body` is the decoded JSON error payload when there was one, or the
    /// raw text wrapped in a JSON string otherwise.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error payload as returned by the backend.
        body: serde_json::Value,
    },

    /// A request body could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A 2xx response whose body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Local validation rejected the input before it was sent.
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// HTTP status of an [`ClientError::Api`] error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => StatusCode::from_u16(*status).ok(),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Best human-readable message for display.
    ///
    /// For API errors the body is searched in the order the backend tends
    /// to populate it: `non_field_errors[0]`, `detail`, `error`, then the
    /// first message of the first field. Other variants use their
    /// `Display` text.
    pub fn message(&self) -> String {
        match self {
            Self::Api { status, body } => {
                extract_message(body)
                    .unwrap_or_else(|| format!("Request failed with status {status}"))
            }
            other => other.to_string(),
        }
    }
}

fn extract_message(body: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match body {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(map) => {
            for key in ["non_field_errors", "detail", "error"] {
                if let Some(msg) = map.get(key).and_then(first_text) {
                    return Some(msg);
                }
            }
            map.iter().find_map(|(field, value)| {
                first_text(value).map(|msg| {
                    if msg.to_lowercase().contains(&field.replace('_', " ")) {
                        msg
                    } else {
                        format!("{field}: {msg}")
                    }
                })
            })
        }
        Value::Array(_) => first_text(body),
        _ => None,
    }
}

/// First non-empty string in a value, looking one array level deep.
fn first_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}
