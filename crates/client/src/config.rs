use std::time::Duration;

use crate::error::ClientError;

/// Default backend origin, matching the development server.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash, e.g. `http://host/api`.
    pub base_url: String,
    /// Per-request timeout. `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for `base_url` with no request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: normalise_base_url(&base_url.into())?,
            request_timeout: None,
        })
    }

    /// Apply a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                     |
    /// |------------------------------|-----------------------------|
    /// | `CIVIC_API_URL`              | `http://localhost:8000/api` |
    /// | `CIVIC_REQUEST_TIMEOUT_SECS` | unset                       |
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var("CIVIC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let request_timeout = match std::env::var("CIVIC_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ClientError::Config(format!(
                        "CIVIC_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                    ))
                })?;
                if secs == 0 {
                    return Err(ClientError::Config(
                        "CIVIC_REQUEST_TIMEOUT_SECS must be greater than zero".into(),
                    ));
                }
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self {
            base_url: normalise_base_url(&base_url)?,
            request_timeout,
        })
    }

    /// Absolute URL for an API path such as `/auth/me/`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn normalise_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| ClientError::Config(format!("Invalid API URL '{raw}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "API URL '{raw}' must use http or https"
        )));
    }
    Ok(trimmed.to_string())
}
