//! HTTP client core.
//!
//! Every backend call goes through [`ApiClient::execute`], which applies
//! two interceptors around the transport:
//!
//! - **outbound**: attach `Authorization: Bearer <access>` when an access
//!   token is stored;
//! - **inbound**: on a `401` for a request that has not been replayed yet,
//!   exchange the refresh token for a new access token once and replay the
//!   request with it.
//!
//! A request is replayed at most once. When the refresh call itself fails,
//! or the replay is rejected again, both tokens are cleared and
//! [`AuthEvent::SessionExpired`] is broadcast so the session can demote
//! itself. The caller always receives the original `401`.

use std::sync::Arc;

use civic_core::complaint::ImageAttachment;
use civic_core::tokens::{RefreshResponse, TokenKind, TokenPair};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token_store::TokenStore;

/// Path of the token refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/auth/token/refresh/";

/// Capacity of the auth event broadcast channel.
const EVENT_CAPACITY: usize = 16;

// ---------------------------------------------------------------------------
// Request description
// ---------------------------------------------------------------------------

/// One file part of a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name, `image` or `images`.
    pub field: String,
    /// File name, content type, and bytes of the upload.
    pub attachment: ImageAttachment,
}

/// Multipart form kept as plain data so it can be rebuilt for a replay.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    /// Text fields in insertion order.
    pub fields: Vec<(String, String)>,
    /// File parts in insertion order.
    pub files: Vec<FilePart>,
}

impl MultipartBody {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Append a file part under `field`. Repeating a field name sends
    /// several parts with that name.
    pub fn file(mut self, field: impl Into<String>, attachment: ImageAttachment) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            attachment,
        });
        self
    }

    /// Build a fresh `reqwest` form. Called once per attempt.
    fn to_form(&self) -> ClientResult<Form> {
        let mut form = Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for part in &self.files {
            let file = Part::bytes(part.attachment.bytes.clone())
                .file_name(part.attachment.file_name.clone())
                .mime_str(part.attachment.mime_type())?;
            form = form.part(part.field.clone(), file);
        }
        Ok(form)
    }
}

/// Body of an [`ApiRequest`].
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Serialized JSON, sent with the default `application/json` type.
    Json(serde_json::Value),
    /// `multipart/form-data`, rebuilt on every attempt.
    Multipart(MultipartBody),
}

/// A replayable description of one backend call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, e.g. `/complaints/12/`.
    pub path: String,
    /// Query-string pairs, appended in order.
    pub query: Vec<(String, String)>,
    /// Request payload.
    pub body: RequestBody,
}

impl ApiRequest {
    /// Bodiless request with no query.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ClientResult<Self> {
        let value = serde_json::to_value(body).map_err(ClientError::Encode)?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Append query-string pairs.
    pub fn with_query<K, V, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_multipart(mut self, body: MultipartBody) -> Self {
        self.body = RequestBody::Multipart(body);
        self
    }
}

/// A request in flight, carrying the at-most-once replay mark.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// What to send on each attempt.
    pub request: ApiRequest,
    /// Set once the request has been replayed after a refresh; a second
    /// `401` is then final.
    pub retried: bool,
}

impl PendingRequest {
    pub fn new(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }
}

/// Authentication lifecycle notifications emitted by [`ApiClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// A refresh succeeded and the new access token was stored.
    TokenRefreshed,
    /// Refresh failed or was rejected; stored tokens have been cleared.
    SessionExpired,
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Configured request pipeline shared by all resource clients.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
    events: broadcast::Sender<AuthEvent>,
}

impl ApiClient {
    /// Build the pipeline with JSON default headers and the configured
    /// timeout.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http,
            config,
            tokens,
            events,
        })
    }

    /// Base URL and timeout this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Token store read by the bearer interceptor and written on refresh.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Receive [`AuthEvent`]s emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Send `request` through both interceptors and return the successful
    /// response. Non-2xx responses become [`ClientError::Api`].
    pub async fn execute(&self, request: ApiRequest) -> ClientResult<reqwest::Response> {
        let mut pending = PendingRequest::new(request);
        let mut bearer: Option<String> = None;

        loop {
            let response = self.dispatch(&pending, bearer.as_deref()).await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let error = Self::api_error(response).await;
            if status != StatusCode::UNAUTHORIZED {
                return Err(error);
            }

            if pending.retried {
                tracing::warn!(
                    method = %pending.request.method,
                    path = %pending.request.path,
                    "Replayed request rejected after refresh",
                );
                self.expire_session();
                return Err(error);
            }
            pending.retried = true;

            let Some(refresh) = self.tokens.get(TokenKind::Refresh) else {
                tracing::debug!(
                    path = %pending.request.path,
                    "Unauthorized with no refresh token stored",
                );
                return Err(error);
            };

            match self.refresh_access(&refresh).await {
                Ok(access) => bearer = Some(access),
                Err(e) => {
                    tracing::warn!(
                        path = %pending.request.path,
                        error = %e,
                        "Token refresh failed",
                    );
                    self.expire_session();
                    return Err(error);
                }
            }
        }
    }

    /// Execute `request` and decode the JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    /// Execute `request`, discarding the response body.
    pub async fn send_unit(&self, request: ApiRequest) -> ClientResult<()> {
        self.execute(request).await?;
        Ok(())
    }

    /// Exchange `refresh_token` for a new access token.
    ///
    /// Bypasses both interceptors and leaves the token store untouched.
    pub async fn request_refresh(&self, refresh_token: &str) -> ClientResult<RefreshResponse> {
        let response = self
            .http
            .post(self.config.url(REFRESH_PATH))
            .json(&serde_json::json!({ "refresh": refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Self::decode(response).await
    }

    // ---- private helpers ----

    async fn dispatch(
        &self,
        pending: &PendingRequest,
        bearer: Option<&str>,
    ) -> ClientResult<reqwest::Response> {
        let request = &pending.request;
        let mut builder = self
            .http
            .request(request.method.clone(), self.config.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let token = match bearer {
            Some(token) => Some(token.to_string()),
            None => self.tokens.get(TokenKind::Access),
        };
        if let Some(token) = &token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(body) => builder.multipart(body.to_form()?),
        };

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            authenticated = token.is_some(),
            retried = pending.retried,
            "Dispatching request",
        );

        Ok(builder.send().await?)
    }

    /// Refresh and store the new access token (and the rotated refresh
    /// token, when the backend returns one).
    async fn refresh_access(&self, refresh_token: &str) -> ClientResult<String> {
        let refreshed = self.request_refresh(refresh_token).await?;
        match &refreshed.refresh {
            Some(rotated) => self
                .tokens
                .set(&TokenPair::new(refreshed.access.clone(), rotated.clone()))?,
            None => self.tokens.set_access(&refreshed.access)?,
        }

        tracing::info!(rotated = refreshed.refresh.is_some(), "Access token refreshed");
        let _ = self.events.send(AuthEvent::TokenRefreshed);
        Ok(refreshed.access)
    }

    fn expire_session(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "Failed to clear stored tokens");
        } else {
            tracing::warn!("Session expired, stored tokens cleared");
        }
        let _ = self.events.send(AuthEvent::SessionExpired);
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }

    /// Turn a non-2xx response into [`ClientError::Api`], keeping the body
    /// as JSON when it parses and as a string otherwise.
    async fn api_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(bytes) if bytes.is_empty() => serde_json::Value::Null,
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
            }),
            Err(_) => serde_json::Value::String("<unreadable body>".to_string()),
        };
        ClientError::Api { status, body }
    }
}
