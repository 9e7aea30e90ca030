//! `/auth/*` endpoints.

use std::sync::Arc;

use civic_core::tokens::{RefreshResponse, TokenKind};
use civic_core::user::{AuthResponse, Credentials, Registration, UserProfile};

use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest};

/// Account, identity, and token endpoints.
#[derive(Clone)]
pub struct AuthApi {
    api: Arc<ApiClient>,
}

impl AuthApi {
    /// Handle over the shared HTTP core.
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// `POST /auth/register/`. Does not touch the token store.
    pub async fn register(&self, input: &Registration) -> ClientResult<AuthResponse> {
        input.check()?;
        self.api
            .send_json(ApiRequest::post("/auth/register/").json(input)?)
            .await
    }

    /// `POST /auth/login/`. Does not touch the token store; backend
    /// rejections come back as [`ClientError::Api`](crate::ClientError::Api).
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse> {
        self.api
            .send_json(ApiRequest::post("/auth/login/").json(credentials)?)
            .await
    }

    /// `POST /auth/logout/` with the stored refresh token, so the backend
    /// can blacklist it.
    pub async fn logout(&self) -> ClientResult<()> {
        let refresh = self.api.tokens().get(TokenKind::Refresh);
        let request =
            ApiRequest::post("/auth/logout/").json(&serde_json::json!({ "refresh": refresh }))?;
        self.api.send_unit(request).await
    }

    /// `GET /auth/me/`.
    pub async fn me(&self) -> ClientResult<UserProfile> {
        self.api.send_json(ApiRequest::get("/auth/me/")).await
    }

    /// `POST /auth/token/refresh/` without storing the result.
    pub async fn refresh_token(&self, refresh_token: &str) -> ClientResult<RefreshResponse> {
        self.api.request_refresh(refresh_token).await
    }

    /// Browser entry point of the Google sign-in flow. The backend
    /// redirects back with `access` and `refresh` query parameters.
    pub fn google_login_url(&self) -> String {
        self.api.config().url("/auth/google/")
    }
}
