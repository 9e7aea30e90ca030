//! Facade tying the HTTP core and the resource clients together.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::{ApiClient, AuthEvent};
use crate::resources::{AuthApi, ComplaintsApi, DepartmentsApi};
use crate::token_store::TokenStore;

/// Entry point for talking to the complaints backend.
///
/// Cloning is cheap; every clone shares one [`ApiClient`] and therefore
/// one connection pool, token store, and event channel.
#[derive(Clone)]
pub struct CivicClient {
    api: Arc<ApiClient>,
    auth: AuthApi,
    complaints: ComplaintsApi,
    departments: DepartmentsApi,
}

impl CivicClient {
    /// Build the HTTP pipeline for `config` over `tokens`.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        Ok(Self::from_api(Arc::new(ApiClient::new(config, tokens)?)))
    }

    /// Wrap an existing pipeline.
    pub fn from_api(api: Arc<ApiClient>) -> Self {
        Self {
            auth: AuthApi::new(Arc::clone(&api)),
            complaints: ComplaintsApi::new(Arc::clone(&api)),
            departments: DepartmentsApi::new(Arc::clone(&api)),
            api,
        }
    }

    /// Account and token endpoints.
    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    /// Complaint submission, tracking, feed, and triage endpoints.
    pub fn complaints(&self) -> &ComplaintsApi {
        &self.complaints
    }

    /// Department directory endpoints.
    pub fn departments(&self) -> &DepartmentsApi {
        &self.departments
    }

    /// The shared pipeline, for requests the resource clients do not cover.
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Token store used by every request.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        self.api.tokens()
    }

    /// Receive refresh and expiry notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.api.subscribe()
    }
}
