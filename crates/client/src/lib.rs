//! Authenticated REST client for the civic complaints backend.
//!
//! [`CivicClient`] bundles the shared [`http::ApiClient`] (bearer
//! attachment plus refresh-once-and-replay on `401`) with the `auth`,
//! `complaints`, and `departments` resource clients. Tokens live behind
//! the injectable [`TokenStore`] capability.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod token_store;

pub use client::CivicClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, StoreError};
pub use http::{ApiClient, ApiRequest, AuthEvent};
pub use resources::{AuthApi, ComplaintsApi, DepartmentsApi, TrackOutcome};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
