//! Resource clients: one method per backend endpoint, all routed through
//! the shared [`ApiClient`](crate::http::ApiClient).
//!
//! Resource clients only shape parameters. Errors propagate unchanged,
//! except for public tracking where a `404` is an expected answer.

pub mod auth;
pub mod complaints;
pub mod departments;

pub use auth::AuthApi;
pub use complaints::{ComplaintsApi, TrackOutcome};
pub use departments::DepartmentsApi;
