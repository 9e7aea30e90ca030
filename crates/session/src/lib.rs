//! Session context for the civic complaints client.
//!
//! A [`Session`] owns the identity lifecycle on top of a
//! [`CivicClient`](civic_client::CivicClient): hydrating from stored
//! tokens, login, registration, logout, and demotion when the client
//! reports that the session expired. Consumers observe [`SessionState`]
//! through a `watch` channel instead of global state.

pub mod session;
pub mod state;

pub use session::Session;
pub use state::{SessionPhase, SessionState};
