//! Domain types for the civic-complaint platform client.
//!
//! Everything here is plain data plus local validation: bearer token
//! pairs, the signed-in user's profile, complaints, departments, and the
//! request payloads the resource clients send. No I/O happens in this
//! crate.

pub mod complaint;
pub mod department;
pub mod error;
pub mod tokens;
pub mod types;
pub mod user;
