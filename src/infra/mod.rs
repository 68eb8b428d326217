//! Infrastructure adapters: backend HTTP client, session persistence, telemetry.

pub mod error;
pub mod http;
pub mod session_store;
pub mod telemetry;
