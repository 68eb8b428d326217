//! Domain layer types and invariants.

pub mod board;
pub mod booking;
pub mod document;
pub mod error;
pub mod session;
