//! HTTP access to the Reybex backend.

mod client;

pub use client::{ClientError, ReybexClient};
