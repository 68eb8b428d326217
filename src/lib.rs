//! Reybex terminal client.
//!
//! The crate is layered the usual way: `domain` holds backend-independent
//! types and rules, `application` the renderer, tracker and use cases,
//! `infra` the HTTP client, session file and telemetry, and `config` the
//! layered settings and command line.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
