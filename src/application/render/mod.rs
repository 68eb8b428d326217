//! Rich-document rendering.
//!
//! The pipeline is pure: it accepts a decoded block document, produces
//! deterministic markup, and never fails. Malformed input degrades to less
//! output rather than an error.

mod service;
mod types;

pub use service::{
    BlockRenderer, escape_text, escape_value, parse_inline, render, render_description,
    render_description_value, render_document, render_service,
};
pub use types::{DocumentRenderer, RenderOutput};
