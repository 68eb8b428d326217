//! Terminal output for command results.

pub mod console;
