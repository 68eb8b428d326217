//! Application services: the document renderer, the live duration tracker,
//! and the use cases that drive the backend on behalf of a signed-in user.

pub mod board;
pub mod error;
pub mod inbox;
pub mod render;
pub mod session;
pub mod tasks;
pub mod tracker;
pub mod tracking;
