//! Settings Layer
//!
//! Process-level settings persisted in the platform config directory.

mod app;

pub use app::*;
