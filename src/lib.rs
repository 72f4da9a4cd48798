//! chroma-demo Library
//!
//! Widget configuration store and timer-driven demo sequencer behind the
//! chroma-key widget showcase: persisted per-widget configuration, the
//! category/item demo state machine, typewriters, and a tokio player that
//! drives them.

pub mod constants;
pub mod domain;
pub mod error;
pub mod eventing;
pub mod helpers;
pub mod sequencer;
pub mod services;
pub mod state;
pub mod states;
pub mod utils;
