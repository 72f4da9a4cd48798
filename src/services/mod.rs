//! Service Layer
//!
//! Async plumbing around the pure state machines.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  subscribe   ┌──────────────────────────────┐
//! │ ConfigStore  │─────────────▶│       SequencerPlayer        │
//! └──────────────┘  SetCatalog  │  DemoSequencer + PhaseTimer  │
//!                               └──────────────────────────────┘
//!                                             │
//!                                             ▼ AppEvent
//!                                      renderer (CLI)
//! ```

mod player;
mod runtime;

pub use player::*;
pub use runtime::*;
