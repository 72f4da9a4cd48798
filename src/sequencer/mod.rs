//! Sequencer - Timer-Driven Demo State Machines
//!
//! Pure state machines: they never sleep, they return [`TimerRequest`]s and
//! react to the matching ticket. The async player in `services` owns the
//! actual clock.

mod machine;
mod timer;
mod timing;
mod typewriter;
mod view;

pub use machine::*;
pub use timer::{Timeline, TimerRequest, TimerTicket};
pub use timing::*;
pub use typewriter::*;
pub use view::*;
