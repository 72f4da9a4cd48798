//! Eventing - Events emitted to the rendering side

pub mod app_event;

pub use app_event::AppEvent;
