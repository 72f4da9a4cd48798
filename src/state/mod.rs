//! State - In-Memory Stores
//!
//! Explicitly constructed stores, injected into whatever consumes them.

pub mod config_state;

pub use config_state::{ConfigStore, SubscriptionId};
