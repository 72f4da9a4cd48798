//! Utilities

pub mod format;
pub mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage};
