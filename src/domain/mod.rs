//! Domain - Pure Data Structures
//!
//! Widget configuration, demo catalogs and media references. Nothing here
//! performs I/O or owns timers.

pub mod catalog;
pub mod config;
pub mod media;
pub mod window;
