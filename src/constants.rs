//! Constants
//!
//! Centralized timing, storage and naming constants.

/// Storage key of the persisted widget configuration snapshot
pub const CONFIG_STORAGE_KEY: &str = "componentConfig";

/// Message shown by the editing surface when section text is rejected
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON format";

/// Application settings file name (inside the config directory)
pub const SETTINGS_FILE_NAME: &str = "chroma-demo.toml";

/// Rolling log file prefix (inside the data directory)
pub const LOG_FILE_PREFIX: &str = "chroma-demo.log";

/// Project directory qualifiers
pub const PROJECT_QUALIFIER: &str = "com";
pub const PROJECT_ORGANIZATION: &str = "chroma-demo";
pub const PROJECT_APPLICATION: &str = "chroma-demo";

/// Sequencer timing defaults (milliseconds)
pub const LOADING_DELAY_MS: u64 = 1500;
pub const MOBILE_TYPING_SPEED_MS: u64 = 55;
pub const MOBILE_PROGRESS_DURATION_MS: u64 = 5500;
pub const DEFAULT_PROGRESS_DURATION_MS: u64 = 5500;

/// Loop typewriter pause once an item is fully typed
pub const TYPEWRITER_HOLD_MS: u64 = 1500;

/// Enter key press animation before the next item starts
pub const ENTER_PRESS_MS: u64 = 150;

/// Marker prefix of a still-image media reference
pub const IMAGE_MARKER: char = '@';

