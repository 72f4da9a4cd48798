//! Error types for chroma-demo
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

use crate::constants::INVALID_JSON_MESSAGE;

/// Main error type for the library
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (file operations)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// Persisted snapshot is not readable structured data
    #[snafu(display("Stored config under '{key}' could not be decoded: {source}"))]
    Deserialization {
        key: String,
        source: serde_json::Error,
    },

    /// Persisted snapshot predates the current schema
    #[snafu(display("Stored config under '{key}' is stale: {reason}"))]
    SchemaDrift { key: String, reason: String },

    /// User-entered section text was rejected
    #[snafu(display("{}", INVALID_JSON_MESSAGE))]
    Parse {
        widget: String,
        source: serde_json::Error,
    },

    /// Unknown widget name
    #[snafu(display("Unknown widget: {name}"))]
    UnknownWidget { name: String },

    /// Catalog has no categories, or a category has no items
    #[snafu(display("Empty catalog: {detail}"))]
    EmptyCatalog { detail: String },

    /// Catalog id appears twice within the same collection
    #[snafu(display("Duplicate {scope} id: {id}"))]
    DuplicateId { scope: String, id: String },

    /// Catalog item would type nothing
    #[snafu(display("Item '{item}' in category '{category}' has empty display text"))]
    EmptyDisplayText { category: String, item: String },

    /// Category index outside the catalog
    #[snafu(display("Category index {index} out of range (catalog has {len})"))]
    InvalidCategory { index: usize, len: usize },

    /// Channel send error
    #[snafu(display("Channel closed: {message}"))]
    ChannelClosed { message: String },
}

impl Error {
    /// Whether this error came from rejected user-entered config text
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_displays_fixed_message() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let err = Error::Parse {
            widget: "terminal".to_string(),
            source,
        };
        assert!(err.is_parse_error());
        assert_eq!(err.to_string(), "Invalid JSON format");
    }

    #[test]
    fn invalid_category_names_bounds() {
        let err = Error::InvalidCategory { index: 4, len: 3 };
        assert_eq!(err.to_string(), "Category index 4 out of range (catalog has 3)");
    }
}
