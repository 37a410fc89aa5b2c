//! Viewer error types

use thiserror::Error;

/// Errors at the viewer's boundary: selection and configuration
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Selected index is past the end of the catalog
    #[error("Badge index {index} out of range (catalog has {len} badges)")]
    SelectionOutOfRange { index: usize, len: usize },

    /// No badge with the given display name
    #[error("Unknown badge: {0}")]
    UnknownBadge(String),

    /// A catalog needs at least one badge
    #[error("Badge catalog is empty")]
    EmptyCatalog,

    /// Configuration values that cannot drive the animation
    #[error("Invalid viewer config: {0}")]
    InvalidConfig(String),

    /// Configuration text that is not valid TOML for the config schema
    #[error("Failed to parse viewer config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;
