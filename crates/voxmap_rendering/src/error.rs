//! # Minimap Error Types
//!
//! Errors only exist at the edges: configuration and texture loading.
//! Nothing in the frame path returns one of these.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring the minimap or loading textures.
#[derive(Error, Debug)]
pub enum MinimapError {
    /// Configuration values are out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for `MinimapConfig`.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Texture bytes could not be fetched.
    #[error("failed to read asset {location}: {source}")]
    AssetIo {
        /// Asset location.
        location: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Texture bytes are not a decodable image.
    #[error("failed to decode asset {location}: {source}")]
    ImageDecode {
        /// Asset location.
        location: String,
        /// Underlying decoder error.
        source: image::ImageError,
    },

    /// No asset exists at the location.
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// The host world never produced a block registry.
    #[error("world not ready: block registry unavailable")]
    WorldNotReady,
}

/// Result type for minimap setup operations.
pub type MinimapResult<T> = Result<T, MinimapError>;
