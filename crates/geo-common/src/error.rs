//! Error types shared by every stage of the decode/reproject pipeline.

use thiserror::Error;

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;

/// Primary error type for grid decoding, projection and resampling.
///
/// Every variant is fatal for the file (or call) that produced it. A wrong
/// silent fallback yields a plausible but wrong map, so nothing here is ever
/// downgraded to a warning by library code.
#[derive(Debug, Error)]
pub enum GeoError {
    // === Metadata ===
    #[error("Grid metadata parse error: {0}")]
    MetadataParse(String),

    // === Grid geometry ===
    #[error("Invalid grid shape: {0}")]
    InvalidGridShape(String),

    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),

    // === Decoding ===
    #[error("Scale/offset composition order must be given explicitly: {0}")]
    DecodeAmbiguity(String),

    // === Resampling ===
    #[error("No valid input points: {0}")]
    EmptyInput(String),

    // === Caller input ===
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GeoError {
    /// Create a MetadataParse error.
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::MetadataParse(msg.into())
    }

    /// Create a ShapeMismatch error from two displayable shapes.
    pub fn shape_mismatch(expected: impl std::fmt::Debug, actual: impl std::fmt::Debug) -> Self {
        Self::ShapeMismatch {
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for reporting by the surrounding layer.
    pub fn kind(&self) -> &'static str {
        match self {
            GeoError::MetadataParse(_) => "metadata_parse",
            GeoError::InvalidGridShape(_) => "invalid_grid_shape",
            GeoError::UnsupportedProjection(_) => "unsupported_projection",
            GeoError::DecodeAmbiguity(_) => "decode_ambiguity",
            GeoError::EmptyInput(_) => "empty_input",
            GeoError::ShapeMismatch { .. } => "shape_mismatch",
            GeoError::InvalidParameter { .. } => "invalid_parameter",
            GeoError::Config(_) => "config",
        }
    }

    /// Whether processing of the current file must stop.
    ///
    /// Always true: the pipeline has no degraded mode.
    pub fn is_fatal(&self) -> bool {
        true
    }
}

impl From<serde_yaml::Error> for GeoError {
    fn from(err: serde_yaml::Error) -> Self {
        GeoError::Config(format!("YAML error: {}", err))
    }
}

impl From<std::io::Error> for GeoError {
    fn from(err: std::io::Error) -> Self {
        GeoError::Config(err.to_string())
    }
}
