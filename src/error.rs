//! Error types for the colorsweep library

use thiserror::Error;

/// Result type alias for colorsweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Error types for palette matching, extraction and report generation
#[derive(Error, Debug)]
pub enum SweepError {
    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Color could not be converted to its perceptual representation
    #[error("Color conversion error: {message}")]
    ColorConversionError { message: String },

    /// Dominant color extraction failed for one configuration
    #[error("Extraction failed: {reason}")]
    ExtractionError { reason: String },

    /// Not enough usable pixels left to form the requested clusters
    #[error("Insufficient pixels: {available} usable, {requested} clusters requested")]
    InsufficientPixels { available: usize, requested: usize },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Run configuration could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Filesystem operation failed
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl SweepError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error only affects a single configuration or image
    ///
    /// The batch driver skips images whose loading fails with a recoverable
    /// error and aborts on any other. The sweep driver skips every failed
    /// configuration regardless.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SweepError::ExtractionError { .. }
                | SweepError::InsufficientPixels { .. }
                | SweepError::ColorConversionError { .. }
                | SweepError::ImageLoadError { .. }
        )
    }

    /// Get user-friendly error description for CLI display
    pub fn user_message(&self) -> String {
        match self {
            SweepError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            SweepError::InsufficientPixels { available, requested } => {
                format!(
                    "Only {} usable pixels remain after masking, fewer than the {} clusters requested.",
                    available, requested
                )
            }
            SweepError::ConfigError { .. } => {
                "Could not read the run configuration. Please check the JSON file.".to_string()
            }
            SweepError::IoError { message, .. } => format!("File operation failed: {}", message),
            SweepError::ColorConversionError { .. } => {
                "Colors must be opaque and written as hex, e.g. #3A7BD5.".to_string()
            }
            SweepError::InvalidParameter { parameter, .. } => {
                format!("Check the value given for `{}`.", parameter)
            }
            _ => "Color extraction failed. Please try with a different configuration.".to_string(),
        }
    }
}
