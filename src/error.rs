//! Error types for the Lazy CSS generator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LazyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Static data error: {message}")]
    StaticData { message: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Watch error: {message}")]
    Watch { message: String },
}

pub type Result<T> = std::result::Result<T, LazyError>;

impl LazyError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn static_data(message: impl Into<String>) -> Self {
        Self::StaticData {
            message: message.into(),
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn watch(message: impl Into<String>) -> Self {
        Self::Watch {
            message: message.into(),
        }
    }

    /// Whether the error means the generator itself cannot run, as opposed
    /// to a problem with one input.
    pub fn is_initialization_failure(&self) -> bool {
        matches!(self, Self::StaticData { .. } | Self::Pattern(_))
    }
}
