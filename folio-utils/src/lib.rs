//! folio utilities
//!
//! Ambient helpers shared by the folio crates: logging initialisation,
//! configuration loading and merging, and width-aware text handling for
//! terminal rendering.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod logging;
pub mod text;

/// Re-export commonly used utilities
pub use config::{load_config, merge_configs, validate_config, ConfigBuilder};
pub use logging::{basic_config, init_logging, LogLevel, LogOutput, LoggerConfig};
pub use text::{display_width, normalize_whitespace, safe_truncate, wrap_to_width};

/// Result type used throughout folio utilities
pub type Result<T> = std::result::Result<T, UtilError>;

/// Error types for utility operations
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Document formats understood by the configuration loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yml" | "yaml" => Ok(Self::Yaml),
            other => Err(UtilError::Config(format!(
                "Unsupported config format: '{}' ({})",
                other,
                path.display()
            ))),
        }
    }
}
