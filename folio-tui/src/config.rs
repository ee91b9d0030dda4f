//! Viewer configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use folio_utils::{ConfigBuilder, LogLevel, UtilError};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] UtilError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Viewer configuration; every field has a default so files may be partial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Time between animation frames
    pub frame_interval_ms: u64,
    /// Rows below the top edge at which a section becomes active
    pub scroll_lookahead: u32,
    pub counter_duration_ms: u64,
    /// Zero jumps straight to the target
    pub smooth_scroll_ms: u64,
    /// Widest the page body is laid out, in columns
    pub max_page_width: u16,
    pub color_scheme: ColorScheme,
    /// Content file replacing the built-in portfolio
    pub content: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            scroll_lookahead: 2,
            counter_duration_ms: 2000,
            smooth_scroll_ms: 300,
            max_page_width: 100,
            color_scheme: ColorScheme::Dark,
            content: None,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Log file for the interactive viewer; logging is discarded without one
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
        }
    }
}

impl FolioConfig {
    /// Defaults overlaid with the given file, if any
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = ConfigBuilder::new().load_optional(path)?.build()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "frame_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.max_page_width < 20 {
            return Err(ConfigError::Invalid(format!(
                "max_page_width {} is below the minimum of 20 columns",
                self.max_page_width
            )));
        }
        Ok(())
    }

    pub const fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub const fn counter_duration(&self) -> Duration {
        Duration::from_millis(self.counter_duration_ms)
    }

    pub const fn smooth_scroll_duration(&self) -> Duration {
        Duration::from_millis(self.smooth_scroll_ms)
    }
}

/// Color schemes for the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    Dark,
    Light,
    HighContrast,
}

/// Colors the page is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub heading: Color,
    pub accent: Color,
    pub highlight: Color,
    pub frontend: Color,
    pub backend: Color,
    pub blockchain: Color,
    pub tools: Color,
}

impl ColorScheme {
    pub const fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette {
                text: Color::Gray,
                muted: Color::DarkGray,
                heading: Color::White,
                accent: Color::LightBlue,
                highlight: Color::Yellow,
                frontend: Color::Blue,
                backend: Color::Green,
                blockchain: Color::LightRed,
                tools: Color::Magenta,
            },
            Self::Light => Palette {
                text: Color::Black,
                muted: Color::DarkGray,
                heading: Color::Black,
                accent: Color::Blue,
                highlight: Color::Blue,
                frontend: Color::Blue,
                backend: Color::Green,
                blockchain: Color::Red,
                tools: Color::Magenta,
            },
            Self::HighContrast => Palette {
                text: Color::White,
                muted: Color::White,
                heading: Color::White,
                accent: Color::Cyan,
                highlight: Color::Yellow,
                frontend: Color::Cyan,
                backend: Color::LightGreen,
                blockchain: Color::LightRed,
                tools: Color::White,
            },
        }
    }
}
