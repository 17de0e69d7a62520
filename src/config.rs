//! Configuration support for the page runtime.
//!
//! The site ships its configuration as JSON, either inline in the page
//! (`<script id="site-config" type="application/json">`) or as a file for the
//! native walkthrough. Every field has a default so partial documents are fine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{DEFAULT_CRITICAL_ASSETS, DEFAULT_GALLERY_MEDIA};

/// Log level setting for the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Convert to the `log` crate's Level used by `console_log`.
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Current configuration format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Delays and thresholds, in milliseconds and pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Forced preloader completion if assets stall
    pub preload_fallback_ms: u64,
    /// Preloader fade-out before the page unlocks
    pub preload_finish_ms: u64,
    /// Delay between unlock and the first reveal pass
    pub initial_reveal_ms: u64,
    /// Stagger between hero elements
    pub hero_stagger_ms: u64,
    /// Fraction of the viewport height where elements reveal
    pub reveal_trigger_ratio: f64,
    /// Minimum spacing between reveal passes; 0 checks on every event
    pub reveal_throttle_ms: u64,
    /// Gallery main image fade before the source swap
    pub gallery_fade_ms: u64,
    /// "Play video" button: open to scroll-into-view delay
    pub gallery_video_scroll_ms: u64,
    /// "Play video" button: scroll to playback delay
    pub gallery_video_play_ms: u64,
    /// First scroll to popup delay
    pub popup_delay_ms: u64,
    /// Popup shown to video playback delay
    pub popup_play_ms: u64,
    /// Popup video volume when played with sound
    pub popup_volume: f64,
    /// Newsletter field border reset delay
    pub field_reset_ms: u64,
    /// Toast time on screen
    pub toast_visible_ms: u64,
    /// Toast slide-out before removal
    pub toast_exit_ms: u64,
    /// Scroll offset past which the header is "scrolled"
    pub header_scrolled_px: f64,
    /// Offset added to scroll position when picking the active section
    pub active_section_offset_px: f64,
    /// Minimum viewport width for the custom cursor
    pub cursor_min_width_px: f64,
    /// Easing factor of the cursor dot
    pub cursor_ease: f64,
    /// Easing factor of the cursor follower
    pub follower_ease: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            preload_fallback_ms: 5000,
            preload_finish_ms: 600,
            initial_reveal_ms: 100,
            hero_stagger_ms: 150,
            reveal_trigger_ratio: 0.85,
            reveal_throttle_ms: 0,
            gallery_fade_ms: 150,
            gallery_video_scroll_ms: 300,
            gallery_video_play_ms: 500,
            popup_delay_ms: 300,
            popup_play_ms: 100,
            popup_volume: 0.7,
            field_reset_ms: 2000,
            toast_visible_ms: 3000,
            toast_exit_ms: 400,
            header_scrolled_px: 100.0,
            active_section_offset_px: 150.0,
            cursor_min_width_px: 1024.0,
            cursor_ease: 0.5,
            follower_ease: 0.15,
        }
    }
}

/// Convert a millisecond setting to a Duration.
pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Newsletter notification texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterText {
    /// Toast shown after a valid signup
    pub success: String,
    /// Toast shown for a rejected address
    pub invalid: String,
}

impl Default for NewsletterText {
    fn default() -> Self {
        Self {
            success: "Merci ! Vous êtes inscrit.".to_string(),
            invalid: "Veuillez entrer un email valide.".to_string(),
        }
    }
}

/// Site configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Version of the configuration format
    pub version: u32,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Delays and thresholds
    #[serde(default)]
    pub timings: Timings,

    /// Assets the preloader waits for
    #[serde(default = "default_critical_assets")]
    pub critical_assets: Vec<String>,

    /// Gallery media locations, in display order
    #[serde(default = "default_gallery_media")]
    pub gallery_media: Vec<String>,

    /// Newsletter notification texts
    #[serde(default)]
    pub newsletter: NewsletterText,
}

fn default_critical_assets() -> Vec<String> {
    DEFAULT_CRITICAL_ASSETS.iter().map(|s| s.to_string()).collect()
}

fn default_gallery_media() -> Vec<String> {
    DEFAULT_GALLERY_MEDIA.iter().map(|s| s.to_string()).collect()
}

impl SiteConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            timings: Timings::default(),
            critical_assets: default_critical_assets(),
            gallery_media: default_gallery_media(),
            newsletter: NewsletterText::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Load configuration from a JSON file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Element id of the inline configuration block.
    #[cfg(target_arch = "wasm32")]
    const PAGE_CONFIG_ID: &'static str = "site-config";

    /// Load configuration from the page's inline JSON block (WASM only).
    /// Falls back to defaults when the block is missing or invalid.
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_page(document: &web_sys::Document) -> Self {
        let Some(json) = document
            .get_element_by_id(Self::PAGE_CONFIG_ID)
            .and_then(|el| el.text_content())
        else {
            log::debug!("No inline configuration, using defaults");
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded configuration from page");
                config
            }
            Err(e) => {
                log::warn!("Failed to parse inline configuration: {}", e);
                Self::default()
            }
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
