//! Per-folder configuration.
//!
//! A caption folder may carry a `caption-deck.toml` that overrides the stock
//! defaults. The file is sparse: only the keys it names change, everything
//! else keeps its default.
//!
//! ```toml
//! [captions]
//! normalization = "trimmed"  # "trimmed" or "raw"
//! create_missing = true      # create <stem>.txt for uncaptioned images
//!
//! [display]
//! preview_size = 512         # longest edge surfaces scale images to, > 0
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::caption::{CaptionStore, Normalization};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional config file inside a caption folder.
pub const CONFIG_FILE: &str = "caption-deck.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Folder configuration loaded from `caption-deck.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckConfig {
    /// How captions are read, written, and created.
    pub captions: CaptionsConfig,
    /// Hints for display surfaces.
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionsConfig {
    /// Text normalization applied on load and save.
    pub normalization: Normalization,
    /// Write a new `<stem>.txt` when an uncaptioned image gets text.
    pub create_missing: bool,
}

impl Default for CaptionsConfig {
    fn default() -> Self {
        Self {
            normalization: Normalization::default(),
            create_missing: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Longest edge, in pixels, that surfaces scale a preview image down to.
    pub preview_size: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { preview_size: 512 }
    }
}

impl DeckConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.preview_size == 0 {
            return Err(ConfigError::Validation(
                "display.preview_size must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// The caption store this config describes.
    pub fn caption_store(&self) -> CaptionStore {
        CaptionStore::new(self.captions.normalization, self.captions.create_missing)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(DeckConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `caption-deck.toml` from a folder as a raw TOML value.
///
/// `Ok(None)` when the folder has no config file.
pub fn load_raw_config(folder: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = folder.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<DeckConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: DeckConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for `folder`, falling back to stock defaults.
pub fn load_config(folder: &Path) -> Result<DeckConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(folder)?)
}

/// Returns a fully-commented stock `caption-deck.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# caption-deck configuration
# ==========================
# Place this file in a caption folder as caption-deck.toml.
# All settings are optional; values shown are the defaults.
# Unknown keys will cause an error.

[captions]
# How caption text is treated between disk and the editor.
#   "trimmed": trailing whitespace and blank lines are stripped when a caption
#              is loaded, and CRLF line breaks are written back as a single CR.
#   "raw":     captions are loaded and saved byte-for-byte.
normalization = "trimmed"

# When an image has no caption file yet, typing a caption for it creates
# <stem>.txt next to the image. Set to false to only ever edit existing files.
create_missing = true

[display]
# Longest edge, in pixels, that a display surface scales each image down to
# for its preview. Must be greater than 0.
preview_size = 512
"##
}
