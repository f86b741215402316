//! Swap configuration.
//!
//! Handles loading, validating, and merging `image-swap.toml`. User files are
//! sparse: they are merged over the stock defaults, so a file only needs the
//! keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! image_container = ".swap-img"     # Class selector for bound targets
//! create_new_image = true           # Reveal hidden targets when a source is applied
//! remove_image = true               # Hide a lone candidate that fits no density rule
//! load_best_available = true        # Apply a lone candidate anyway
//! interval = 250                    # Resize throttle / density poll period (ms)
//! breakpoints = [480, 768, 1024]    # Viewport-width tiers (px)
//! monitor_pixel_density = false     # Poll for monitor density changes
//! multi_candidate_fallback = "retain"  # or "nearest-ratio"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::breakpoint::{BreakpointError, BreakpointSet};
use crate::executor::SwapExecutor;
use crate::select::{MultiCandidateFallback, SelectionPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Invalid breakpoints: {0}")]
    Breakpoints(#[from] BreakpointError),
}

/// Configuration loaded from `image-swap.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwapConfig {
    /// Class selector that marks bound targets.
    pub image_container: String,
    /// Reveal a previously hidden target when a source is applied to it.
    pub create_new_image: bool,
    /// Hide a target whose only candidate fits no density rule.
    pub remove_image: bool,
    /// Apply a lone candidate even when it fits no density rule.
    pub load_best_available: bool,
    /// Resize throttle and density poll period, in milliseconds.
    pub interval: u64,
    /// Viewport-width thresholds in px. Order does not matter.
    pub breakpoints: Vec<u32>,
    /// Re-run the pass when the display density class changes.
    pub monitor_pixel_density: bool,
    /// What to do when several candidates fit no density rule.
    pub multi_candidate_fallback: MultiCandidateFallback,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            image_container: ".swap-img".to_string(),
            create_new_image: true,
            remove_image: true,
            load_best_available: true,
            interval: 250,
            breakpoints: vec![480, 768, 1024],
            monitor_pixel_density: false,
            multi_candidate_fallback: MultiCandidateFallback::Retain,
        }
    }
}

impl SwapConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.container_class().is_empty() {
            return Err(ConfigError::Validation(
                "image_container must name a class".into(),
            ));
        }
        if self.interval == 0 {
            return Err(ConfigError::Validation(
                "interval must be greater than 0".into(),
            ));
        }
        BreakpointSet::new(&self.breakpoints)?;
        Ok(())
    }

    /// The container selector without its leading `.`.
    pub fn container_class(&self) -> &str {
        let selector = self.image_container.trim();
        selector.strip_prefix('.').unwrap_or(selector)
    }

    pub fn breakpoint_set(&self) -> Result<BreakpointSet, BreakpointError> {
        BreakpointSet::new(&self.breakpoints)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval)
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            load_best_available: self.load_best_available,
            remove_image: self.remove_image,
            multi_candidate_fallback: self.multi_candidate_fallback,
        }
    }

    pub fn executor(&self) -> SwapExecutor {
        SwapExecutor::new(self.create_new_image)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SwapConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an overlay
///   `breakpoints` list replaces the default list rather than extending it.
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SwapConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SwapConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<SwapConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    if overlay.is_none() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `image-swap.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# image-swap configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Class selector marking the image elements that take part in swapping.
image_container = ".swap-img"

# Reveal a previously hidden image when a source is applied to it.
create_new_image = true

# Hide an image (1x1 placeholder) when its only candidate for the current
# breakpoint fits no pixel-density rule and load_best_available is off.
remove_image = true

# Apply a lone candidate for the current breakpoint even when its pixel
# ratio does not fit the display.
load_best_available = true

# Resize throttle and density poll period, in milliseconds.
interval = 250

# Viewport-width tiers in px. Each srcset needs an entry whose width equals
# a tier exactly (e.g. "cat_768.jpg 768w") to be shown at that tier.
breakpoints = [480, 768, 1024]

# Periodically check whether the display switched between standard and
# high density (e.g. window moved to another monitor) and re-run.
monitor_pixel_density = false

# When several candidates exist for a tier but none fits the display's
# pixel ratio: "retain" keeps the current source, "nearest-ratio" applies
# the candidate whose ratio is closest.
multi_candidate_fallback = "retain"
"##
}
