// SPDX-License-Identifier: MPL-2.0
//! Viewer settings stored in `settings.toml` under the platform config
//! directory.
//!
//! Every field is optional. Missing fields, and files that fail to parse,
//! fall back to the `DEFAULT_*` constants.
//!
//! ```no_run
//! use simple_viewer::config;
//!
//! let mut settings = config::load().unwrap_or_default();
//! settings.cache_radius = Some(3);
//! assert_eq!(settings.cache_radius().capacity(), 7);
//! config::save(&settings).ok();
//! ```

mod defaults;
mod shortcuts;

pub use defaults::*;
pub use shortcuts::{Action, Shortcuts};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "SimpleViewer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache_radius: Option<usize>,
    #[serde(default)]
    pub animation_frame_ms: Option<u64>,
    #[serde(default)]
    pub shortcuts: Option<Shortcuts>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_radius: Some(DEFAULT_CACHE_RADIUS),
            animation_frame_ms: Some(DEFAULT_ANIMATION_FRAME_MS),
            shortcuts: Some(Shortcuts::default()),
        }
    }
}

impl Config {
    /// Effective cache radius, clamped to the supported range.
    pub fn cache_radius(&self) -> CacheRadius {
        self.cache_radius.map(CacheRadius::new).unwrap_or_default()
    }

    /// Fallback delay for animation frames that carry none.
    pub fn animation_frame_delay(&self) -> Duration {
        let ms = self
            .animation_frame_ms
            .unwrap_or(DEFAULT_ANIMATION_FRAME_MS)
            .max(MIN_ANIMATION_FRAME_MS);
        Duration::from_millis(ms)
    }

    pub fn shortcuts(&self) -> Shortcuts {
        self.shortcuts.clone().unwrap_or_default()
    }
}

/// Number of neighbors kept resident on each side of the current image.
///
/// The neighbor cache holds `2 * radius + 1` images.
///
/// ```
/// use simple_viewer::config::CacheRadius;
///
/// let radius = CacheRadius::new(2);
/// assert_eq!(radius.capacity(), 5);
///
/// // Values outside range are clamped
/// let too_high = CacheRadius::new(100);
/// assert_eq!(too_high.value(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheRadius(usize);

impl CacheRadius {
    pub fn new(value: usize) -> Self {
        Self(value.min(MAX_CACHE_RADIUS))
    }

    pub fn value(self) -> usize {
        self.0
    }

    /// Cache capacity for this radius (`2R + 1`).
    pub fn capacity(self) -> usize {
        2 * self.0 + 1
    }
}

impl Default for CacheRadius {
    fn default() -> Self {
        Self(DEFAULT_CACHE_RADIUS)
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(?path, error = %err, "Invalid settings file, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
