// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::buffer::Coord;
use crate::config::consts::{DEFAULT_FILLVALUE, DEFAULT_LOG_FILTER, DEFAULT_ORIGIN, DEFAULT_OWNER};
use crate::errors::ConfigError;
use crate::observability::messages::scene::SceneInvalid;
use crate::observability::messages::StructuredLog;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A scene: the canvases to start and how they are stacked.
///
/// Typically loaded from a YAML or TOML file.
///
/// # Example
/// ```yaml
/// log_filter: debug
/// canvases:
///   - id: root
///     owner: demo
///     height: 12
///     width: 40
///   - id: panel
///     owner: demo
///     height: 4
///     width: 10
///     host: root
///     origin: [2, 3]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SceneConfig {
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub canvases: Vec<CanvasConfig>,
}

/// Declaration of a single canvas.
///
/// # Fields
/// * `id` - Registry id, unique within the scene
/// * `owner` - Recorded on every cell the canvas generates
/// * `height`, `width` - Buffer dimensions
/// * `fillvalue` - Glyph for empty cells (defaults to `·`)
/// * `visible` - Whether generated cells render (defaults to true)
/// * `host` - Canvas this one forwards into, if any
/// * `origin` - Position of this canvas on its host (defaults to `[0, 0]`)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CanvasConfig {
    pub id: String,
    #[serde(default = "default_owner")]
    pub owner: String,
    pub height: usize,
    pub width: usize,
    #[serde(default = "default_fillvalue")]
    pub fillvalue: char,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_origin")]
    pub origin: Coord,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

fn default_fillvalue() -> char {
    DEFAULT_FILLVALUE
}

fn default_visible() -> bool {
    true
}

fn default_origin() -> Coord {
    DEFAULT_ORIGIN
}

impl CanvasConfig {
    /// A visible root canvas with the default fill.
    pub fn new(id: &str, owner: &str, height: usize, width: usize) -> Self {
        Self {
            id: id.to_string(),
            owner: owner.to_string(),
            height,
            width,
            fillvalue: DEFAULT_FILLVALUE,
            visible: true,
            host: None,
            origin: DEFAULT_ORIGIN,
        }
    }

    pub fn hosted_on(mut self, host: &str, origin: Coord) -> Self {
        self.host = Some(host.to_string());
        self.origin = origin;
        self
    }

    pub fn with_fillvalue(mut self, fillvalue: char) -> Self {
        self.fillvalue = fillvalue;
        self
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            canvases: Vec::new(),
        }
    }
}

/// Load a scene from a `.yaml`, `.yml` or `.toml` file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let content = fs::read_to_string(path)?;
    let scene = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    };
    Ok(scene)
}

/// Load a scene and check that it can be spawned.
///
/// Every validation error is reported, not just the first.
pub fn load_and_validate_scene<P: AsRef<Path>>(path: P) -> Result<SceneConfig, ConfigError> {
    let path = path.as_ref();
    let scene = load_scene(path)?;

    if let Err(errors) = crate::config::validate_scene(&scene) {
        SceneInvalid {
            source: &path.display().to_string(),
            errors: &errors,
        }
        .log();
        return Err(ConfigError::Invalid(errors));
    }

    Ok(scene)
}
