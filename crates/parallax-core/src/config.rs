// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration loaded from TOML.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a working configuration. See `sandbox/parallax.toml` for a
//! commented example.

use crate::material::BrickPattern;
use crate::math::Vec3;
use crate::renderer::{
    CameraSettings, LightSettings, ParallaxSettings, PowerPreference, RendererDescriptor,
    DEFAULT_VIEW_VECTOR,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `path` made absolute against the current directory, for log messages.
fn resolved_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// An error raised while loading or validating an [`AppConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The file is not valid TOML for [`AppConfig`].
    Parse {
        /// The file that failed to parse, if it came from disk.
        path: Option<PathBuf>,
        /// The parser's message.
        message: String,
    },
    /// A value parsed but is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read config file '{}': {source}", path.display())
            }
            ConfigError::Parse {
                path: Some(path),
                message,
            } => write!(f, "Failed to parse config file '{}': {message}", path.display()),
            ConfigError::Parse {
                path: None,
                message,
            } => write!(f, "Failed to parse config: {message}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<crate::renderer::SettingsError> for ConfigError {
    fn from(err: crate::renderer::SettingsError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// The window the viewer opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Parallax Mapping".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// GPU selection and presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    /// `"low"` or `"high"`.
    pub power_preference: PowerPreference,
    /// Present with vertical sync.
    pub vsync: bool,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            power_preference: PowerPreference::HighPerformance,
            vsync: true,
        }
    }
}

/// The complete viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `[window]`
    pub window: WindowConfig,
    /// `[parallax]`
    pub parallax: ParallaxSettings,
    /// `[camera]`
    pub camera: CameraSettings,
    /// `[light]`
    pub light: LightSettings,
    /// `[material]`
    pub material: BrickPattern,
    /// `[graphics]`
    pub graphics: GraphicsConfig,
    /// The renderer's initial view vector, `[x, y, z]`.
    pub view_vector: Vec3,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            parallax: ParallaxSettings::default(),
            camera: CameraSettings::default(),
            light: LightSettings::default(),
            material: BrickPattern::default(),
            graphics: GraphicsConfig::default(),
            view_vector: DEFAULT_VIEW_VECTOR,
        }
    }
}

impl AppConfig {
    /// Reads and parses the file at `path`. Does not validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            message: e.message().to_string(),
        })
    }

    /// Like [`AppConfig::load`], but returns the defaults if the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let resolved = resolved_path(path);
        if path.exists() {
            log::info!("Loading configuration from '{}'", resolved.display());
            Self::load(path)
        } else {
            log::warn!(
                "No configuration at '{}'. Using defaults.",
                resolved.display()
            );
            Ok(Self::default())
        }
    }

    /// Parses a configuration from TOML text. Does not validate.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.message().to_string(),
        })
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} must be non-zero",
                self.window.width, self.window.height
            )));
        }
        if !self.view_vector.is_finite() || self.view_vector.normalize() == Vec3::ZERO {
            return Err(ConfigError::Invalid(format!(
                "view_vector {:?} must be finite and non-zero",
                self.view_vector.to_array()
            )));
        }
        self.parallax.validate()?;
        self.camera.validate()?;
        self.light.validate()?;
        self.material.validate()?;
        Ok(())
    }

    /// The construction parameters for the renderer.
    pub fn renderer_descriptor(&self) -> RendererDescriptor {
        RendererDescriptor {
            parallax: self.parallax.clone(),
            camera: self.camera.clone(),
            light: self.light.clone(),
            material: self.material.clone(),
            power_preference: self.graphics.power_preference,
            vsync: self.graphics.vsync,
            view_vector: self.view_vector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ParallaxMode;

    #[test]
    fn defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load_or_default("no/such/dir/parallax.toml").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn logged_paths_are_absolute() {
        let resolved = resolved_path(Path::new("sandbox/parallax.toml"));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("sandbox/parallax.toml"));
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            view_vector = [0.2, -0.3, 0.9]

            [parallax]
            mode = "steep"
            height_scale = 0.1

            [graphics]
            power_preference = "low"
            "#,
        )
        .unwrap();

        assert_eq!(config.parallax.mode, ParallaxMode::Steep);
        assert_eq!(config.parallax.height_scale, 0.1);
        assert_eq!(config.parallax.max_layers, ParallaxSettings::default().max_layers);
        assert_eq!(config.graphics.power_preference, PowerPreference::LowPower);
        assert!(config.graphics.vsync);
        assert_eq!(config.view_vector, Vec3::new(0.2, -0.3, 0.9));
        assert_eq!(config.window, WindowConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_mode_is_a_parse_error() {
        let err = AppConfig::from_toml_str("[parallax]\nmode = \"relief\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config = AppConfig::from_toml_str("[parallax]\nheight_scale = 1.5\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("parallax.height_scale"));

        let config = AppConfig::from_toml_str("view_vector = [0.0, 0.0, 0.0]\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn descriptor_carries_sections() {
        let mut config = AppConfig::default();
        config.graphics.vsync = false;
        config.view_vector = Vec3::new(1.0, 0.0, 1.0);
        let descriptor = config.renderer_descriptor();
        assert!(!descriptor.vsync);
        assert_eq!(descriptor.view_vector, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(descriptor.material, config.material);
    }
}
