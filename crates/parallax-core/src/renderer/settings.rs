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

//! Runtime settings for the parallax pass, the camera and the light.

use crate::math::{LinearRgba, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The largest ray-march layer budget the shader accepts.
pub const MAX_LAYER_LIMIT: u32 = 128;

/// The largest height scale accepted, in texture-space units.
pub const MAX_HEIGHT_SCALE: f32 = 0.25;

/// The technique used to offset texture coordinates by the height map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParallaxMode {
    /// Normal mapping only; texture coordinates are not displaced.
    Flat,
    /// Single-sample parallax offset.
    Offset,
    /// Layered ray march through the height field.
    Steep,
    /// Layered ray march refined by interpolating between the last two layers.
    #[default]
    Occlusion,
}

impl ParallaxMode {
    /// All modes in cycling order.
    pub const ALL: [ParallaxMode; 4] = [
        ParallaxMode::Flat,
        ParallaxMode::Offset,
        ParallaxMode::Steep,
        ParallaxMode::Occlusion,
    ];

    /// The value of `SceneUniforms::mode` the shader switches on.
    pub fn shader_index(self) -> u32 {
        match self {
            ParallaxMode::Flat => 0,
            ParallaxMode::Offset => 1,
            ParallaxMode::Steep => 2,
            ParallaxMode::Occlusion => 3,
        }
    }

    /// The next mode in cycling order, wrapping around.
    pub fn next(self) -> Self {
        let index = self.shader_index() as usize;
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// The lowercase name used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            ParallaxMode::Flat => "flat",
            ParallaxMode::Offset => "offset",
            ParallaxMode::Steep => "steep",
            ParallaxMode::Occlusion => "occlusion",
        }
    }
}

impl fmt::Display for ParallaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParallaxMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SettingsError::UnknownMode(s.to_string()))
    }
}

/// An invalid setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// The string does not name a [`ParallaxMode`].
    UnknownMode(String),
    /// A numeric setting is outside its accepted range.
    OutOfRange {
        /// The dotted name of the setting.
        name: &'static str,
        /// The rejected value, formatted.
        value: String,
        /// A description of the accepted range.
        expected: &'static str,
    },
}

impl SettingsError {
    pub(crate) fn out_of_range(name: &'static str, value: impl fmt::Display, expected: &'static str) -> Self {
        SettingsError::OutOfRange {
            name,
            value: value.to_string(),
            expected,
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownMode(s) => write!(
                f,
                "Unknown parallax mode '{s}' (expected flat, offset, steep or occlusion)"
            ),
            SettingsError::OutOfRange {
                name,
                value,
                expected,
            } => write!(f, "Setting '{name}' = {value} is out of range ({expected})"),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Parameters of the parallax pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxSettings {
    /// The displacement technique.
    pub mode: ParallaxMode,
    /// Depth of the height field in texture-space units.
    pub height_scale: f32,
    /// Layers marched when looking straight down the normal.
    pub min_layers: u32,
    /// Layers marched at grazing angles.
    pub max_layers: u32,
    /// The color the drawable is cleared to.
    pub clear_color: LinearRgba,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            mode: ParallaxMode::Occlusion,
            height_scale: 0.06,
            min_layers: 8,
            max_layers: 48,
            clear_color: LinearRgba::new(0.01, 0.02, 0.03, 1.0),
        }
    }
}

impl ParallaxSettings {
    /// Checks every field against its accepted range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=MAX_HEIGHT_SCALE).contains(&self.height_scale) {
            return Err(SettingsError::out_of_range(
                "parallax.height_scale",
                self.height_scale,
                "0.0 ..= 0.25",
            ));
        }
        if self.min_layers == 0 {
            return Err(SettingsError::out_of_range(
                "parallax.min_layers",
                self.min_layers,
                ">= 1",
            ));
        }
        if self.max_layers < self.min_layers || self.max_layers > MAX_LAYER_LIMIT {
            return Err(SettingsError::out_of_range(
                "parallax.max_layers",
                self.max_layers,
                "min_layers ..= 128",
            ));
        }
        if !self.clear_color.is_normalized() {
            return Err(SettingsError::out_of_range(
                "parallax.clear_color",
                format!("{:?}", <[f32; 4]>::from(self.clear_color)),
                "components in 0.0 ..= 1.0",
            ));
        }
        Ok(())
    }
}

/// Parameters of the camera derived from the view vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view, in degrees.
    pub fov_y_degrees: f32,
    /// Distance from the eye to the centre of the surface.
    pub distance: f32,
    /// Near clipping plane.
    pub z_near: f32,
    /// Far clipping plane.
    pub z_far: f32,
    /// Lowest allowed z of the normalised view vector; keeps the eye above the surface.
    pub min_elevation: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            distance: 2.6,
            z_near: 0.05,
            z_far: 100.0,
            min_elevation: 0.08,
        }
    }
}

impl CameraSettings {
    /// Checks every field against its accepted range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.fov_y_degrees > 1.0 && self.fov_y_degrees < 179.0) {
            return Err(SettingsError::out_of_range(
                "camera.fov_y_degrees",
                self.fov_y_degrees,
                "1.0 < fov < 179.0",
            ));
        }
        if !(self.distance > 0.0 && self.distance.is_finite()) {
            return Err(SettingsError::out_of_range(
                "camera.distance",
                self.distance,
                "> 0.0",
            ));
        }
        if !(self.z_near > 0.0) {
            return Err(SettingsError::out_of_range(
                "camera.z_near",
                self.z_near,
                "> 0.0",
            ));
        }
        if !(self.z_far > self.z_near) {
            return Err(SettingsError::out_of_range(
                "camera.z_far",
                self.z_far,
                "> z_near",
            ));
        }
        if !(0.0..1.0).contains(&self.min_elevation) {
            return Err(SettingsError::out_of_range(
                "camera.min_elevation",
                self.min_elevation,
                "0.0 ..< 1.0",
            ));
        }
        Ok(())
    }
}

/// A single directional light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    /// The direction the light travels (from the light towards the surface).
    pub direction: Vec3,
    /// Constant ambient term.
    pub ambient: f32,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.4, -0.5, -1.0),
            ambient: 0.12,
        }
    }
}

impl LightSettings {
    /// Checks every field against its accepted range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.direction.is_finite() || self.direction.normalize() == Vec3::ZERO {
            return Err(SettingsError::out_of_range(
                "light.direction",
                format!("{:?}", self.direction.to_array()),
                "a finite, non-zero vector",
            ));
        }
        if !(0.0..=1.0).contains(&self.ambient) {
            return Err(SettingsError::out_of_range(
                "light.ambient",
                self.ambient,
                "0.0 ..= 1.0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_cycle_visits_every_mode() {
        let mut mode = ParallaxMode::Flat;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(seen, ParallaxMode::ALL.to_vec());
        assert_eq!(mode, ParallaxMode::Flat);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Steep".parse::<ParallaxMode>(), Ok(ParallaxMode::Steep));
        assert_eq!(" offset ".parse::<ParallaxMode>(), Ok(ParallaxMode::Offset));
        assert_eq!(
            "relief".parse::<ParallaxMode>(),
            Err(SettingsError::UnknownMode("relief".to_string()))
        );
    }

    #[test]
    fn mode_display_matches_parse() {
        for mode in ParallaxMode::ALL {
            assert_eq!(mode.to_string().parse::<ParallaxMode>(), Ok(mode));
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(ParallaxSettings::default().validate().is_ok());
        assert!(CameraSettings::default().validate().is_ok());
        assert!(LightSettings::default().validate().is_ok());
    }

    #[test]
    fn height_scale_out_of_range_is_rejected() {
        let settings = ParallaxSettings {
            height_scale: 0.5,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Setting 'parallax.height_scale' = 0.5 is out of range (0.0 ..= 0.25)"
        );
    }

    #[test]
    fn layer_budget_must_be_ordered() {
        let settings = ParallaxSettings {
            min_layers: 16,
            max_layers: 8,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = ParallaxSettings {
            max_layers: MAX_LAYER_LIMIT + 1,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn camera_planes_must_be_ordered() {
        let camera = CameraSettings {
            z_near: 1.0,
            z_far: 0.5,
            ..Default::default()
        };
        assert!(camera.validate().is_err());
    }

    #[test]
    fn zero_light_direction_is_rejected() {
        let light = LightSettings {
            direction: Vec3::ZERO,
            ..Default::default()
        };
        assert!(light.validate().is_err());
    }
}
