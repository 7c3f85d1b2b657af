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

//! Construction parameters of a renderer.

use super::camera::DEFAULT_VIEW_VECTOR;
use super::settings::{CameraSettings, LightSettings, ParallaxSettings};
use crate::material::BrickPattern;
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// Which class of GPU adapter to prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerPreference {
    /// Integrated or otherwise power-saving adapters.
    #[serde(rename = "low")]
    LowPower,
    /// Discrete or otherwise high-performance adapters.
    #[default]
    #[serde(rename = "high")]
    HighPerformance,
}

/// Everything a renderer needs besides the view it draws into.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererDescriptor {
    /// Parameters of the parallax pass.
    pub parallax: ParallaxSettings,
    /// Parameters of the camera derived from the view vector.
    pub camera: CameraSettings,
    /// The directional light.
    pub light: LightSettings,
    /// The procedural material uploaded at construction.
    pub material: BrickPattern,
    /// Adapter class to request.
    pub power_preference: PowerPreference,
    /// Present with vertical sync.
    pub vsync: bool,
    /// The initial value of the renderer's view vector.
    pub view_vector: Vec3,
}

impl Default for RendererDescriptor {
    fn default() -> Self {
        Self {
            parallax: ParallaxSettings::default(),
            camera: CameraSettings::default(),
            light: LightSettings::default(),
            material: BrickPattern::default(),
            power_preference: PowerPreference::default(),
            vsync: true,
            view_vector: DEFAULT_VIEW_VECTOR,
        }
    }
}
