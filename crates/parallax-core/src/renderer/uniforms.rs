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

//! The uniform block shared with `parallax.wgsl`.

use super::camera::ViewInfo;
use super::settings::{LightSettings, ParallaxSettings};
use crate::math::{Mat4, Vec4};

/// Per-frame scene data, laid out to match `SceneUniforms` in the shader.
///
/// The layer counts are stored as floats because the shader interpolates
/// between them.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Model matrix of the surface.
    pub model: [[f32; 4]; 4],
    /// Eye position in world space, `w = 1`.
    pub camera_position: [f32; 4],
    /// Direction the light travels in `xyz`, ambient term in `w`.
    pub light_direction: [f32; 4],
    /// Depth of the height field.
    pub height_scale: f32,
    /// Layers marched along the normal.
    pub min_layers: f32,
    /// Layers marched at grazing angles.
    pub max_layers: f32,
    /// [`super::ParallaxMode::shader_index`].
    pub mode: u32,
}

impl SceneUniforms {
    /// Packs one frame's camera, parallax and light parameters.
    pub fn new(view: &ViewInfo, parallax: &ParallaxSettings, light: &LightSettings) -> Self {
        let direction = light.direction.normalize();
        Self {
            view_proj: view.view_projection().to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            camera_position: Vec4::from_vec3(view.camera_position, 1.0).to_array(),
            light_direction: Vec4::from_vec3(direction, light.ambient).to_array(),
            height_scale: parallax.height_scale,
            min_layers: parallax.min_layers as f32,
            max_layers: parallax.max_layers.max(parallax.min_layers) as f32,
            mode: parallax.mode.shader_index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::renderer::{CameraSettings, ParallaxMode, DEFAULT_VIEW_VECTOR};

    #[test]
    fn layout_matches_shader_struct() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 176);
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
        assert_eq!(std::mem::offset_of!(SceneUniforms, camera_position), 128);
        assert_eq!(std::mem::offset_of!(SceneUniforms, height_scale), 160);
        assert_eq!(std::mem::offset_of!(SceneUniforms, mode), 172);
    }

    #[test]
    fn packs_settings() {
        let view = ViewInfo::from_view_vector(DEFAULT_VIEW_VECTOR, 1.0, &CameraSettings::default());
        let parallax = ParallaxSettings {
            mode: ParallaxMode::Steep,
            height_scale: 0.1,
            min_layers: 4,
            max_layers: 32,
            ..Default::default()
        };
        let light = LightSettings {
            direction: Vec3::new(0.0, 0.0, -2.0),
            ambient: 0.25,
        };

        let uniforms = SceneUniforms::new(&view, &parallax, &light);
        assert_eq!(uniforms.mode, 2);
        assert_eq!(uniforms.min_layers, 4.0);
        assert_eq!(uniforms.max_layers, 32.0);
        assert_eq!(uniforms.height_scale, 0.1);
        assert_eq!(uniforms.light_direction, [0.0, 0.0, -1.0, 0.25]);
        assert_eq!(uniforms.camera_position[3], 1.0);
        assert_eq!(uniforms.model, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn bytes_are_castable() {
        let uniforms = SceneUniforms::new(
            &ViewInfo::from_view_vector(Vec3::Z, 1.0, &CameraSettings::default()),
            &ParallaxSettings::default(),
            &LightSettings::default(),
        );
        assert_eq!(bytemuck::bytes_of(&uniforms).len(), 176);
    }
}
