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

//! Derives the camera from the renderer's view vector.
//!
//! The view vector `V` points from the centre of the surface towards the eye
//! and is expressed in the surface's tangent frame, where +Z is the surface
//! normal. The eye is `V` mapped through [`PLANE_TANGENT_FRAME`] and scaled to
//! the camera distance.

use super::mesh::PLANE_TANGENT_FRAME;
use super::settings::CameraSettings;
use crate::math::{degrees_to_radians, Mat4, Vec3, EPSILON};

/// The view vector a renderer starts with: slightly below the normal,
/// looking up the +v axis of the surface.
pub const DEFAULT_VIEW_VECTOR: Vec3 = Vec3::new(0.0, -0.45, 1.0);

/// The steepest elevation reachable by rotation, in degrees.
const MAX_ELEVATION_DEGREES: f32 = 89.5;

/// Returns `v` as a unit vector whose z component is at least `min_elevation`.
///
/// Non-finite and near-zero vectors map to +Z. A vector below the elevation
/// floor keeps its azimuth and is raised onto the floor.
pub fn sanitize_view_vector(v: Vec3, min_elevation: f32) -> Vec3 {
    if !v.is_finite() {
        return Vec3::Z;
    }
    let n = v.normalize();
    if n == Vec3::ZERO {
        return Vec3::Z;
    }
    if n.z >= min_elevation {
        return n;
    }

    let horizontal_len = (n.x * n.x + n.y * n.y).sqrt();
    if horizontal_len < EPSILON {
        return Vec3::Z;
    }
    let z = min_elevation.clamp(0.0, 1.0);
    let scale = (1.0 - z * z).max(0.0).sqrt() / horizontal_len;
    Vec3::new(n.x * scale, n.y * scale, z)
}

/// Rotates a view vector around the surface normal by `yaw` and tilts it by
/// `pitch` (both in radians).
///
/// The resulting elevation is clamped between `asin(min_elevation)` and
/// 89.5 degrees, so the eye never crosses the surface or the pole.
pub fn rotate_view_vector(v: Vec3, yaw: f32, pitch: f32, min_elevation: f32) -> Vec3 {
    let s = sanitize_view_vector(v, min_elevation);
    let azimuth = s.y.atan2(s.x) + yaw;

    let max_elevation = degrees_to_radians(MAX_ELEVATION_DEGREES);
    let min_elevation = min_elevation.clamp(0.0, 1.0).asin().min(max_elevation);
    let elevation = (s.z.clamp(-1.0, 1.0).asin() + pitch).clamp(min_elevation, max_elevation);

    let (sin_el, cos_el) = elevation.sin_cos();
    let (sin_az, cos_az) = azimuth.sin_cos();
    Vec3::new(cos_el * cos_az, cos_el * sin_az, sin_el)
}

/// The matrices and eye position for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewInfo {
    /// World-to-view transform.
    pub view: Mat4,
    /// View-to-clip transform (right-handed, depth in `[0, 1]`).
    pub projection: Mat4,
    /// The eye position in world space (the surface sits at the origin).
    pub camera_position: Vec3,
}

impl ViewInfo {
    /// Builds the camera for view vector `v` and a drawable with the given aspect ratio.
    pub fn from_view_vector(v: Vec3, aspect_ratio: f32, camera: &CameraSettings) -> Self {
        let direction = sanitize_view_vector(v, camera.min_elevation);
        let eye = PLANE_TANGENT_FRAME.to_world(direction) * camera.distance;

        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y)
            .or_else(|| Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Z))
            .unwrap_or(Mat4::IDENTITY);

        let aspect_ratio = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            aspect_ratio
        } else {
            1.0
        };
        let projection = Mat4::perspective_rh_zo(
            degrees_to_radians(camera.fov_y_degrees),
            aspect_ratio,
            camera.z_near,
            camera.z_far,
        );

        Self {
            view,
            projection,
            camera_position: eye,
        }
    }

    /// The combined view-projection matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sanitize_normalizes() {
        let v = sanitize_view_vector(Vec3::new(0.0, 0.0, 5.0), 0.1);
        assert_eq!(v, Vec3::Z);

        let v = sanitize_view_vector(DEFAULT_VIEW_VECTOR, 0.08);
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-6);
        assert!(v.y < 0.0 && v.z > 0.0);
    }

    #[test]
    fn sanitize_handles_degenerate_input() {
        assert_eq!(sanitize_view_vector(Vec3::ZERO, 0.1), Vec3::Z);
        assert_eq!(
            sanitize_view_vector(Vec3::new(f32::NAN, 0.0, 1.0), 0.1),
            Vec3::Z
        );
        assert_eq!(sanitize_view_vector(Vec3::new(0.0, 0.0, -1.0), 0.1), Vec3::Z);
    }

    #[test]
    fn sanitize_lifts_vectors_below_the_floor() {
        let v = sanitize_view_vector(Vec3::new(1.0, 0.0, -0.5), 0.2);
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.z, 0.2, epsilon = 1e-6);
        assert!(v.x > 0.0);
        assert_relative_eq!(v.y, 0.0);
    }

    #[test]
    fn rotation_by_zero_is_identity_after_sanitizing() {
        let original = Vec3::new(0.3, -0.4, 0.8);
        let rotated = rotate_view_vector(original, 0.0, 0.0, 0.08);
        let expected = sanitize_view_vector(original, 0.08);
        assert_relative_eq!(rotated.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(rotated.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn yaw_preserves_elevation() {
        let original = sanitize_view_vector(DEFAULT_VIEW_VECTOR, 0.08);
        let rotated = rotate_view_vector(original, 1.0, 0.0, 0.08);
        assert_relative_eq!(rotated.z, original.z, epsilon = 1e-5);
        assert_relative_eq!(rotated.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn pitch_is_clamped_to_bounds() {
        let low = rotate_view_vector(Vec3::new(1.0, 0.0, 0.5), 0.0, -10.0, 0.1);
        assert_relative_eq!(low.z, 0.1, epsilon = 1e-5);

        let high = rotate_view_vector(Vec3::new(1.0, 0.0, 0.5), 0.0, 10.0, 0.1);
        let max = degrees_to_radians(MAX_ELEVATION_DEGREES).sin();
        assert_relative_eq!(high.z, max, epsilon = 1e-5);
        assert!(high.z < 1.0);
    }

    #[test]
    fn eye_sits_at_configured_distance() {
        let camera = CameraSettings::default();
        let info = ViewInfo::from_view_vector(DEFAULT_VIEW_VECTOR, 16.0 / 9.0, &camera);
        assert_relative_eq!(info.camera_position.length(), camera.distance, epsilon = 1e-5);
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let info = ViewInfo::from_view_vector(
            DEFAULT_VIEW_VECTOR,
            1.5,
            &CameraSettings::default(),
        );
        let ndc = info.view_projection().project_point3(Vec3::ZERO);
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn straight_down_view_uses_fallback_up() {
        // Eye on the +Y axis makes +Y a degenerate up vector.
        let camera = CameraSettings {
            min_elevation: 0.0,
            ..Default::default()
        };
        let info = ViewInfo::from_view_vector(Vec3::Y, 1.0, &camera);
        assert_ne!(info.view, Mat4::IDENTITY);
        let ndc = info.view_projection().project_point3(Vec3::ZERO);
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn invalid_aspect_ratio_falls_back_to_square() {
        let camera = CameraSettings::default();
        let square = ViewInfo::from_view_vector(Vec3::Z, 1.0, &camera);
        let broken = ViewInfo::from_view_vector(Vec3::Z, 0.0, &camera);
        assert_eq!(square.projection, broken.projection);
    }

    #[test]
    fn eye_direction_in_the_mesh_frame_equals_the_view_vector() {
        use crate::renderer::mesh::MeshData;

        let camera = CameraSettings::default();
        let mesh = MeshData::plane(1.0, 1.0);
        let vertex = mesh.vertices[0];
        let n = Vec3::from(vertex.normal);
        let t = Vec3::new(vertex.tangent[0], vertex.tangent[1], vertex.tangent[2]);
        let b = n.cross(t) * vertex.tangent[3];

        for v in [DEFAULT_VIEW_VECTOR, Vec3::new(0.5, 0.2, 0.7), Vec3::new(-0.3, 0.6, 0.4)] {
            let info = ViewInfo::from_view_vector(v, 1.0, &camera);
            let eye = info.camera_position.normalize();
            let in_tangent_space = Vec3::new(eye.dot(t), eye.dot(b), eye.dot(n));
            let expected = sanitize_view_vector(v, camera.min_elevation);
            assert_relative_eq!(in_tangent_space.x, expected.x, epsilon = 1e-5);
            assert_relative_eq!(in_tangent_space.y, expected.y, epsilon = 1e-5);
            assert_relative_eq!(in_tangent_space.z, expected.z, epsilon = 1e-5);
        }
    }
}
