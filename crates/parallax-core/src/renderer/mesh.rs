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

//! CPU-side geometry for the parallax surface.

use crate::math::Vec3;

/// A vertex of the parallax surface, matching the shader's vertex inputs.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// `@location(0)`
    pub position: [f32; 3],
    /// `@location(1)`
    pub normal: [f32; 3],
    /// `@location(2)`: tangent in `xyz`, bitangent sign in `w`.
    pub tangent: [f32; 4],
    /// `@location(3)`
    pub uv: [f32; 2],
}

/// An orthonormal tangent frame: the basis in which view and light vectors
/// are expressed for parallax lookups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentFrame {
    /// Direction of increasing `u`.
    pub tangent: Vec3,
    /// Direction of increasing `v`.
    pub bitangent: Vec3,
    /// Surface normal.
    pub normal: Vec3,
}

impl TangentFrame {
    /// The bitangent sign stored in `Vertex::tangent.w`, so that
    /// `cross(normal, tangent) * w == bitangent`.
    pub fn handedness(&self) -> f32 {
        if self.normal.cross(self.tangent).dot(self.bitangent) < 0.0 {
            -1.0
        } else {
            1.0
        }
    }

    /// Maps a tangent-space vector into world space.
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }

    /// Maps a world-space vector into tangent space.
    pub fn to_tangent(&self, w: Vec3) -> Vec3 {
        Vec3::new(w.dot(self.tangent), w.dot(self.bitangent), w.dot(self.normal))
    }
}

/// The frame of [`MeshData::plane`]: `u` along +X, `v` along -Y, normal +Z.
pub const PLANE_TANGENT_FRAME: TangentFrame = TangentFrame {
    tangent: Vec3::X,
    bitangent: Vec3::new(0.0, -1.0, 0.0),
    normal: Vec3::Z,
};

/// Indexed triangle geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle list indices, counter-clockwise front faces.
    pub indices: Vec<u16>,
}

impl MeshData {
    /// A square in the XY plane facing +Z, spanning `[-half_extent, half_extent]`.
    ///
    /// `u` grows along +X and `v` along -Y, both from 0 to `uv_repeat`. The
    /// vertices carry [`PLANE_TANGENT_FRAME`] (tangent +X with `w = -1`).
    pub fn plane(half_extent: f32, uv_repeat: f32) -> Self {
        let h = half_extent;
        let r = uv_repeat;
        let frame = PLANE_TANGENT_FRAME;
        let normal = frame.normal.to_array();
        let t = frame.tangent;
        let tangent = [t.x, t.y, t.z, frame.handedness()];
        let vertex = |x: f32, y: f32, u: f32, v: f32| Vertex {
            position: [x, y, 0.0],
            normal,
            tangent,
            uv: [u, v],
        };

        Self {
            vertices: vec![
                vertex(-h, h, 0.0, 0.0),
                vertex(-h, -h, 0.0, r),
                vertex(h, -h, r, r),
                vertex(h, h, r, 0.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// Number of triangles in the index list.
    pub fn triangle_count(&self) -> u32 {
        (self.indices.len() / 3) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn v3(a: [f32; 3]) -> Vec3 {
        Vec3::from(a)
    }

    #[test]
    fn plane_has_two_triangles() {
        let mesh = MeshData::plane(1.0, 2.0);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn winding_faces_the_normal() {
        let mesh = MeshData::plane(1.0, 1.0);
        for tri in mesh.indices.chunks(3) {
            let a = v3(mesh.vertices[tri[0] as usize].position);
            let b = v3(mesh.vertices[tri[1] as usize].position);
            let c = v3(mesh.vertices[tri[2] as usize].position);
            let face = (b - a).cross(c - a).normalize();
            assert_relative_eq!(face.dot(Vec3::Z), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn tangent_frame_is_orthonormal_and_follows_uv() {
        let mesh = MeshData::plane(1.0, 3.0);
        let vertex = mesh.vertices[0];
        let n = v3(vertex.normal);
        let t = Vec3::new(vertex.tangent[0], vertex.tangent[1], vertex.tangent[2]);
        let b = n.cross(t) * vertex.tangent[3];

        assert_relative_eq!(n.length(), 1.0);
        assert_relative_eq!(t.length(), 1.0);
        assert_relative_eq!(n.dot(t), 0.0);
        assert_relative_eq!(b.dot(t), 0.0);

        // Position delta along an edge must match the uv delta in the frame.
        let top_left = mesh.vertices[0];
        let bottom_right = mesh.vertices[2];
        let dp = v3(bottom_right.position) - v3(top_left.position);
        let du = bottom_right.uv[0] - top_left.uv[0];
        let dv = bottom_right.uv[1] - top_left.uv[1];
        assert!(dp.dot(t) * du > 0.0);
        assert!(dp.dot(b) * dv > 0.0);
    }

    #[test]
    fn plane_vertices_carry_the_plane_frame() {
        let mesh = MeshData::plane(1.0, 1.0);
        let vertex = mesh.vertices[0];
        let n = v3(vertex.normal);
        let t = Vec3::new(vertex.tangent[0], vertex.tangent[1], vertex.tangent[2]);
        let b = n.cross(t) * vertex.tangent[3];
        assert_eq!(vertex.tangent[3], -1.0);
        assert_eq!(n, PLANE_TANGENT_FRAME.normal);
        assert_eq!(t, PLANE_TANGENT_FRAME.tangent);
        assert_eq!(b, PLANE_TANGENT_FRAME.bitangent);
    }

    #[test]
    fn frame_round_trips_vectors() {
        let v = Vec3::new(0.3, -0.4, 0.8);
        let frame = PLANE_TANGENT_FRAME;
        assert_eq!(frame.to_tangent(frame.to_world(v)), v);
        assert_eq!(frame.to_world(Vec3::new(0.0, 1.0, 0.0)), Vec3::new(0.0, -1.0, 0.0));
    }
}
