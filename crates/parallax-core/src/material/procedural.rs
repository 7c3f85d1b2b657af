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

//! A procedural brick wall.

use crate::math::color::linear_to_srgb;
use crate::math::{lerp, saturate, Vec3};
use crate::renderer::SettingsError;
use serde::{Deserialize, Serialize};

const BRICK_COLOR: [f32; 3] = [0.36, 0.075, 0.042];
const MORTAR_COLOR: [f32; 3] = [0.42, 0.40, 0.36];

/// Parameters of the generated brick material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickPattern {
    /// Width and height of both images in texels. A power of two.
    pub size: u32,
    /// Brick rows per tile. Even, so the half-brick offset tiles.
    pub rows: u32,
    /// Bricks per row.
    pub columns: u32,
    /// Width of the mortar joint as a fraction of a brick's height.
    pub mortar: f32,
    /// Width of the bevel ramp as a fraction of a brick's height.
    pub bevel: f32,
    /// Strength of the normals derived from the height field.
    pub relief: f32,
    /// Seed of the per-brick color variation.
    pub seed: u32,
    /// How many times the tile repeats across the surface.
    pub uv_repeat: f32,
}

impl Default for BrickPattern {
    fn default() -> Self {
        Self {
            size: 512,
            rows: 8,
            columns: 4,
            mortar: 0.08,
            bevel: 0.12,
            relief: 6.0,
            seed: 0x5eed,
            uv_repeat: 2.0,
        }
    }
}

impl BrickPattern {
    /// Checks every field against its accepted range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.size.is_power_of_two() || !(16..=4096).contains(&self.size) {
            return Err(SettingsError::out_of_range(
                "material.size",
                self.size,
                "a power of two in 16 ..= 4096",
            ));
        }
        if self.rows == 0 || self.rows % 2 != 0 || self.rows > self.size / 4 {
            return Err(SettingsError::out_of_range(
                "material.rows",
                self.rows,
                "an even number in 2 ..= size / 4",
            ));
        }
        if self.columns == 0 || self.columns > self.size / 4 {
            return Err(SettingsError::out_of_range(
                "material.columns",
                self.columns,
                "1 ..= size / 4",
            ));
        }
        if !(0.0..0.5).contains(&self.mortar) {
            return Err(SettingsError::out_of_range(
                "material.mortar",
                self.mortar,
                "0.0 ..< 0.5",
            ));
        }
        if !(0.0..0.5).contains(&self.bevel) || self.mortar * 0.5 + self.bevel >= 0.5 {
            return Err(SettingsError::out_of_range(
                "material.bevel",
                self.bevel,
                "0.0 ..< 0.5 - mortar / 2",
            ));
        }
        if !(self.relief > 0.0 && self.relief.is_finite()) {
            return Err(SettingsError::out_of_range(
                "material.relief",
                self.relief,
                "> 0.0",
            ));
        }
        if !(self.uv_repeat > 0.0 && self.uv_repeat.is_finite()) {
            return Err(SettingsError::out_of_range(
                "material.uv_repeat",
                self.uv_repeat,
                "> 0.0",
            ));
        }
        Ok(())
    }
}

/// The two RGBA8 images of a material, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialImages {
    /// Width and height in texels.
    pub size: u32,
    /// sRGB-encoded base color.
    pub albedo: Vec<u8>,
    /// Tangent-space normal in `rgb` (`n * 0.5 + 0.5`), height in `a`.
    pub normal_height: Vec<u8>,
}

impl MaterialImages {
    /// Bytes per image: `size * size * 4`.
    pub fn byte_len(&self) -> usize {
        (self.size as usize) * (self.size as usize) * 4
    }

    /// The normal-height texel at `(x, y)`, or `None` outside the image.
    pub fn normal_height_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let i = (y as usize * self.size as usize + x as usize) * 4;
        let texel = self.normal_height.get(i..i + 4)?;
        Some([texel[0], texel[1], texel[2], texel[3]])
    }
}

/// Integer hash used for per-brick and per-texel variation.
fn hash(a: u32, b: u32, seed: u32) -> u32 {
    let mut h = seed ^ 0x9e37_79b9;
    for v in [a, b] {
        h ^= v.wrapping_mul(0x85eb_ca6b);
        h = h.rotate_left(13).wrapping_mul(0xc2b2_ae35);
    }
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h
}

fn unit(h: u32) -> f32 {
    (h >> 8) as f32 / (1u32 << 24) as f32
}

struct Cell {
    row: u32,
    column: u32,
    height: f32,
}

fn sample_cell(pattern: &BrickPattern, x: u32, y: u32) -> Cell {
    let size = pattern.size as f32;
    let cell_w = size / pattern.columns as f32;
    let cell_h = size / pattern.rows as f32;

    let fy = (y as f32 + 0.5) / cell_h;
    let row = fy.floor();
    let offset = if (row as u32) % 2 == 1 { 0.5 } else { 0.0 };
    let fx = (x as f32 + 0.5) / cell_w + offset;
    let column = (fx.floor() as i64).rem_euclid(pattern.columns as i64) as u32;

    // Distance to the nearest joint, in units of brick height.
    let lu = fx - fx.floor();
    let lv = fy - row;
    let edge_u = lu.min(1.0 - lu) * cell_w / cell_h;
    let edge_v = lv.min(1.0 - lv);
    let edge = edge_u.min(edge_v);

    let joint = pattern.mortar * 0.5;
    let height = if edge <= joint {
        0.0
    } else if pattern.bevel <= 0.0 {
        1.0
    } else {
        saturate((edge - joint) / pattern.bevel)
    };

    Cell {
        row: row as u32,
        column,
        height,
    }
}

/// Generates the brick material described by `pattern`.
///
/// The output depends only on `pattern` and tiles seamlessly in both
/// directions. Callers validate the pattern first.
pub fn generate_bricks(pattern: &BrickPattern) -> MaterialImages {
    let n = pattern.size;
    let texels = (n as usize) * (n as usize);
    let mut heights = Vec::with_capacity(texels);
    let mut albedo = Vec::with_capacity(texels * 4);

    for y in 0..n {
        for x in 0..n {
            let cell = sample_cell(pattern, x, y);
            heights.push(cell.height);

            let brick = hash(cell.row, cell.column, pattern.seed);
            let tone = 0.75 + 0.5 * unit(brick);
            let warmth = 0.9 + 0.2 * unit(brick.rotate_left(11));
            let grain = 0.94 + 0.12 * unit(hash(x, y, pattern.seed.wrapping_add(1)));

            let brick_rgb = [
                BRICK_COLOR[0] * tone * warmth,
                BRICK_COLOR[1] * tone,
                BRICK_COLOR[2] * tone / warmth,
            ];
            for (mortar, brick) in MORTAR_COLOR.iter().zip(brick_rgb) {
                let linear = lerp(*mortar, brick, cell.height) * grain;
                albedo.push((linear_to_srgb(saturate(linear)) * 255.0).round() as u8);
            }
            albedo.push(255);
        }
    }

    let at = |x: i64, y: i64| -> f32 {
        let n = n as i64;
        heights[(y.rem_euclid(n) * n + x.rem_euclid(n)) as usize]
    };

    let mut normal_height = Vec::with_capacity(texels * 4);
    for y in 0..n as i64 {
        for x in 0..n as i64 {
            let dh_du = (at(x + 1, y) - at(x - 1, y)) * 0.5;
            let dh_dv = (at(x, y + 1) - at(x, y - 1)) * 0.5;
            let normal =
                Vec3::new(-dh_du * pattern.relief, -dh_dv * pattern.relief, 1.0).normalize();
            for c in normal.to_array() {
                normal_height.push(((c * 0.5 + 0.5) * 255.0).round() as u8);
            }
            normal_height.push((at(x, y) * 255.0).round() as u8);
        }
    }

    MaterialImages {
        size: n,
        albedo,
        normal_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> BrickPattern {
        BrickPattern {
            size: 128,
            rows: 8,
            columns: 4,
            mortar: 0.1,
            bevel: 0.1,
            ..Default::default()
        }
    }

    #[test]
    fn default_pattern_is_valid() {
        assert!(BrickPattern::default().validate().is_ok());
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let odd_rows = BrickPattern {
            rows: 3,
            ..Default::default()
        };
        assert!(odd_rows.validate().is_err());

        let not_pow2 = BrickPattern {
            size: 300,
            ..Default::default()
        };
        assert!(not_pow2.validate().is_err());

        let no_face = BrickPattern {
            mortar: 0.4,
            bevel: 0.3,
            ..Default::default()
        };
        assert!(no_face.validate().is_err());
    }

    #[test]
    fn images_have_expected_size() {
        let images = generate_bricks(&small());
        assert_eq!(images.size, 128);
        assert_eq!(images.albedo.len(), images.byte_len());
        assert_eq!(images.normal_height.len(), 128 * 128 * 4);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate_bricks(&small()), generate_bricks(&small()));

        let reseeded = BrickPattern {
            seed: 7,
            ..small()
        };
        assert_ne!(generate_bricks(&small()).albedo, generate_bricks(&reseeded).albedo);
    }

    #[test]
    fn mortar_is_lower_than_brick_centres() {
        let pattern = small();
        let images = generate_bricks(&pattern);
        // Row 0 starts on a joint; the first brick's centre is half a cell in.
        let cell_w = pattern.size / pattern.columns;
        let cell_h = pattern.size / pattern.rows;
        let joint = images.normal_height_at(cell_w / 2, 0).unwrap();
        let centre = images.normal_height_at(cell_w / 2, cell_h / 2).unwrap();
        assert_eq!(joint[3], 0);
        assert_eq!(centre[3], 255);
    }

    #[test]
    fn flat_faces_point_up() {
        let pattern = small();
        let images = generate_bricks(&pattern);
        let cell_w = pattern.size / pattern.columns;
        let cell_h = pattern.size / pattern.rows;
        assert_eq!(
            images.normal_height_at(cell_w / 2, cell_h / 2),
            Some([128, 128, 255, 255])
        );
    }

    #[test]
    fn odd_rows_are_offset_by_half_a_brick() {
        let pattern = small();
        let images = generate_bricks(&pattern);
        let cell_w = pattern.size / pattern.columns;
        let cell_h = pattern.size / pattern.rows;
        // A brick centre on row 0 lies on a vertical joint on row 1.
        let row0 = images.normal_height_at(cell_w / 2, cell_h / 2).unwrap();
        let row1 = images.normal_height_at(cell_w / 2, cell_h + cell_h / 2).unwrap();
        assert_eq!(row0[3], 255);
        assert_eq!(row1[3], 0);
    }

    #[test]
    fn tiles_without_seams() {
        let pattern = small();
        let images = generate_bricks(&pattern);
        let n = pattern.size;
        let height = |x: u32, y: u32| images.normal_height_at(x, y).unwrap()[3] as i32;

        let interior_step = (0..n)
            .flat_map(|y| (0..n - 1).map(move |x| (x, y)))
            .map(|(x, y)| (height(x, y) - height(x + 1, y)).abs())
            .max()
            .unwrap_or(0);
        let seam_step = (0..n)
            .map(|y| (height(n - 1, y) - height(0, y)).abs())
            .max()
            .unwrap_or(0);
        assert!(seam_step <= interior_step);

        let vertical_seam = (0..n)
            .map(|x| (height(x, n - 1) - height(x, 0)).abs())
            .max()
            .unwrap_or(0);
        assert!(vertical_seam <= interior_step);
    }

    #[test]
    fn texel_lookup_outside_the_image_is_none() {
        let pattern = small();
        let images = generate_bricks(&pattern);
        let last = pattern.size - 1;
        assert!(images.normal_height_at(last, last).is_some());
        assert_eq!(images.normal_height_at(pattern.size, 0), None);
        assert_eq!(images.normal_height_at(0, pattern.size), None);
        assert_eq!(images.normal_height_at(u32::MAX, u32::MAX), None);
    }
}
