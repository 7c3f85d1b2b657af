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

//! Materials sampled by the parallax pass.
//!
//! A material is a pair of RGBA8 images of equal size: an sRGB albedo map and
//! a linear normal-height map whose `rgb` holds the tangent-space normal and
//! whose `a` holds the surface height (1.0 at the top of the relief).

pub mod procedural;

pub use self::procedural::{generate_bricks, BrickPattern, MaterialImages};
