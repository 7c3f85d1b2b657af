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

//! The wgpu implementation of the parallax renderer.

mod context;
mod pipeline;
mod renderer;
mod texture;

pub use self::context::WgpuGraphicsContext;
pub use self::pipeline::{vertex_buffer_layout, ParallaxPipeline, PARALLAX_SHADER_SOURCE};
pub use self::renderer::Renderer;
pub use self::texture::{DepthTexture, MaterialTextures, DEPTH_FORMAT};
