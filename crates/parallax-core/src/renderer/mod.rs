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

//! Provides the backend-agnostic half of the parallax renderer.
//!
//! This module defines the view-delegate protocol (the [`ViewDelegate`] trait
//! and the [`ViewHost`] that drives it) together with everything the GPU
//! renderer computes on the CPU: settings, the camera derived from the view
//! vector, the uniform block layout and the plane mesh.
//!
//! The concrete wgpu renderer lives in `parallax-infra` and implements
//! [`ViewDelegate`] on top of these types.

pub mod camera;
pub mod delegate;
pub mod descriptor;
pub mod error;
pub mod host;
pub mod mesh;
pub mod settings;
pub mod stats;
pub mod uniforms;

// Re-export the most important traits and types for easier use.
pub use self::camera::{rotate_view_vector, sanitize_view_vector, ViewInfo, DEFAULT_VIEW_VECTOR};
pub use self::delegate::ViewDelegate;
pub use self::descriptor::{PowerPreference, RendererDescriptor};
pub use self::error::{PipelineError, RenderError, ResourceError, ShaderError};
pub use self::host::{DispatchOutcome, HostStats, SkipReason, ViewEvent, ViewHost};
pub use self::mesh::{MeshData, TangentFrame, Vertex, PLANE_TANGENT_FRAME};
pub use self::settings::{
    CameraSettings, LightSettings, ParallaxMode, ParallaxSettings, SettingsError,
};
pub use self::stats::RenderStats;
pub use self::uniforms::SceneUniforms;
