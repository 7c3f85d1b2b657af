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

//! Defines the hierarchy of error types for the rendering subsystem.

use std::fmt;

/// An error related to the compilation or validation of a shader module.
#[derive(Debug)]
pub enum ShaderError {
    /// The shader source failed to compile into a backend-specific module.
    CompilationError {
        /// A descriptive label for the shader.
        label: String,
        /// Detailed error messages from the shader compiler.
        details: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationError { label, details } => {
                write!(f, "Shader compilation failed for '{label}': {details}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation of a graphics pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// The graphics backend rejected the pipeline state object.
    CompilationFailed {
        /// A descriptive label for the pipeline.
        label: String,
        /// Detailed error messages from the backend.
        details: String,
    },
    /// The surface format cannot be used as a color target.
    IncompatibleColorTarget(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::CompilationFailed { label, details } => {
                write!(f, "Pipeline compilation failed for '{label}': {details}")
            }
            PipelineError::IncompatibleColorTarget(msg) => {
                write!(f, "Incompatible color target format: {msg}")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// An error related to the creation or use of a GPU resource (buffers, textures, etc.).
#[derive(Debug)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A pipeline-specific error occurred.
    Pipeline(PipelineError),
    /// Image data handed to a texture upload does not match its declared size.
    InvalidImage {
        /// The label of the texture being uploaded.
        label: String,
        /// The number of bytes the texture extent requires.
        expected: usize,
        /// The number of bytes that were provided.
        actual: usize,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::Pipeline(err) => write!(f, "Pipeline resource error: {err}"),
            ResourceError::InvalidImage {
                label,
                expected,
                actual,
            } => write!(
                f,
                "Image data for '{label}' has {actual} bytes, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            ResourceError::Pipeline(err) => Some(err),
            ResourceError::InvalidImage { .. } => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

impl From<PipelineError> for ResourceError {
    fn from(err: PipelineError) -> Self {
        ResourceError::Pipeline(err)
    }
}

/// A high-level error raised while constructing a renderer or drawing a frame.
#[derive(Debug)]
pub enum RenderError {
    /// A failure occurred while bringing up the graphics backend for a view.
    InitializationFailed(String),
    /// Failed to acquire the next drawable from the view's surface.
    SurfaceAcquisitionFailed(String),
    /// The GPU ran out of memory while acquiring or rendering a frame.
    OutOfMemory,
    /// The device rejected the commands recorded for this frame.
    RenderingFailed(String),
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
    /// The graphics device was lost (e.g., GPU driver crashed or was updated).
    DeviceLost,
}

impl RenderError {
    /// Returns `true` for errors after which no further frame can be drawn.
    ///
    /// Non-fatal errors only cost the current frame.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RenderError::InitializationFailed(_)
                | RenderError::OutOfMemory
                | RenderError::DeviceLost
                | RenderError::ResourceError(_)
        )
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize graphics backend: {msg}")
            }
            RenderError::SurfaceAcquisitionFailed(msg) => {
                write!(f, "Failed to acquire surface for rendering: {msg}")
            }
            RenderError::OutOfMemory => write!(f, "The graphics device ran out of memory."),
            RenderError::RenderingFailed(msg) => {
                write!(f, "A rendering operation failed: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::DeviceLost => write!(
                f,
                "The graphics device was lost and needs to be reinitialized."
            ),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

impl From<ShaderError> for RenderError {
    fn from(err: ShaderError) -> Self {
        RenderError::ResourceError(err.into())
    }
}

impl From<PipelineError> for RenderError {
    fn from(err: PipelineError) -> Self {
        RenderError::ResourceError(err.into())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::CompilationError {
            label: "Parallax Shader".to_string(),
            details: "unknown identifier `uvv`".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Shader compilation failed for 'Parallax Shader': unknown identifier `uvv`"
        );
    }

    #[test]
    fn resource_error_display_wrapping_shader_error() {
        let res_err: ResourceError = ShaderError::CompilationError {
            label: "Parallax Shader".to_string(),
            details: "missing entry point".to_string(),
        }
        .into();
        assert_eq!(
            format!("{res_err}"),
            "Shader resource error: Shader compilation failed for 'Parallax Shader': missing entry point"
        );
        assert!(res_err.source().is_some());
    }

    #[test]
    fn render_error_chains_down_to_the_shader() {
        let render_err: RenderError = ShaderError::CompilationError {
            label: "s".to_string(),
            details: "d".to_string(),
        }
        .into();
        assert!(render_err.source().is_some());
        assert!(render_err.source().unwrap().source().is_some());
    }

    #[test]
    fn invalid_image_display() {
        let err = ResourceError::InvalidImage {
            label: "Albedo".to_string(),
            expected: 64,
            actual: 32,
        };
        assert_eq!(
            err.to_string(),
            "Image data for 'Albedo' has 32 bytes, expected 64"
        );
    }

    #[test]
    fn fatal_classification() {
        assert!(RenderError::DeviceLost.is_fatal());
        assert!(RenderError::OutOfMemory.is_fatal());
        assert!(RenderError::InitializationFailed("no adapter".into()).is_fatal());
        assert!(!RenderError::SurfaceAcquisitionFailed("Timeout".into()).is_fatal());
        assert!(!RenderError::RenderingFailed("validation".into()).is_fatal());
    }
}
