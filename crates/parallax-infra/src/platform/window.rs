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

//! A `winit`-based implementation of the `GpuView` trait.

use parallax_core::platform::{DrawableSize, GpuView, ViewHandle};
use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};
use std::sync::Arc;
use winit::{dpi::LogicalSize, error::OsError, event_loop::ActiveEventLoop, window::Window};

/// A wrapper around a `winit::window::Window` that implements the `GpuView` trait.
///
/// It uses an `Arc` internally so the renderer can hold a shared window handle
/// for its surface while the host keeps ownership of the view.
#[derive(Debug, Clone)]
pub struct WinitView {
    inner: Arc<Window>,
}

/// A builder for creating `WinitView` instances.
pub struct WinitViewBuilder {
    title: String,
    width: u32,
    height: u32,
}

impl WinitViewBuilder {
    /// Creates a new `WinitViewBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            title: "Parallax Mapping".to_string(),
            width: 1280,
            height: 720,
        }
    }

    /// Sets the title of the window to be built.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial inner dimensions (logical pixels) of the window to be built.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builds the `WinitView` using the provided `winit` event loop.
    ///
    /// # Errors
    /// Returns an `OsError` if the underlying `winit` window creation fails.
    pub fn build(self, event_loop: &ActiveEventLoop) -> Result<WinitView, OsError> {
        log::info!(
            "Building window with title: '{}' and size: {}x{}",
            self.title,
            self.width,
            self.height
        );

        let window_attributes = Window::default_attributes()
            .with_title(self.title)
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_visible(true);

        let window = event_loop.create_window(window_attributes)?;

        log::info!("Winit window created successfully (id: {:?}).", window.id());
        Ok(WinitView {
            inner: Arc::new(window),
        })
    }
}

impl Default for WinitViewBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitView {
    /// The `winit` identifier of the underlying window.
    pub fn window_id(&self) -> winit::window::WindowId {
        self.inner.id()
    }
}

impl HasWindowHandle for WinitView {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        self.inner.window_handle()
    }
}

impl HasDisplayHandle for WinitView {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        self.inner.display_handle()
    }
}

impl GpuView for WinitView {
    /// Returns the physical size of the window's inner area.
    fn drawable_size(&self) -> DrawableSize {
        let size = self.inner.inner_size();
        DrawableSize::new(size.width, size.height)
    }

    fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }

    fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    fn clone_handle_arc(&self) -> ViewHandle {
        self.inner.clone()
    }

    /// Returns a stable, unique identifier for the window.
    fn id(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        self.inner.id().hash(&mut hasher);
        hasher.finish()
    }
}
