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

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::fmt;
use std::sync::Arc;

/// Combines the windowing handle traits required by graphics backends into a
/// single object-safe trait.
pub trait WindowHandle: HasWindowHandle + HasDisplayHandle {}

impl<T: HasWindowHandle + HasDisplayHandle> WindowHandle for T {}

/// A shareable, thread-safe handle to the native window behind a view.
pub type ViewHandle = Arc<dyn WindowHandle + Send + Sync>;

/// The physical pixel size of a view's drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawableSize {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

impl DrawableSize {
    /// Creates a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A drawable with a zero side cannot be presented (e.g. minimised window).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height, or `1.0` for an empty drawable.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl fmt::Display for DrawableSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for DrawableSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// A GPU-backed view: the surface a renderer draws into.
///
/// Any windowing backend (winit, SDL, a native toolkit view...) can implement
/// this trait. The host owns the view; a delegate only keeps the handle
/// returned by [`GpuView::clone_handle_arc`] for surface creation.
pub trait GpuView: HasWindowHandle + HasDisplayHandle + Send + Sync {
    /// Returns the current physical size of the view's drawable.
    fn drawable_size(&self) -> DrawableSize;

    /// Returns the scale factor between logical and physical pixels.
    fn scale_factor(&self) -> f64;

    /// Asks the host to schedule a draw callback.
    fn request_redraw(&self);

    /// Clones a reference-counted handle to the native window.
    fn clone_handle_arc(&self) -> ViewHandle;

    /// Returns a stable identifier for the view.
    fn id(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sizes() {
        assert!(DrawableSize::new(0, 600).is_empty());
        assert!(DrawableSize::new(800, 0).is_empty());
        assert!(DrawableSize::default().is_empty());
        assert!(!DrawableSize::new(1, 1).is_empty());
    }

    #[test]
    fn aspect_ratio() {
        assert_eq!(DrawableSize::new(1600, 800).aspect_ratio(), 2.0);
        assert_eq!(DrawableSize::new(0, 800).aspect_ratio(), 1.0);
    }

    #[test]
    fn display_and_conversion() {
        let size: DrawableSize = (1280, 720).into();
        assert_eq!(size.to_string(), "1280x720");
    }
}
