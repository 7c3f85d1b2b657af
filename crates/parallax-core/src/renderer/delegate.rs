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

//! The callback contract between a GPU-backed view and the object that draws into it.

use super::error::RenderError;
use super::stats::RenderStats;
use crate::platform::DrawableSize;

/// A polymorphic view delegate.
///
/// The host that owns the view holds the delegate and invokes these two
/// callback points from its display loop; application code never calls them
/// directly. Registration is explicit, through
/// [`ViewHost::set_delegate`](super::host::ViewHost::set_delegate).
pub trait ViewDelegate {
    /// The view's drawable changed size. Size-dependent resources must follow.
    ///
    /// The host only forwards non-empty sizes that differ from the last one.
    fn on_resize(&mut self, new_size: DrawableSize);

    /// Draw the next frame now.
    fn on_draw(&mut self) -> Result<RenderStats, RenderError>;
}

impl<D: ViewDelegate + ?Sized> ViewDelegate for Box<D> {
    fn on_resize(&mut self, new_size: DrawableSize) {
        (**self).on_resize(new_size);
    }

    fn on_draw(&mut self) -> Result<RenderStats, RenderError> {
        (**self).on_draw()
    }
}
