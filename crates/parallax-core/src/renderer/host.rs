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

//! The host side of the view-delegate protocol.
//!
//! A [`ViewHost`] sits between the windowing backend and the registered
//! [`ViewDelegate`]. The backend reports [`ViewEvent`]s; the host decides
//! which of them reach the delegate and turns the result into a
//! [`DispatchOutcome`] the event loop can act on.

use super::delegate::ViewDelegate;
use super::error::RenderError;
use super::stats::RenderStats;
use crate::platform::DrawableSize;

/// An event produced by the view's display loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// The drawable now has this physical size.
    Resized(DrawableSize),
    /// The display loop wants the next frame.
    RedrawRequested,
}

/// Why an event did not reach the delegate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No delegate is registered.
    NoDelegate,
    /// The drawable is empty (minimised window); drawing is suspended.
    EmptyDrawable,
    /// The reported size equals the last size forwarded to the delegate.
    Unchanged,
}

/// The result of dispatching one [`ViewEvent`].
#[derive(Debug)]
pub enum DispatchOutcome {
    /// `on_resize` was called with this size.
    Resized(DrawableSize),
    /// `on_draw` produced a frame.
    Drawn(RenderStats),
    /// The event was filtered out.
    Skipped(SkipReason),
    /// `on_draw` failed but later frames may succeed.
    Dropped(RenderError),
    /// `on_draw` failed in a way that ends rendering for this view.
    Fatal(RenderError),
}

impl DispatchOutcome {
    /// Returns `true` if the event loop should stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DispatchOutcome::Fatal(_))
    }
}

/// Counters kept by a [`ViewHost`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HostStats {
    /// Frames the delegate drew successfully.
    pub frames_drawn: u64,
    /// Frames lost to recoverable draw errors.
    pub frames_dropped: u64,
    /// Events filtered out before reaching the delegate.
    pub events_skipped: u64,
    /// Resizes forwarded to the delegate.
    pub resizes_forwarded: u64,
}

/// Owns the registered delegate and routes view events to it.
///
/// The host is generic over the delegate type so the application keeps typed
/// access to its renderer through [`ViewHost::delegate_mut`].
#[derive(Debug)]
pub struct ViewHost<D: ViewDelegate> {
    delegate: Option<D>,
    last_size: Option<DrawableSize>,
    suspended: bool,
    stats: HostStats,
}

impl<D: ViewDelegate> ViewHost<D> {
    /// Creates a host with no delegate registered.
    pub fn new() -> Self {
        Self {
            delegate: None,
            last_size: None,
            suspended: false,
            stats: HostStats::default(),
        }
    }

    /// Registers `delegate` as the receiver of this view's callbacks.
    ///
    /// Returns the previously registered delegate, if any. The recorded size
    /// is forgotten so the next resize always reaches the new delegate.
    pub fn set_delegate(&mut self, delegate: D) -> Option<D> {
        log::debug!("ViewHost: registering a new view delegate.");
        self.last_size = None;
        self.delegate.replace(delegate)
    }

    /// Unregisters and returns the current delegate.
    pub fn take_delegate(&mut self) -> Option<D> {
        self.last_size = None;
        self.delegate.take()
    }

    /// Returns `true` if a delegate is registered.
    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    /// Shared access to the registered delegate.
    pub fn delegate(&self) -> Option<&D> {
        self.delegate.as_ref()
    }

    /// Exclusive access to the registered delegate.
    pub fn delegate_mut(&mut self) -> Option<&mut D> {
        self.delegate.as_mut()
    }

    /// Returns `true` while the drawable is empty.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// The last size forwarded to the delegate.
    pub fn last_size(&self) -> Option<DrawableSize> {
        self.last_size
    }

    /// Counters accumulated since the host was created.
    pub fn stats(&self) -> HostStats {
        self.stats
    }

    /// Routes one event to the delegate.
    pub fn dispatch(&mut self, event: ViewEvent) -> DispatchOutcome {
        let outcome = match self.delegate.as_mut() {
            None => DispatchOutcome::Skipped(SkipReason::NoDelegate),
            Some(delegate) => match event {
                ViewEvent::Resized(size) if size.is_empty() => {
                    if !self.suspended {
                        log::info!("ViewHost: drawable is empty ({size}); suspending draws.");
                    }
                    self.suspended = true;
                    DispatchOutcome::Skipped(SkipReason::EmptyDrawable)
                }
                ViewEvent::Resized(size)
                    if !self.suspended && self.last_size == Some(size) =>
                {
                    DispatchOutcome::Skipped(SkipReason::Unchanged)
                }
                ViewEvent::Resized(size) => {
                    if self.suspended {
                        log::info!("ViewHost: drawable restored ({size}); resuming draws.");
                    }
                    delegate.on_resize(size);
                    self.last_size = Some(size);
                    self.suspended = false;
                    self.stats.resizes_forwarded += 1;
                    DispatchOutcome::Resized(size)
                }
                ViewEvent::RedrawRequested if self.suspended => {
                    DispatchOutcome::Skipped(SkipReason::EmptyDrawable)
                }
                ViewEvent::RedrawRequested => match delegate.on_draw() {
                    Ok(stats) => {
                        self.stats.frames_drawn += 1;
                        DispatchOutcome::Drawn(stats)
                    }
                    Err(err) if err.is_fatal() => {
                        log::error!("ViewHost: fatal draw error: {err}");
                        DispatchOutcome::Fatal(err)
                    }
                    Err(err) => {
                        log::warn!("ViewHost: frame dropped: {err}");
                        self.stats.frames_dropped += 1;
                        DispatchOutcome::Dropped(err)
                    }
                },
            },
        };

        if let DispatchOutcome::Skipped(reason) = &outcome {
            log::trace!("ViewHost: skipped {event:?} ({reason:?})");
            self.stats.events_skipped += 1;
        }
        outcome
    }
}

impl<D: ViewDelegate> Default for ViewHost<D> {
    fn default() -> Self {
        Self::new()
    }
}
