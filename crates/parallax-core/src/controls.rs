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

//! Maps user input to changes of the renderer's view parameters.
//!
//! [`ViewControls`] is a small state machine over [`InputEvent`]s that emits
//! [`ControlAction`]s. [`apply_action`] applies an action to anything that
//! implements [`ViewParameters`], clamping every value to its valid range.

use crate::math::{degrees_to_radians, Vec3};
use crate::platform::{InputEvent, MouseButton};
use crate::renderer::settings::{MAX_HEIGHT_SCALE, MAX_LAYER_LIMIT};
use crate::renderer::{rotate_view_vector, ParallaxMode, ParallaxSettings, DEFAULT_VIEW_VECTOR};

/// A change requested by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    /// Rotate the view vector around the normal (`yaw`) and change its
    /// elevation (`pitch`), in radians.
    RotateView {
        /// Rotation around the surface normal.
        yaw: f32,
        /// Change of elevation.
        pitch: f32,
    },
    /// Switch to the next [`ParallaxMode`].
    CycleMode,
    /// Add this amount to the height scale.
    AdjustHeightScale(f32),
    /// Add this many layers to the maximum layer budget.
    AdjustLayerBudget(i32),
    /// Restore the view vector, height scale and layer budget defaults.
    ResetView,
}

/// The parameters a control action can change.
pub trait ViewParameters {
    /// The current view vector.
    fn view_vector(&self) -> Vec3;
    /// Replaces the view vector.
    fn set_view_vector(&mut self, v: Vec3);
    /// The current parallax mode.
    fn mode(&self) -> ParallaxMode;
    /// Replaces the parallax mode.
    fn set_mode(&mut self, mode: ParallaxMode);
    /// The current height scale.
    fn height_scale(&self) -> f32;
    /// Replaces the height scale.
    fn set_height_scale(&mut self, scale: f32);
    /// The number of layers marched along the normal.
    fn min_layers(&self) -> u32;
    /// The number of layers marched at grazing angles.
    fn max_layers(&self) -> u32;
    /// Replaces the grazing-angle layer count.
    fn set_max_layers(&mut self, layers: u32);
    /// The lowest z allowed for the normalised view vector.
    fn min_elevation(&self) -> f32;
}

/// The values [`ControlAction::ResetView`] restores.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDefaults {
    /// Initial view vector.
    pub view_vector: Vec3,
    /// Initial height scale.
    pub height_scale: f32,
    /// Initial grazing-angle layer count.
    pub max_layers: u32,
}

impl ViewDefaults {
    /// Captures the defaults from the startup configuration.
    pub fn new(view_vector: Vec3, parallax: &ParallaxSettings) -> Self {
        Self {
            view_vector,
            height_scale: parallax.height_scale,
            max_layers: parallax.max_layers,
        }
    }
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_VECTOR, &ParallaxSettings::default())
    }
}

/// Applies `action` to `params`. Returns `true` if any parameter changed.
pub fn apply_action(
    params: &mut dyn ViewParameters,
    action: ControlAction,
    defaults: &ViewDefaults,
) -> bool {
    match action {
        ControlAction::RotateView { yaw, pitch } => {
            let before = params.view_vector();
            let after = rotate_view_vector(before, yaw, pitch, params.min_elevation());
            params.set_view_vector(after);
            after != before
        }
        ControlAction::CycleMode => {
            let mode = params.mode().next();
            params.set_mode(mode);
            log::info!("Parallax mode: {mode}");
            true
        }
        ControlAction::AdjustHeightScale(delta) => {
            let before = params.height_scale();
            let after = (before + delta).clamp(0.0, MAX_HEIGHT_SCALE);
            params.set_height_scale(after);
            log::debug!("Height scale: {after:.3}");
            after != before
        }
        ControlAction::AdjustLayerBudget(delta) => {
            let before = params.max_layers();
            let after = (before as i64 + delta as i64)
                .clamp(params.min_layers() as i64, MAX_LAYER_LIMIT as i64) as u32;
            params.set_max_layers(after);
            log::debug!("Layer budget: {} ..= {after}", params.min_layers());
            after != before
        }
        ControlAction::ResetView => {
            params.set_view_vector(defaults.view_vector);
            params.set_height_scale(defaults.height_scale.clamp(0.0, MAX_HEIGHT_SCALE));
            params.set_max_layers(
                defaults
                    .max_layers
                    .clamp(params.min_layers(), MAX_LAYER_LIMIT),
            );
            true
        }
    }
}

/// Turns input events into [`ControlAction`]s.
#[derive(Debug, Clone)]
pub struct ViewControls {
    /// Yaw and pitch change per arrow key press, in radians.
    pub rotate_step: f32,
    /// Rotation per pixel of left-button drag, in radians.
    pub drag_sensitivity: f32,
    /// Height scale change per key press or wheel notch.
    pub height_step: f32,
    /// Layer budget change per key press.
    pub layer_step: i32,
    dragging: bool,
    last_cursor: Option<(f32, f32)>,
}

impl Default for ViewControls {
    fn default() -> Self {
        Self {
            rotate_step: degrees_to_radians(5.0),
            drag_sensitivity: degrees_to_radians(0.25),
            height_step: 0.005,
            layer_step: 8,
            dragging: false,
            last_cursor: None,
        }
    }
}

impl ViewControls {
    /// Creates controls with the default step sizes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while the left button is held.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feeds one input event; returns the action it maps to, if any.
    pub fn handle(&mut self, event: &InputEvent) -> Option<ControlAction> {
        match event {
            InputEvent::KeyPressed { key_code } => self.key_action(key_code),
            InputEvent::MouseButtonPressed {
                button: MouseButton::Left,
            } => {
                self.dragging = true;
                None
            }
            InputEvent::MouseButtonReleased {
                button: MouseButton::Left,
            } => {
                self.dragging = false;
                None
            }
            InputEvent::MouseMoved { x, y } => {
                let previous = self.last_cursor.replace((*x, *y));
                let (px, py) = previous.filter(|_| self.dragging)?;
                let (dx, dy) = (x - px, y - py);
                if dx == 0.0 && dy == 0.0 {
                    return None;
                }
                Some(ControlAction::RotateView {
                    yaw: -dx * self.drag_sensitivity,
                    pitch: dy * self.drag_sensitivity,
                })
            }
            InputEvent::MouseWheelScrolled { delta_y, .. } if *delta_y != 0.0 => Some(
                ControlAction::AdjustHeightScale(delta_y.signum() * self.height_step),
            ),
            _ => None,
        }
    }

    fn key_action(&self, key_code: &str) -> Option<ControlAction> {
        let step = self.rotate_step;
        let action = match key_code {
            "ArrowLeft" => ControlAction::RotateView {
                yaw: -step,
                pitch: 0.0,
            },
            "ArrowRight" => ControlAction::RotateView {
                yaw: step,
                pitch: 0.0,
            },
            "ArrowUp" => ControlAction::RotateView {
                yaw: 0.0,
                pitch: step,
            },
            "ArrowDown" => ControlAction::RotateView {
                yaw: 0.0,
                pitch: -step,
            },
            "KeyM" => ControlAction::CycleMode,
            "Equal" | "NumpadAdd" => ControlAction::AdjustHeightScale(self.height_step),
            "Minus" | "NumpadSubtract" => ControlAction::AdjustHeightScale(-self.height_step),
            "BracketRight" => ControlAction::AdjustLayerBudget(self.layer_step),
            "BracketLeft" => ControlAction::AdjustLayerBudget(-self.layer_step),
            "KeyR" => ControlAction::ResetView,
            _ => return None,
        };
        Some(action)
    }
}
