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

//! Integration tests for the view-delegate protocol driven end to end.

use parallax_core::controls::{apply_action, ViewControls, ViewDefaults, ViewParameters};
use parallax_core::math::Vec3;
use parallax_core::platform::{DrawableSize, InputEvent};
use parallax_core::renderer::{
    DispatchOutcome, ParallaxMode, RenderError, RenderStats, RendererDescriptor, SceneUniforms,
    SkipReason, ViewDelegate, ViewEvent, ViewHost, ViewInfo, DEFAULT_VIEW_VECTOR,
};
use parallax_core::AppConfig;

/// A delegate that behaves like the GPU renderer without touching a GPU:
/// it keeps `v` and the parallax settings, and builds uniforms per frame.
struct HeadlessRenderer {
    v: Vec3,
    descriptor: RendererDescriptor,
    size: DrawableSize,
    frame: u64,
    last_uniforms: Option<SceneUniforms>,
    lose_device_on_frame: Option<u64>,
}

impl HeadlessRenderer {
    fn new(descriptor: &RendererDescriptor) -> Self {
        Self {
            v: descriptor.view_vector,
            descriptor: descriptor.clone(),
            size: DrawableSize::default(),
            frame: 0,
            last_uniforms: None,
            lose_device_on_frame: None,
        }
    }
}

impl ViewDelegate for HeadlessRenderer {
    fn on_resize(&mut self, new_size: DrawableSize) {
        self.size = new_size;
    }

    fn on_draw(&mut self) -> Result<RenderStats, RenderError> {
        self.frame += 1;
        if self.lose_device_on_frame == Some(self.frame) {
            return Err(RenderError::DeviceLost);
        }
        let view = ViewInfo::from_view_vector(
            self.v,
            self.size.aspect_ratio(),
            &self.descriptor.camera,
        );
        self.last_uniforms = Some(SceneUniforms::new(
            &view,
            &self.descriptor.parallax,
            &self.descriptor.light,
        ));
        Ok(RenderStats {
            frame_number: self.frame,
            draw_calls: 1,
            triangles_rendered: 2,
            ..Default::default()
        })
    }
}

impl ViewParameters for HeadlessRenderer {
    fn view_vector(&self) -> Vec3 {
        self.v
    }
    fn set_view_vector(&mut self, v: Vec3) {
        self.v = v;
    }
    fn mode(&self) -> ParallaxMode {
        self.descriptor.parallax.mode
    }
    fn set_mode(&mut self, mode: ParallaxMode) {
        self.descriptor.parallax.mode = mode;
    }
    fn height_scale(&self) -> f32 {
        self.descriptor.parallax.height_scale
    }
    fn set_height_scale(&mut self, scale: f32) {
        self.descriptor.parallax.height_scale = scale;
    }
    fn min_layers(&self) -> u32 {
        self.descriptor.parallax.min_layers
    }
    fn max_layers(&self) -> u32 {
        self.descriptor.parallax.max_layers
    }
    fn set_max_layers(&mut self, layers: u32) {
        self.descriptor.parallax.max_layers = layers;
    }
    fn min_elevation(&self) -> f32 {
        self.descriptor.camera.min_elevation
    }
}

#[test]
fn test_view_vector_is_readable_after_construction() {
    let renderer = HeadlessRenderer::new(&RendererDescriptor::default());
    assert_eq!(renderer.view_vector(), DEFAULT_VIEW_VECTOR);

    let descriptor = RendererDescriptor {
        view_vector: Vec3::new(0.5, 0.5, 0.5),
        ..Default::default()
    };
    let renderer = HeadlessRenderer::new(&descriptor);
    assert_eq!(renderer.view_vector(), Vec3::new(0.5, 0.5, 0.5));
}

#[test]
fn test_registered_delegate_receives_callbacks() {
    let mut host = ViewHost::new();
    assert!(matches!(
        host.dispatch(ViewEvent::RedrawRequested),
        DispatchOutcome::Skipped(SkipReason::NoDelegate)
    ));

    host.set_delegate(HeadlessRenderer::new(&RendererDescriptor::default()));
    let size = DrawableSize::new(1280, 720);
    assert!(matches!(
        host.dispatch(ViewEvent::Resized(size)),
        DispatchOutcome::Resized(s) if s == size
    ));
    assert!(matches!(
        host.dispatch(ViewEvent::RedrawRequested),
        DispatchOutcome::Drawn(stats) if stats.frame_number == 1
    ));

    let renderer = host.delegate().unwrap();
    assert_eq!(renderer.size, size);
    assert!(renderer.last_uniforms.is_some());
}

#[test]
fn test_minimised_window_suspends_drawing() {
    let mut host = ViewHost::new();
    host.set_delegate(HeadlessRenderer::new(&RendererDescriptor::default()));
    host.dispatch(ViewEvent::Resized(DrawableSize::new(800, 600)));

    host.dispatch(ViewEvent::Resized(DrawableSize::new(0, 0)));
    assert!(matches!(
        host.dispatch(ViewEvent::RedrawRequested),
        DispatchOutcome::Skipped(SkipReason::EmptyDrawable)
    ));

    // Restoring to the same size must still resume drawing.
    assert!(matches!(
        host.dispatch(ViewEvent::Resized(DrawableSize::new(800, 600))),
        DispatchOutcome::Resized(_)
    ));
    assert!(matches!(
        host.dispatch(ViewEvent::RedrawRequested),
        DispatchOutcome::Drawn(_)
    ));
    assert_eq!(host.stats().frames_drawn, 1);
}

#[test]
fn test_device_loss_is_fatal() {
    let mut renderer = HeadlessRenderer::new(&RendererDescriptor::default());
    renderer.lose_device_on_frame = Some(2);

    let mut host = ViewHost::new();
    host.set_delegate(renderer);
    host.dispatch(ViewEvent::Resized(DrawableSize::new(640, 480)));
    assert!(!host.dispatch(ViewEvent::RedrawRequested).is_fatal());
    assert!(host.dispatch(ViewEvent::RedrawRequested).is_fatal());
}

#[test]
fn test_controls_reach_the_registered_delegate() {
    let config = AppConfig::default();
    let defaults = ViewDefaults::new(config.view_vector, &config.parallax);
    let mut host = ViewHost::new();
    host.set_delegate(HeadlessRenderer::new(&config.renderer_descriptor()));
    host.dispatch(ViewEvent::Resized(DrawableSize::new(640, 480)));

    let mut controls = ViewControls::new();
    for key in ["KeyM", "ArrowLeft", "Equal"] {
        let action = controls.handle(&InputEvent::key_pressed(key)).unwrap();
        apply_action(host.delegate_mut().unwrap(), action, &defaults);
    }
    host.dispatch(ViewEvent::RedrawRequested);

    let renderer = host.delegate().unwrap();
    assert_eq!(renderer.mode(), ParallaxMode::Flat);
    assert_ne!(renderer.view_vector(), DEFAULT_VIEW_VECTOR);
    let uniforms = renderer.last_uniforms.unwrap();
    assert_eq!(uniforms.mode, ParallaxMode::Flat.shader_index());
    assert!(uniforms.height_scale > config.parallax.height_scale);
}
