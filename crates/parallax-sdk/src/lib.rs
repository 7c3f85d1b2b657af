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

//! Hosts the parallax renderer in a winit window.
//!
//! [`run`] opens the window described by an [`AppConfig`], constructs the
//! [`Renderer`] for it, registers the renderer as the view's delegate and
//! drives the display loop until the window closes.

use anyhow::{anyhow, Context, Result};
use parallax_core::controls::{apply_action, ViewControls, ViewDefaults};
use parallax_core::platform::{DrawableSize, GpuView, InputEvent};
use parallax_core::renderer::{DispatchOutcome, ViewEvent, ViewHost};
use parallax_core::{AppConfig, Stopwatch};
use parallax_infra::platform::translate_window_event;
use parallax_infra::{Renderer, WinitView, WinitViewBuilder};
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

pub use parallax_core;
pub use parallax_infra;

const REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// The state of a running viewer, managed by the winit event loop.
pub struct ParallaxViewer {
    config: AppConfig,
    // Declared before `view` so the renderer is released first.
    host: ViewHost<Renderer>,
    view: Option<WinitView>,
    controls: ViewControls,
    defaults: ViewDefaults,
    failure: Option<anyhow::Error>,
    report_timer: Stopwatch,
    frames_since_report: u32,
}

impl ParallaxViewer {
    /// Creates a viewer; the window and renderer are built once the event loop resumes.
    pub fn new(config: AppConfig) -> Self {
        let defaults = ViewDefaults::new(config.view_vector, &config.parallax);
        Self {
            config,
            host: ViewHost::new(),
            view: None,
            controls: ViewControls::new(),
            defaults,
            failure: None,
            report_timer: Stopwatch::new(),
            frames_since_report: 0,
        }
    }

    /// Takes the error that stopped the event loop, if any.
    pub fn take_failure(&mut self) -> Option<anyhow::Error> {
        self.failure.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.failure = Some(error);
        event_loop.exit();
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = &self.config.window;
        let view = WinitViewBuilder::new()
            .with_title(window.title.clone())
            .with_dimensions(window.width, window.height)
            .build(event_loop)
            .context("Failed to create the viewer window")?;

        let renderer = Renderer::new(&view, &self.config.renderer_descriptor())
            .map_err(|e| anyhow!(e))
            .context("Failed to create the renderer")?;
        log::info!(
            "Renderer created on \"{}\" with V = {:?}",
            renderer.adapter_name(),
            renderer.v().to_array()
        );

        self.host.set_delegate(renderer);
        self.host.dispatch(ViewEvent::Resized(view.drawable_size()));
        view.request_redraw();
        self.view = Some(view);
        Ok(())
    }

    fn handle_input(&mut self, event_loop: &ActiveEventLoop, input: InputEvent) {
        if matches!(&input, InputEvent::KeyPressed { key_code } if key_code == "Escape") {
            log::info!("Escape pressed, exiting event loop...");
            event_loop.exit();
            return;
        }
        let Some(action) = self.controls.handle(&input) else {
            return;
        };
        if let Some(renderer) = self.host.delegate_mut() {
            if apply_action(&mut *renderer, action, &self.defaults) {
                log::debug!("{action:?} -> V = {:?}", renderer.v().to_array());
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        match self.host.dispatch(ViewEvent::RedrawRequested) {
            DispatchOutcome::Drawn(stats) => {
                log::trace!("Frame {} rendered.", stats.frame_number);
                self.frames_since_report += 1;
                let elapsed = self.report_timer.elapsed();
                if elapsed >= REPORT_INTERVAL {
                    let fps = self.frames_since_report as f32 / elapsed.as_secs_f32();
                    log::info!(
                        "{fps:.1} FPS (frame {}, cpu {:.2} ms prep / {:.2} ms submit)",
                        stats.frame_number,
                        stats.cpu_preparation_time_ms,
                        stats.cpu_render_submission_time_ms
                    );
                    self.report_timer.lap();
                    self.frames_since_report = 0;
                }
            }
            DispatchOutcome::Fatal(err) => {
                self.fail(event_loop, anyhow!(err).context("Rendering stopped"));
            }
            _ => {}
        }
    }
}

impl Drop for ParallaxViewer {
    fn drop(&mut self) {
        let stats = self.host.stats();
        log::info!(
            "Viewer shutting down: {} frames drawn, {} dropped, {} events skipped, {} resizes.",
            stats.frames_drawn,
            stats.frames_dropped,
            stats.events_skipped,
            stats.resizes_forwarded
        );
    }
}

impl ApplicationHandler for ParallaxViewer {
    /// Called when the event loop is ready to start processing events.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.view.is_some() || self.failure.is_some() {
            return; // Avoid re-initializing if the app is resumed multiple times.
        }

        log::info!("Application resumed. Creating window and renderer...");
        if let Err(e) = self.initialize(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.view.as_ref().map(WinitView::window_id) != Some(id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Shutdown requested, exiting event loop...");
                drop(self.host.take_delegate());
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                log::debug!("Window resized to: {}x{}", size.width, size.height);
                self.host
                    .dispatch(ViewEvent::Resized(DrawableSize::new(size.width, size.height)));
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::debug!("Scale factor changed to {scale_factor:.2}");
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => {
                if let Some(input) = translate_window_event(&other) {
                    self.handle_input(event_loop, input);
                }
            }
        }
    }

    /// Requests the next frame for continuous rendering.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.host.is_suspended() || !self.host.has_delegate() {
            return;
        }
        if let Some(view) = &self.view {
            view.request_redraw();
        }
    }
}

/// Runs the viewer until its window is closed.
///
/// Returns an error if the configuration is invalid, the window or renderer
/// cannot be created, or rendering fails fatally.
pub fn run(config: AppConfig) -> Result<()> {
    config.validate().context("Invalid configuration")?;
    log::info!("Parallax viewer: starting ({} mode)", config.parallax.mode);

    let event_loop = EventLoop::new()?;
    let mut viewer = ParallaxViewer::new(config);
    event_loop.run_app(&mut viewer)?;

    match viewer.take_failure() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
