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

use parallax_core::platform::{DrawableSize, ViewHandle};
use parallax_core::renderer::{PowerPreference, RenderError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wgpu::{Features, Instance, RequestAdapterOptions};

/// Holds the core WGPU state objects required for rendering into one view.
///
/// The context owns the presentation surface created from the view's window
/// handle, the adapter selected for that surface, and the logical device.
#[derive(Debug)]
pub struct WgpuGraphicsContext {
    pub surface: wgpu::Surface<'static>,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,

    // Configuration for the surface's swapchain behavior
    pub surface_config: wgpu::SurfaceConfiguration,

    // Store info for easy access
    pub adapter_name: String,
    pub adapter_backend: wgpu::Backend,
    pub adapter_device_type: wgpu::DeviceType,

    device_lost: Arc<AtomicBool>,
}

fn to_wgpu_power_preference(preference: PowerPreference) -> wgpu::PowerPreference {
    match preference {
        PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
        PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
    }
}

/// Picks the presentation mode: Mailbox when vsync is off and available, Fifo otherwise.
pub(crate) fn select_present_mode(
    available: &[wgpu::PresentMode],
    vsync: bool,
) -> wgpu::PresentMode {
    if !vsync && available.contains(&wgpu::PresentMode::Mailbox) {
        wgpu::PresentMode::Mailbox
    } else {
        // Fifo is guaranteed to be supported
        wgpu::PresentMode::Fifo
    }
}

/// Picks the first sRGB surface format, falling back to the first one offered.
pub(crate) fn select_surface_format(
    available: &[wgpu::TextureFormat],
) -> Option<wgpu::TextureFormat> {
    available
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| available.first().copied())
}

impl WgpuGraphicsContext {
    /// Asynchronously initializes the graphics context for a view.
    ///
    /// ## Arguments
    /// * `window_handle` - A shareable handle to the view's native window.
    /// * `size` - The initial physical size of the view's drawable.
    /// * `power_preference` - Which class of adapter to request.
    /// * `vsync` - Whether presentation waits for vertical blank.
    pub async fn new(
        window_handle: ViewHandle,
        size: DrawableSize,
        power_preference: PowerPreference,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        log::info!("Initializing WGPU Graphics Context...");

        let instance = Instance::new(&wgpu::InstanceDescriptor::default());

        // --- 1. Create Surface ---
        let surface = instance.create_surface(window_handle).map_err(|e| {
            RenderError::InitializationFailed(format!("Failed to create surface: {e}"))
        })?;
        log::debug!("WGPU surface created for the view.");

        // --- 2. Select an adapter that can present to the surface ---
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: to_wgpu_power_preference(power_preference),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| {
                RenderError::InitializationFailed(format!(
                    "Failed to find an adapter compatible with the view: {e}"
                ))
            })?;

        let adapter_info = adapter.get_info();
        log::info!(
            "Using graphics adapter: \"{}\" (Backend: {:?}, Type: {:?})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        // --- 3. Create Logical Device and Command Queue from Adapter ---
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Parallax Logical Device"),
                required_features: Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
            })
            .await
            .map_err(|e| {
                RenderError::InitializationFailed(format!("Failed to create logical device: {e}"))
            })?;
        log::info!("Logical device and command queue created.");

        device.on_uncaptured_error(Box::new(|e: wgpu::Error| {
            log::error!("WGPU Uncaptured Error: {e:?}");
        }));

        let device_lost = Arc::new(AtomicBool::new(false));
        let lost_flag = Arc::clone(&device_lost);
        device.set_device_lost_callback(move |reason, message| {
            log::error!("WGPU device lost ({reason:?}): {message}");
            lost_flag.store(true, Ordering::SeqCst);
        });

        // --- 4. Configure Surface ---
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = select_surface_format(&surface_caps.formats).ok_or_else(|| {
            RenderError::InitializationFailed(
                "The surface reports no supported formats for this adapter".to_string(),
            )
        })?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: select_present_mode(&surface_caps.present_modes, vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::info!(
            "Surface configured: {}x{} {:?} ({:?})",
            surface_config.width,
            surface_config.height,
            surface_config.format,
            surface_config.present_mode
        );

        Ok(WgpuGraphicsContext {
            surface,
            adapter,
            device,
            queue,
            surface_config,
            adapter_name: adapter_info.name,
            adapter_backend: adapter_info.backend,
            adapter_device_type: adapter_info.device_type,
            device_lost,
        })
    }

    /// Reconfigures the underlying surface (swapchain) when the view is resized.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            log::info!(
                "WGPUGraphicsContext: Resizing surface configuration to {new_width}x{new_height}"
            );
            self.surface_config.width = new_width;
            self.surface_config.height = new_height;
            self.surface.configure(&self.device, &self.surface_config);
        } else {
            log::warn!(
                "WGPUGraphicsContext: Ignoring resize request to zero dimensions: {new_width}x{new_height}"
            );
        }
    }

    /// Applies the current surface configuration again, e.g. after the surface was lost.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Returns the current surface texture for rendering.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Returns `true` once the device-lost callback has fired.
    pub fn is_device_lost(&self) -> bool {
        self.device_lost.load(Ordering::SeqCst)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// Returns the size of the surface configuration.
    pub fn surface_size(&self) -> DrawableSize {
        DrawableSize::new(self.surface_config.width, self.surface_config.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_mode_honours_vsync() {
        let all = [wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox];
        assert_eq!(select_present_mode(&all, true), wgpu::PresentMode::Fifo);
        assert_eq!(select_present_mode(&all, false), wgpu::PresentMode::Mailbox);
        assert_eq!(
            select_present_mode(&[wgpu::PresentMode::Fifo], false),
            wgpu::PresentMode::Fifo
        );
    }

    #[test]
    fn surface_format_prefers_srgb() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(
            select_surface_format(&formats),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(
            select_surface_format(&[wgpu::TextureFormat::Rgba16Float]),
            Some(wgpu::TextureFormat::Rgba16Float)
        );
        assert_eq!(select_surface_format(&[]), None);
    }

    #[test]
    fn power_preference_maps_to_wgpu() {
        assert_eq!(
            to_wgpu_power_preference(PowerPreference::LowPower),
            wgpu::PowerPreference::LowPower
        );
        assert_eq!(
            to_wgpu_power_preference(PowerPreference::HighPerformance),
            wgpu::PowerPreference::HighPerformance
        );
    }
}
