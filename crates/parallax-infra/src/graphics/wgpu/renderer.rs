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

//! The wgpu renderer: the delegate that draws the parallax-mapped surface into a view.

use super::context::WgpuGraphicsContext;
use super::pipeline::ParallaxPipeline;
use super::texture::{DepthTexture, MaterialTextures};
use parallax_core::controls::ViewParameters;
use parallax_core::material::generate_bricks;
use parallax_core::math::{LinearRgba, Vec3};
use parallax_core::platform::{DrawableSize, GpuView};
use parallax_core::renderer::{
    CameraSettings, LightSettings, MeshData, ParallaxMode, ParallaxSettings, RenderError,
    RenderStats, RendererDescriptor, SceneUniforms, ViewDelegate, ViewInfo,
};
use parallax_core::Stopwatch;
use wgpu::util::DeviceExt;

/// Draws a parallax-mapped surface into one GPU-backed view.
///
/// The renderer keeps only a shared window handle of its view (for the
/// presentation surface); the host owns the view itself. All GPU resources
/// are released when the renderer is dropped.
pub struct Renderer {
    v: Vec3,
    parallax: ParallaxSettings,
    camera: CameraSettings,
    light: LightSettings,

    context: WgpuGraphicsContext,
    pipeline: ParallaxPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    depth: DepthTexture,
    _material: MaterialTextures,

    view_id: u64,
    frame_count: u64,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("v", &self.v)
            .field("mode", &self.parallax.mode)
            .field("adapter", &self.context.adapter_name)
            .field("view_id", &self.view_id)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

fn to_wgpu_color(color: LinearRgba) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}

fn surface_error(err: wgpu::SurfaceError) -> RenderError {
    match err {
        wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
        wgpu::SurfaceError::Timeout => {
            RenderError::SurfaceAcquisitionFailed(format!("Timeout: {err}"))
        }
        other => RenderError::SurfaceAcquisitionFailed(format!("{other}")),
    }
}

/// Maps an error captured around frame encoding to a (recoverable) frame failure.
fn frame_error(err: wgpu::Error) -> RenderError {
    match err {
        wgpu::Error::OutOfMemory { .. } => RenderError::OutOfMemory,
        other => RenderError::RenderingFailed(other.to_string()),
    }
}

fn validate_descriptor(descriptor: &RendererDescriptor) -> Result<(), RenderError> {
    let invalid = |e: parallax_core::renderer::SettingsError| {
        RenderError::InitializationFailed(format!("Invalid renderer descriptor: {e}"))
    };
    descriptor.parallax.validate().map_err(invalid)?;
    descriptor.camera.validate().map_err(invalid)?;
    descriptor.light.validate().map_err(invalid)?;
    descriptor.material.validate().map_err(invalid)?;
    Ok(())
}

impl Renderer {
    /// Creates a renderer for `view` with the default descriptor.
    pub fn with_view(view: &dyn GpuView) -> Result<Self, RenderError> {
        Self::new(view, &RendererDescriptor::default())
    }

    /// Creates a renderer for `view`.
    ///
    /// Brings up the device for the view's surface, compiles the pipeline and
    /// uploads the mesh and material. Every failure is returned; nothing here
    /// aborts the process.
    pub fn new(view: &dyn GpuView, descriptor: &RendererDescriptor) -> Result<Self, RenderError> {
        validate_descriptor(descriptor)?;
        pollster::block_on(Self::initialize(view, descriptor))
    }

    async fn initialize(
        view: &dyn GpuView,
        descriptor: &RendererDescriptor,
    ) -> Result<Self, RenderError> {
        let init_timer = Stopwatch::new();
        let size = view.drawable_size();
        log::info!(
            "Renderer: initializing for view {} ({size}, scale factor {:.2})",
            view.id(),
            view.scale_factor()
        );

        let context = WgpuGraphicsContext::new(
            view.clone_handle_arc(),
            size,
            descriptor.power_preference,
            descriptor.vsync,
        )
        .await?;
        let device = context.device();

        let pipeline = ParallaxPipeline::new(device, context.surface_format()).await?;

        let material_timer = Stopwatch::new();
        let images = generate_bricks(&descriptor.material);
        log::debug!(
            "Renderer: generated {}x{} brick material in {:.1} ms",
            images.size,
            images.size,
            material_timer.elapsed_ms_f32()
        );
        let material = MaterialTextures::upload(device, context.queue(), &images)?;

        let mesh = MeshData::plane(1.0, descriptor.material.uv_repeat);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Parallax Plane Vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Parallax Plane Indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let view_info = ViewInfo::from_view_vector(
            descriptor.view_vector,
            size.aspect_ratio(),
            &descriptor.camera,
        );
        let uniforms = SceneUniforms::new(&view_info, &descriptor.parallax, &descriptor.light);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = pipeline.create_bind_group(device, &uniform_buffer, &material);
        let surface_size = context.surface_size();
        let depth = DepthTexture::new(device, surface_size.width, surface_size.height);

        log::info!(
            "Renderer: ready on \"{}\" ({:?}, {:?}) in {:.1} ms",
            context.adapter_name,
            context.adapter_backend,
            context.adapter_device_type,
            init_timer.elapsed_ms_f32()
        );

        Ok(Self {
            v: descriptor.view_vector,
            parallax: descriptor.parallax.clone(),
            camera: descriptor.camera.clone(),
            light: descriptor.light.clone(),
            index_count: mesh.indices.len() as u32,
            context,
            pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
            depth,
            _material: material,
            view_id: view.id(),
            frame_count: 0,
        })
    }

    /// The view vector: from the surface towards the eye, in tangent space.
    pub fn v(&self) -> Vec3 {
        self.v
    }

    /// Replaces the view vector. The value is stored as given and sanitised
    /// when the camera is derived each frame.
    pub fn set_v(&mut self, v: Vec3) {
        self.v = v;
    }

    /// The name of the adapter the renderer runs on.
    pub fn adapter_name(&self) -> &str {
        &self.context.adapter_name
    }

    fn acquire_frame(&mut self) -> Result<wgpu::SurfaceTexture, RenderError> {
        match self.context.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("Renderer: surface lost or outdated ({e:?}). Reconfiguring.");
                self.context.reconfigure();
                self.context.get_current_texture().map_err(surface_error)
            }
            Err(e) => Err(surface_error(e)),
        }
    }
}

impl ViewDelegate for Renderer {
    fn on_resize(&mut self, new_size: DrawableSize) {
        if new_size.is_empty() {
            log::warn!("Renderer: ignoring resize to empty drawable ({new_size}).");
            return;
        }
        self.context.resize(new_size.width, new_size.height);
        self.depth = DepthTexture::new(self.context.device(), new_size.width, new_size.height);
    }

    fn on_draw(&mut self) -> Result<RenderStats, RenderError> {
        if self.context.is_device_lost() {
            return Err(RenderError::DeviceLost);
        }
        let frame_timer = Stopwatch::new();

        // --- 1. Update uniforms from the view vector ---
        let size = self.context.surface_size();
        let view_info = ViewInfo::from_view_vector(self.v, size.aspect_ratio(), &self.camera);
        let uniforms = SceneUniforms::new(&view_info, &self.parallax, &self.light);
        self.context
            .queue()
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        // --- 2. Acquire Frame from Swap Chain ---
        let output = self.acquire_frame()?;
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let preparation_ms = frame_timer.elapsed_ms_f32();

        // --- 3. Main Render Pass ---
        let device = self.context.device();
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Parallax Frame Encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Parallax Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu_color(self.parallax.clear_color)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0), // Clear to far plane (1.0)
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        // --- 4. Finalize, Submit and Present ---
        let submission_timer = Stopwatch::new();
        self.context.queue().submit(std::iter::once(encoder.finish()));
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            log::warn!("Renderer: frame {} rejected by the device: {err}", self.frame_count + 1);
            return Err(frame_error(err));
        }
        output.present();

        self.frame_count += 1;
        Ok(RenderStats {
            frame_number: self.frame_count,
            cpu_preparation_time_ms: preparation_ms,
            cpu_render_submission_time_ms: submission_timer.elapsed_ms_f32(),
            draw_calls: 1,
            triangles_rendered: self.index_count / 3,
        })
    }
}

impl ViewParameters for Renderer {
    fn view_vector(&self) -> Vec3 {
        self.v
    }

    fn set_view_vector(&mut self, v: Vec3) {
        self.v = v;
    }

    fn mode(&self) -> ParallaxMode {
        self.parallax.mode
    }

    fn set_mode(&mut self, mode: ParallaxMode) {
        self.parallax.mode = mode;
    }

    fn height_scale(&self) -> f32 {
        self.parallax.height_scale
    }

    fn set_height_scale(&mut self, scale: f32) {
        self.parallax.height_scale = scale;
    }

    fn min_layers(&self) -> u32 {
        self.parallax.min_layers
    }

    fn max_layers(&self) -> u32 {
        self.parallax.max_layers
    }

    fn set_max_layers(&mut self, layers: u32) {
        self.parallax.max_layers = layers;
    }

    fn min_elevation(&self) -> f32 {
        self.camera.min_elevation
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        log::info!(
            "Renderer: releasing GPU resources for view {} after {} frames.",
            self.view_id,
            self.frame_count
        );
    }
}
