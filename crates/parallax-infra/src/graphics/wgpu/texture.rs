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

//! GPU textures: the depth buffer and the material maps.

use parallax_core::material::MaterialImages;
use parallax_core::renderer::ResourceError;

/// The format of the depth attachment.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A depth texture sized to the drawable.
#[derive(Debug)]
pub struct DepthTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    /// Creates a depth texture of `width` x `height`. Zero sides are clamped to 1.
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Depth Texture View"),
            aspect: wgpu::TextureAspect::DepthOnly,
            ..Default::default()
        });
        log::debug!("Depth texture created: {width}x{height} ({DEPTH_FORMAT:?})");
        Self { texture, view }
    }
}

/// The uploaded albedo and normal-height maps plus their sampler.
#[derive(Debug)]
pub struct MaterialTextures {
    #[allow(dead_code)]
    albedo: wgpu::Texture,
    #[allow(dead_code)]
    normal_height: wgpu::Texture,
    pub albedo_view: wgpu::TextureView,
    pub normal_height_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

fn upload_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    size: u32,
    format: wgpu::TextureFormat,
    data: &[u8],
) -> Result<wgpu::Texture, ResourceError> {
    let expected = (size as usize) * (size as usize) * 4;
    if data.len() != expected {
        return Err(ResourceError::InvalidImage {
            label: label.to_string(),
            expected,
            actual: data.len(),
        });
    }

    let extent = wgpu::Extent3d {
        width: size,
        height: size,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * size),
            rows_per_image: Some(size),
        },
        extent,
    );
    Ok(texture)
}

impl MaterialTextures {
    /// Uploads both maps. The albedo is sampled as sRGB, the normal-height map as linear.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        images: &MaterialImages,
    ) -> Result<Self, ResourceError> {
        let albedo = upload_rgba8(
            device,
            queue,
            "Material Albedo",
            images.size,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            &images.albedo,
        )?;
        let normal_height = upload_rgba8(
            device,
            queue,
            "Material Normal-Height",
            images.size,
            wgpu::TextureFormat::Rgba8Unorm,
            &images.normal_height,
        )?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        log::info!(
            "Material uploaded: {}x{} albedo + normal-height",
            images.size,
            images.size
        );

        Ok(Self {
            albedo_view: albedo.create_view(&wgpu::TextureViewDescriptor::default()),
            normal_height_view: normal_height.create_view(&wgpu::TextureViewDescriptor::default()),
            albedo,
            normal_height,
            sampler,
        })
    }
}
