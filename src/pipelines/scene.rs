//! The one pipeline the viewer draws with.
//!
//! Bind groups:
//! - group 0: [`FrameUniform`] (camera and lights), written once per frame
//! - group 1: [`DrawUniform`] (model, fill, material), one dynamic-offset slot per draw
//! - group 2: texture and sampler for the draw's texture unit

use crate::{
    camera::OPENGL_TO_WGPU_MATRIX,
    data_structures::{primitive::MeshVertex, texture::Texture},
    pipelines::light::{PointLightUniform, SpotLightUniform},
    shader::*,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 3],
    _padding: u32,
    pub spot: SpotLightUniform,
    pub point: PointLightUniform,
}

impl FrameUniform {
    /// Pack the camera and light uniforms, converting the projection to
    /// wgpu's depth range.
    pub fn from_store(store: &UniformStore) -> Self {
        Self {
            view: store.mat4(VIEW).into(),
            projection: (OPENGL_TO_WGPU_MATRIX * store.mat4(PROJECTION)).into(),
            view_position: store.vec3(VIEW_POSITION).into(),
            _padding: 0,
            spot: SpotLightUniform::from_store(store),
            point: PointLightUniform::from_store(store),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: u32,
    _padding: u32,
    pub ambient_color: [f32; 3],
    pub ambient_strength: f32,
    pub diffuse_color: [f32; 3],
    /// Zero when no material was pushed; the shader then uses its defaults.
    pub shininess: f32,
    pub specular_color: [f32; 3],
    _padding2: u32,
}

impl DrawUniform {
    pub fn from_store(store: &UniformStore) -> Self {
        Self {
            model: store.mat4(MODEL).into(),
            object_color: store.vec4(OBJECT_COLOR).into(),
            uv_scale: store.vec2(UV_SCALE).into(),
            use_texture: store.bool(USE_TEXTURE) as u32,
            _padding: 0,
            ambient_color: store.vec3(MATERIAL_AMBIENT_COLOR).into(),
            ambient_strength: store.float(MATERIAL_AMBIENT_STRENGTH),
            diffuse_color: store.vec3(MATERIAL_DIFFUSE_COLOR).into(),
            shininess: store.float(MATERIAL_SHININESS),
            specular_color: store.vec3(MATERIAL_SPECULAR_COLOR).into(),
            _padding2: 0,
        }
    }
}

/// Round `size` up to the device's dynamic offset alignment.
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

fn uniform_entry(has_dynamic_offset: bool, size: u64) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size: wgpu::BufferSize::new(size),
        },
        count: None,
    }
}

pub fn frame_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[uniform_entry(
            false,
            std::mem::size_of::<FrameUniform>() as u64,
        )],
        label: Some("frame_bind_group_layout"),
    })
}

pub fn draw_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[uniform_entry(
            true,
            std::mem::size_of::<DrawUniform>() as u64,
        )],
        label: Some("draw_bind_group_layout"),
    })
}

pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("texture_bind_group_layout"),
    })
}

pub fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
        label: Some(label),
    })
}

pub fn mk_scene_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    frame_layout: &wgpu::BindGroupLayout,
    draw_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts: &[frame_layout, draw_layout, texture_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Scene Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
    };
    crate::pipelines::basic::mk_render_pipeline(
        device,
        &layout,
        color_format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        &[MeshVertex::desc()],
        shader,
    )
}
