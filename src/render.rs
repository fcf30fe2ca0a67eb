//! wgpu implementation of the scene's graphics backend.
//!
//! [`SceneRenderer`] collects named uniforms in a [`UniformStore`] exactly the
//! way a GL program would hold them. Every `draw_mesh` snapshots the current
//! per-draw uniforms into a [`DrawUniform`] and queues a draw; `render`
//! uploads the frame uniform and all snapshots at once and replays the queue
//! in a single render pass.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{primitive::Primitive, texture::Texture},
    error::TextureResult,
    pipelines::scene::{
        DrawUniform, FrameUniform, aligned_stride, draw_layout, frame_layout, mk_scene_pipeline,
        texture_bind_group, texture_layout,
    },
    registry::{MAX_TEXTURE_UNITS, TextureUploader},
    resources::texture::DecodedImage,
    scene::MeshDrawer,
    shader::{OBJECT_TEXTURE, ShaderUniforms, USE_TEXTURE, UniformStore},
};

const INITIAL_DRAW_CAPACITY: usize = 32;

#[derive(Debug)]
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_elements: u32,
}

#[derive(Debug)]
struct GpuTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

#[derive(Debug, Clone, Copy)]
struct DrawCommand {
    primitive: Primitive,
    texture_unit: Option<usize>,
    uniform: DrawUniform,
}

#[derive(Debug)]
pub struct SceneRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    draw_capacity: usize,
    texture_layout: wgpu::BindGroupLayout,
    fallback: GpuTexture,
    /// Indexed by handle; released textures leave a hole.
    textures: Vec<Option<GpuTexture>>,
    units: [Option<usize>; MAX_TEXTURE_UNITS],
    meshes: HashMap<Primitive, GpuMesh>,
    uniforms: UniformStore,
    draws: Vec<DrawCommand>,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, color_format: wgpu::TextureFormat) -> Self {
        let frame_layout = frame_layout(device);
        let draw_layout = draw_layout(device);
        let texture_layout = texture_layout(device);
        let pipeline = mk_scene_pipeline(
            device,
            color_format,
            &frame_layout,
            &draw_layout,
            &texture_layout,
        );

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
            label: Some("frame_bind_group"),
        });

        let draw_stride = aligned_stride(
            std::mem::size_of::<DrawUniform>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let (draw_buffer, draw_bind_group) =
            create_draw_buffer(device, &draw_layout, draw_stride, INITIAL_DRAW_CAPACITY);

        let fallback_texture = Texture::create_fallback(device, queue);
        let fallback = GpuTexture {
            bind_group: texture_bind_group(device, &texture_layout, &fallback_texture, "fallback"),
            texture: fallback_texture,
        };

        Self {
            device: device.clone(),
            queue: queue.clone(),
            pipeline,
            frame_buffer,
            frame_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            texture_layout,
            fallback,
            textures: Vec::new(),
            units: [None; MAX_TEXTURE_UNITS],
            meshes: HashMap::new(),
            uniforms: UniformStore::new(),
            draws: Vec::new(),
        }
    }

    /// Uniform state as the shader would currently see it.
    pub fn uniforms(&self) -> &UniformStore {
        &self.uniforms
    }

    pub fn queued_draws(&self) -> usize {
        self.draws.len()
    }

    fn ensure_draw_capacity(&mut self, draws: usize) {
        if draws <= self.draw_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        log::debug!("growing draw uniform buffer to {} slots", capacity);
        let (buffer, bind_group) =
            create_draw_buffer(&self.device, &self.draw_layout, self.draw_stride, capacity);
        self.draw_buffer = buffer;
        self.draw_bind_group = bind_group;
        self.draw_capacity = capacity;
    }

    fn bind_group_for(&self, unit: Option<usize>) -> &wgpu::BindGroup {
        unit.and_then(|unit| self.units.get(unit).copied().flatten())
            .and_then(|handle| self.textures.get(handle))
            .and_then(Option::as_ref)
            .map_or(&self.fallback.bind_group, |texture| &texture.bind_group)
    }

    /// Draw every queued command into `target` and clear the queue.
    pub fn render(
        &mut self,
        target: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        clear_colour: wgpu::Color,
    ) {
        let frame = FrameUniform::from_store(&self.uniforms);
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[frame]));

        self.ensure_draw_capacity(self.draws.len());
        if !self.draws.is_empty() {
            let stride = self.draw_stride as usize;
            let mut staging = vec![0u8; stride * self.draws.len()];
            for (slot, draw) in staging.chunks_exact_mut(stride).zip(&self.draws) {
                let bytes = bytemuck::bytes_of(&draw.uniform);
                slot[..bytes.len()].copy_from_slice(bytes);
            }
            self.queue.write_buffer(&self.draw_buffer, 0, &staging);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (index, draw) in self.draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&draw.primitive) else {
                    continue;
                };
                let offset = (index as u64 * self.draw_stride) as u32;
                render_pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                render_pass.set_bind_group(2, self.bind_group_for(draw.texture_unit), &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        self.draws.clear();
    }
}

fn create_draw_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Uniform Buffer"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
            }),
        }],
        label: Some("draw_bind_group"),
    });
    (buffer, bind_group)
}

impl ShaderUniforms for SceneRenderer {
    fn set_float(&mut self, name: &str, value: f32) {
        self.uniforms.set_float(name, value);
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.uniforms.set_int(name, value);
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.uniforms.set_bool(name, value);
    }

    fn set_vec2(&mut self, name: &str, value: cgmath::Vector2<f32>) {
        self.uniforms.set_vec2(name, value);
    }

    fn set_vec3(&mut self, name: &str, value: cgmath::Vector3<f32>) {
        self.uniforms.set_vec3(name, value);
    }

    fn set_vec4(&mut self, name: &str, value: cgmath::Vector4<f32>) {
        self.uniforms.set_vec4(name, value);
    }

    fn set_mat4(&mut self, name: &str, value: cgmath::Matrix4<f32>) {
        self.uniforms.set_mat4(name, value);
    }
}

impl MeshDrawer for SceneRenderer {
    fn load_mesh(&mut self, primitive: Primitive) {
        if self.meshes.contains_key(&primitive) {
            log::warn!("{:?} mesh already loaded", primitive);
            return;
        }
        let data = primitive.geometry();
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Vertex Buffer", primitive)),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Index Buffer", primitive)),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.meshes.insert(
            primitive,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                num_elements: data.indices.len() as u32,
            },
        );
    }

    fn draw_mesh(&mut self, primitive: Primitive) {
        if !self.meshes.contains_key(&primitive) {
            log::warn!("drawing {:?} before its mesh was loaded", primitive);
        }
        let texture_unit = if self.uniforms.bool(USE_TEXTURE) {
            usize::try_from(self.uniforms.int(OBJECT_TEXTURE)).ok()
        } else {
            None
        };
        self.draws.push(DrawCommand {
            primitive,
            texture_unit,
            uniform: DrawUniform::from_store(&self.uniforms),
        });
    }
}

impl TextureUploader for SceneRenderer {
    type Handle = usize;

    fn upload(&mut self, image: &DecodedImage, label: &str) -> TextureResult<usize> {
        let texture = Texture::from_decoded(&self.device, &self.queue, image, label)?;
        let bind_group = texture_bind_group(&self.device, &self.texture_layout, &texture, label);
        self.textures.push(Some(GpuTexture {
            texture,
            bind_group,
        }));
        Ok(self.textures.len() - 1)
    }

    fn bind(&mut self, unit: usize, handle: usize) {
        match self.units.get_mut(unit) {
            Some(slot) => *slot = Some(handle),
            None => log::warn!("texture unit {} out of range", unit),
        }
    }

    fn release(&mut self, handle: usize) {
        if let Some(gpu) = self.textures.get_mut(handle).and_then(Option::take) {
            gpu.texture.texture.destroy();
        }
        for slot in self.units.iter_mut() {
            if *slot == Some(handle) {
                *slot = None;
            }
        }
    }
}
