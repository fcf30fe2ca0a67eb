use std::path::PathBuf;

use reactor_viewer::{
    data_structures::primitive::Primitive,
    error::TextureResult,
    registry::TextureUploader,
    resources::texture::DecodedImage,
    scene::MeshDrawer,
    shader::{ShaderUniforms, UniformStore},
};

/// Everything the backend was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Uniform(String),
    LoadMesh(Primitive),
    Draw(Primitive),
    Upload(String),
    Bind(usize, u32),
    Release(u32),
}

/// Uniform state at the moment of a draw call.
#[derive(Debug, Clone)]
pub(crate) struct DrawSnapshot {
    pub primitive: Primitive,
    pub uniforms: UniformStore,
}

/// A graphics backend without a GPU.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub uniforms: UniformStore,
    pub calls: Vec<Call>,
    pub draws: Vec<DrawSnapshot>,
    next_handle: u32,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Upload(label) => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }

    /// Position of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }

    pub fn forget_calls(&mut self) {
        self.calls.clear();
        self.draws.clear();
    }

    fn uniform(&mut self, name: &str) {
        self.calls.push(Call::Uniform(name.to_string()));
    }
}

impl ShaderUniforms for Recorder {
    fn set_float(&mut self, name: &str, value: f32) {
        self.uniform(name);
        self.uniforms.set_float(name, value);
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.uniform(name);
        self.uniforms.set_int(name, value);
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.uniform(name);
        self.uniforms.set_bool(name, value);
    }

    fn set_vec2(&mut self, name: &str, value: cgmath::Vector2<f32>) {
        self.uniform(name);
        self.uniforms.set_vec2(name, value);
    }

    fn set_vec3(&mut self, name: &str, value: cgmath::Vector3<f32>) {
        self.uniform(name);
        self.uniforms.set_vec3(name, value);
    }

    fn set_vec4(&mut self, name: &str, value: cgmath::Vector4<f32>) {
        self.uniform(name);
        self.uniforms.set_vec4(name, value);
    }

    fn set_mat4(&mut self, name: &str, value: cgmath::Matrix4<f32>) {
        self.uniform(name);
        self.uniforms.set_mat4(name, value);
    }
}

impl MeshDrawer for Recorder {
    fn load_mesh(&mut self, primitive: Primitive) {
        self.calls.push(Call::LoadMesh(primitive));
    }

    fn draw_mesh(&mut self, primitive: Primitive) {
        self.calls.push(Call::Draw(primitive));
        self.draws.push(DrawSnapshot {
            primitive,
            uniforms: self.uniforms.clone(),
        });
    }
}

impl TextureUploader for Recorder {
    type Handle = u32;

    fn upload(&mut self, _image: &DecodedImage, label: &str) -> TextureResult<u32> {
        self.calls.push(Call::Upload(label.to_string()));
        self.next_handle += 1;
        Ok(self.next_handle)
    }

    fn bind(&mut self, unit: usize, handle: u32) {
        self.calls.push(Call::Bind(unit, handle));
    }

    fn release(&mut self, handle: u32) {
        self.calls.push(Call::Release(handle));
    }
}

pub(crate) fn asset_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}
