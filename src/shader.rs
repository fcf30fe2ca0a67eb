//! Named shader uniforms.
//!
//! The scene composer and the camera talk to the shader exclusively through
//! [`ShaderUniforms`]: values are pushed by name and the shader reads whatever
//! was pushed last. The names below are shared with `pipelines/scene.wgsl`
//! and must not change.
//!
//! [`UniformStore`] is the CPU-side copy of that state. The wgpu backend keeps
//! one and packs it into uniform buffers; tests use it to inspect exactly what
//! a draw would have seen.

use std::collections::HashMap;

use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3, Vector4, Zero};

pub const MODEL: &str = "model";
pub const VIEW: &str = "view";
pub const PROJECTION: &str = "projection";
pub const VIEW_POSITION: &str = "viewPosition";
pub const OBJECT_COLOR: &str = "objectColor";
pub const OBJECT_TEXTURE: &str = "objectTexture";
pub const USE_TEXTURE: &str = "bUseTexture";
pub const UV_SCALE: &str = "UVscale";

pub const MATERIAL_AMBIENT_COLOR: &str = "material.ambientColor";
pub const MATERIAL_AMBIENT_STRENGTH: &str = "material.ambientStrength";
pub const MATERIAL_DIFFUSE_COLOR: &str = "material.diffuseColor";
pub const MATERIAL_SPECULAR_COLOR: &str = "material.specularColor";
pub const MATERIAL_SHININESS: &str = "material.shininess";

pub const LIGHT_POSITION: &str = "light.position";
pub const LIGHT_DIRECTION: &str = "light.direction";
pub const LIGHT_CUT_OFF: &str = "light.cutOff";
pub const LIGHT_OUTER_CUT_OFF: &str = "light.outerCutOff";
pub const LIGHT_AMBIENT: &str = "light.ambient";
pub const LIGHT_DIFFUSE: &str = "light.diffuse";
pub const LIGHT_SPECULAR: &str = "light.specular";
pub const LIGHT_CONSTANT: &str = "light.constant";
pub const LIGHT_LINEAR: &str = "light.linear";
pub const LIGHT_QUADRATIC: &str = "light.quadratic";

pub const POINT_LIGHT_POSITION: &str = "pointLights[0].position";
pub const POINT_LIGHT_AMBIENT: &str = "pointLights[0].ambient";
pub const POINT_LIGHT_DIFFUSE: &str = "pointLights[0].diffuse";
pub const POINT_LIGHT_SPECULAR: &str = "pointLights[0].specular";
pub const POINT_LIGHT_CONSTANT: &str = "pointLights[0].constant";
pub const POINT_LIGHT_LINEAR: &str = "pointLights[0].linear";
pub const POINT_LIGHT_QUADRATIC: &str = "pointLights[0].quadratic";

/// By-name uniform upload into the active shader program.
pub trait ShaderUniforms {
    fn set_float(&mut self, name: &str, value: f32);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_vec2(&mut self, name: &str, value: Vector2<f32>);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
    fn set_vec4(&mut self, name: &str, value: Vector4<f32>);
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>);
}

/// A single uniform value as it was last pushed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Vec2(Vector2<f32>),
    Vec3(Vector3<f32>),
    Vec4(Vector4<f32>),
    Mat4(Matrix4<f32>),
}

/// Last-write-wins storage for named uniforms.
///
/// Getters fall back to a neutral value (zero, identity, `false`) when a
/// uniform was never pushed or was pushed with a different type, mirroring
/// how an unset GLSL uniform reads.
#[derive(Clone, Debug, Default)]
pub struct UniformStore {
    values: HashMap<String, UniformValue>,
}

impl UniformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn float(&self, name: &str) -> f32 {
        match self.values.get(name) {
            Some(UniformValue::Float(v)) => *v,
            _ => 0.0,
        }
    }

    /// Booleans pushed through `set_bool` read back as 0/1, like in GLSL.
    pub fn int(&self, name: &str) -> i32 {
        match self.values.get(name) {
            Some(UniformValue::Int(v)) => *v,
            Some(UniformValue::Bool(b)) => *b as i32,
            _ => 0,
        }
    }

    pub fn bool(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(UniformValue::Bool(b)) => *b,
            Some(UniformValue::Int(v)) => *v != 0,
            _ => false,
        }
    }

    pub fn vec2(&self, name: &str) -> Vector2<f32> {
        match self.values.get(name) {
            Some(UniformValue::Vec2(v)) => *v,
            _ => Vector2::zero(),
        }
    }

    pub fn vec3(&self, name: &str) -> Vector3<f32> {
        match self.values.get(name) {
            Some(UniformValue::Vec3(v)) => *v,
            _ => Vector3::zero(),
        }
    }

    pub fn vec4(&self, name: &str) -> Vector4<f32> {
        match self.values.get(name) {
            Some(UniformValue::Vec4(v)) => *v,
            _ => Vector4::zero(),
        }
    }

    pub fn mat4(&self, name: &str) -> Matrix4<f32> {
        match self.values.get(name) {
            Some(UniformValue::Mat4(m)) => *m,
            _ => Matrix4::identity(),
        }
    }

    fn insert(&mut self, name: &str, value: UniformValue) {
        log::trace!("uniform {} = {:?}", name, value);
        self.values.insert(name.to_string(), value);
    }
}

impl ShaderUniforms for UniformStore {
    fn set_float(&mut self, name: &str, value: f32) {
        self.insert(name, UniformValue::Float(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.insert(name, UniformValue::Int(value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.insert(name, UniformValue::Bool(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.insert(name, UniformValue::Vec2(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.insert(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.insert(name, UniformValue::Vec4(value));
    }

    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.insert(name, UniformValue::Mat4(value));
    }
}
