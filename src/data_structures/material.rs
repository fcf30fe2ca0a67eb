//! Phong material parameters.

use cgmath::Vector3;

use crate::shader::{
    MATERIAL_AMBIENT_COLOR, MATERIAL_AMBIENT_STRENGTH, MATERIAL_DIFFUSE_COLOR,
    MATERIAL_SHININESS, MATERIAL_SPECULAR_COLOR, ShaderUniforms,
};

/// Surface response to light, looked up by `tag`.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub tag: String,
    pub ambient_color: Vector3<f32>,
    pub ambient_strength: f32,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl Material {
    pub fn new(
        tag: &str,
        ambient_color: [f32; 3],
        ambient_strength: f32,
        diffuse_color: [f32; 3],
        specular_color: [f32; 3],
        shininess: f32,
    ) -> Self {
        Self {
            tag: tag.to_string(),
            ambient_color: ambient_color.into(),
            ambient_strength,
            diffuse_color: diffuse_color.into(),
            specular_color: specular_color.into(),
            shininess,
        }
    }

    /// Push the five `material.*` uniforms.
    pub fn apply(&self, shader: &mut impl ShaderUniforms) {
        shader.set_vec3(MATERIAL_AMBIENT_COLOR, self.ambient_color);
        shader.set_float(MATERIAL_AMBIENT_STRENGTH, self.ambient_strength);
        shader.set_vec3(MATERIAL_DIFFUSE_COLOR, self.diffuse_color);
        shader.set_vec3(MATERIAL_SPECULAR_COLOR, self.specular_color);
        shader.set_float(MATERIAL_SHININESS, self.shininess);
    }
}
