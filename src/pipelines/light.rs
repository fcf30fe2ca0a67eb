//! Scene lighting: a camera-mounted spotlight and one coloured point light.
//!
//! [`push_lighting`] writes both lights by uniform name; the `*Uniform` structs
//! are their packed GPU layout, read back out of a [`UniformStore`].

use cgmath::Vector3;

use crate::{camera::Camera, shader::*};

/// Light attenuation `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

pub const ATTENUATION: Attenuation = Attenuation {
    constant: 1.0,
    linear: 0.09,
    quadratic: 0.032,
};

/// Inner and outer cone half angles in degrees.
pub const SPOT_CUT_OFF_DEG: f32 = 12.5;
pub const SPOT_OUTER_CUT_OFF_DEG: f32 = 15.0;
pub const SPOT_AMBIENT: f32 = 0.1;
pub const SPOT_DIFFUSE: f32 = 0.8;
pub const SPOT_SPECULAR: f32 = 1.0;

pub const POINT_LIGHT_POSITION_WS: [f32; 3] = [2.0, 2.0, 2.0];
pub const POINT_AMBIENT: [f32; 3] = [0.2, 0.0, 0.2];
pub const POINT_DIFFUSE: [f32; 3] = [0.5, 0.0, 0.5];
pub const POINT_SPECULAR: [f32; 3] = [0.8, 0.0, 0.8];

fn splat(v: f32) -> Vector3<f32> {
    Vector3::new(v, v, v)
}

/// Push the spotlight (following the camera) and the point light.
pub fn push_lighting(shader: &mut impl ShaderUniforms, camera: &Camera) {
    shader.set_vec3(
        LIGHT_POSITION,
        Vector3::new(camera.position.x, camera.position.y, camera.position.z),
    );
    shader.set_vec3(LIGHT_DIRECTION, camera.front);
    shader.set_float(LIGHT_CUT_OFF, SPOT_CUT_OFF_DEG.to_radians().cos());
    shader.set_float(LIGHT_OUTER_CUT_OFF, SPOT_OUTER_CUT_OFF_DEG.to_radians().cos());
    shader.set_vec3(LIGHT_AMBIENT, splat(SPOT_AMBIENT));
    shader.set_vec3(LIGHT_DIFFUSE, splat(SPOT_DIFFUSE));
    shader.set_vec3(LIGHT_SPECULAR, splat(SPOT_SPECULAR));
    shader.set_float(LIGHT_CONSTANT, ATTENUATION.constant);
    shader.set_float(LIGHT_LINEAR, ATTENUATION.linear);
    shader.set_float(LIGHT_QUADRATIC, ATTENUATION.quadratic);

    shader.set_vec3(POINT_LIGHT_POSITION, POINT_LIGHT_POSITION_WS.into());
    shader.set_vec3(POINT_LIGHT_AMBIENT, POINT_AMBIENT.into());
    shader.set_vec3(POINT_LIGHT_DIFFUSE, POINT_DIFFUSE.into());
    shader.set_vec3(POINT_LIGHT_SPECULAR, POINT_SPECULAR.into());
    shader.set_float(POINT_LIGHT_CONSTANT, ATTENUATION.constant);
    shader.set_float(POINT_LIGHT_LINEAR, ATTENUATION.linear);
    shader.set_float(POINT_LIGHT_QUADRATIC, ATTENUATION.quadratic);
}

// vec3 fields are 16-byte aligned in WGSL, so each scalar rides in the
// trailing slot of the vec3 before it.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightUniform {
    pub position: [f32; 3],
    pub cut_off: f32,
    pub direction: [f32; 3],
    pub outer_cut_off: f32,
    pub ambient: [f32; 3],
    pub constant: f32,
    pub diffuse: [f32; 3],
    pub linear: f32,
    pub specular: [f32; 3],
    pub quadratic: f32,
}

impl SpotLightUniform {
    pub fn from_store(store: &UniformStore) -> Self {
        Self {
            position: store.vec3(LIGHT_POSITION).into(),
            cut_off: store.float(LIGHT_CUT_OFF),
            direction: store.vec3(LIGHT_DIRECTION).into(),
            outer_cut_off: store.float(LIGHT_OUTER_CUT_OFF),
            ambient: store.vec3(LIGHT_AMBIENT).into(),
            constant: store.float(LIGHT_CONSTANT),
            diffuse: store.vec3(LIGHT_DIFFUSE).into(),
            linear: store.float(LIGHT_LINEAR),
            specular: store.vec3(LIGHT_SPECULAR).into(),
            quadratic: store.float(LIGHT_QUADRATIC),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 3],
    pub constant: f32,
    pub ambient: [f32; 3],
    pub linear: f32,
    pub diffuse: [f32; 3],
    pub quadratic: f32,
    pub specular: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
}

impl PointLightUniform {
    pub fn from_store(store: &UniformStore) -> Self {
        Self {
            position: store.vec3(POINT_LIGHT_POSITION).into(),
            constant: store.float(POINT_LIGHT_CONSTANT),
            ambient: store.vec3(POINT_LIGHT_AMBIENT).into(),
            linear: store.float(POINT_LIGHT_LINEAR),
            diffuse: store.vec3(POINT_LIGHT_DIFFUSE).into(),
            quadratic: store.float(POINT_LIGHT_QUADRATIC),
            specular: store.vec3(POINT_LIGHT_SPECULAR).into(),
            _padding: 0,
        }
    }
}
