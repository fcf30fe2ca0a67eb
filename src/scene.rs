//! The demo scene: a reactor and a helmet on a wooden placard.
//!
//! [`SceneComposer`] loads the scene's textures and materials once and then
//! replays [`DEMO_SCENE`] every frame. Each [`DrawInstruction`] becomes a
//! model transform, an optional material, a fill, optional UV tiling and one
//! draw call, all pushed through [`ShaderUniforms`] and [`MeshDrawer`].
//!
//! Uniforms behave like GPU program state: whatever an instruction does not
//! push is inherited from the previous draw. The reactor's middle ring relies
//! on this for its UV tiling.

use std::{
    fmt::Debug,
    path::{Path, PathBuf},
};

use cgmath::{Deg, Matrix4, Vector2, Vector3, Vector4};

use crate::{
    data_structures::{material::Material, primitive::Primitive},
    registry::{MaterialRegistry, TextureRegistry, TextureUploader},
    shader::{MODEL, OBJECT_COLOR, OBJECT_TEXTURE, ShaderUniforms, USE_TEXTURE, UV_SCALE},
};

/// Geometry side of the graphics backend.
pub trait MeshDrawer {
    /// Upload the primitive's geometry. Called once per primitive.
    fn load_mesh(&mut self, primitive: Primitive);
    /// Draw the primitive with the uniforms pushed so far.
    fn draw_mesh(&mut self, primitive: Primitive);
}

/// Texture files the scene needs, relative to the asset root, and their tags.
pub const TEXTURE_MANIFEST: [(&str, &str); 3] = [
    ("textures/reactor_diffuse.png", "reactor_tex"),
    ("textures/darkwood.png", "darkwood"),
    ("textures/backplate.png", "backplate"),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    Color([f32; 4]),
    Texture(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawInstruction {
    pub name: &'static str,
    pub primitive: Primitive,
    pub scale: [f32; 3],
    /// X, Y and Z rotation in degrees, applied in that order.
    pub rotation: [f32; 3],
    pub position: [f32; 3],
    pub fill: Fill,
    pub tiling: Option<[f32; 2]>,
    pub material: Option<&'static str>,
}

const NO_ROTATION: [f32; 3] = [0.0, 0.0, 0.0];
const RED: [f32; 4] = [0.8, 0.0, 0.0, 1.0];

pub const DEMO_SCENE: &[DrawInstruction] = &[
    DrawInstruction {
        name: "floor",
        primitive: Primitive::Plane,
        scale: [20.0, 1.0, 10.0],
        rotation: NO_ROTATION,
        position: [0.0, 0.0, 0.0],
        fill: Fill::Color([1.0, 1.0, 1.0, 1.0]),
        tiling: None,
        material: Some("floor"),
    },
    DrawInstruction {
        // own transform, an earlier layout drew a unit box at the origin here
        name: "placard base",
        primitive: Primitive::Box,
        scale: [2.0, 0.3, 1.0],
        rotation: NO_ROTATION,
        position: [0.0, 0.5, -1.0],
        fill: Fill::Texture("darkwood"),
        tiling: Some([2.0, 2.0]),
        material: Some("wood"),
    },
    DrawInstruction {
        // own transform, an earlier layout drew a unit box at (0, 0, 2) here
        name: "back panel",
        primitive: Primitive::Box,
        scale: [2.0, 2.0, 0.1],
        rotation: NO_ROTATION,
        position: [0.0, 1.4, -0.2],
        fill: Fill::Texture("backplate"),
        tiling: Some([2.0, 2.0]),
        material: Some("plastic"),
    },
    DrawInstruction {
        name: "name plate",
        primitive: Primitive::Box,
        scale: [1.2, 0.3, 0.05],
        rotation: NO_ROTATION,
        position: [0.0, 1.0, -0.1],
        fill: Fill::Color([1.0, 0.0, 0.0, 1.0]),
        tiling: None,
        material: Some("plastic"),
    },
    DrawInstruction {
        name: "reactor stand",
        primitive: Primitive::Cylinder,
        scale: [1.2, 0.1, 1.2],
        rotation: NO_ROTATION,
        position: [1.1, 0.1, 1.8],
        fill: Fill::Color([0.36, 0.25, 0.2, 1.0]),
        tiling: None,
        material: Some("metal"),
    },
    DrawInstruction {
        name: "reactor ring",
        primitive: Primitive::Cylinder,
        scale: [1.0, 0.15, 1.0],
        rotation: NO_ROTATION,
        position: [1.1, 0.2, 1.8],
        fill: Fill::Texture("reactor_tex"),
        tiling: None,
        material: Some("metal"),
    },
    DrawInstruction {
        name: "reactor collar",
        primitive: Primitive::Cylinder,
        scale: [0.7, 0.2, 0.7],
        rotation: NO_ROTATION,
        position: [1.1, 0.3, 1.8],
        fill: Fill::Color([0.3, 0.3, 0.3, 1.0]),
        tiling: None,
        material: Some("metal"),
    },
    DrawInstruction {
        name: "plasma core",
        primitive: Primitive::Sphere,
        scale: [0.35, 0.35, 0.35],
        rotation: NO_ROTATION,
        position: [1.1, 0.5, 1.8],
        fill: Fill::Color([0.0, 0.8, 1.0, 1.0]),
        tiling: None,
        material: Some("glass"),
    },
    DrawInstruction {
        name: "helmet dome",
        primitive: Primitive::Sphere,
        scale: [0.3, 0.25, 0.3],
        rotation: NO_ROTATION,
        position: [1.6, 0.45, 0.4],
        fill: Fill::Color(RED),
        tiling: None,
        material: Some("plastic"),
    },
    DrawInstruction {
        name: "faceplate",
        primitive: Primitive::Box,
        scale: [0.2, 0.25, 0.01],
        rotation: NO_ROTATION,
        position: [1.6, 0.46, 0.69],
        fill: Fill::Color([0.83, 0.69, 0.22, 1.0]),
        tiling: None,
        material: Some("gold"),
    },
    DrawInstruction {
        name: "right side panel",
        primitive: Primitive::Box,
        scale: [0.05, 0.2, 0.2],
        rotation: NO_ROTATION,
        position: [1.8, 0.46, 0.4],
        fill: Fill::Color(RED),
        tiling: None,
        material: Some("plastic"),
    },
    DrawInstruction {
        name: "left side panel",
        primitive: Primitive::Box,
        scale: [0.05, 0.2, 0.2],
        rotation: NO_ROTATION,
        position: [1.4, 0.46, 0.4],
        fill: Fill::Color(RED),
        tiling: None,
        material: Some("plastic"),
    },
    DrawInstruction {
        name: "jaw guard",
        primitive: Primitive::Cylinder,
        scale: [0.2, 0.05, 0.2],
        rotation: [90.0, 0.0, 0.0],
        position: [1.65, 0.3, 0.55],
        fill: Fill::Color([0.2, 0.2, 0.2, 1.0]),
        tiling: None,
        material: Some("metal"),
    },
];

/// Lighting materials referenced by [`DEMO_SCENE`].
pub fn scene_materials() -> Vec<Material> {
    vec![
        Material::new("floor", [0.5, 0.5, 0.5], 0.2, [0.7, 0.7, 0.7], [0.2, 0.2, 0.2], 8.0),
        Material::new("wood", [0.4, 0.3, 0.1], 0.3, [0.8, 0.7, 0.6], [0.1, 0.1, 0.1], 4.0),
        Material::new("metal", [0.3, 0.3, 0.3], 0.3, [0.8, 0.8, 0.8], [0.9, 0.9, 0.9], 64.0),
        Material::new("gold", [0.4, 0.3, 0.1], 0.4, [1.0, 0.85, 0.5], [1.0, 0.9, 0.6], 51.2),
        Material::new("plastic", [0.2, 0.2, 0.2], 0.3, [0.9, 0.9, 0.9], [0.5, 0.5, 0.5], 32.0),
        Material::new("glass", [0.6, 0.9, 1.0], 0.6, [1.0, 1.0, 1.0], [1.0, 1.0, 1.0], 128.0),
    ]
}

/// `T * Rx * Ry * Rz * S`, rotations in degrees.
pub fn model_matrix(
    scale: Vector3<f32>,
    x_rotation_degrees: f32,
    y_rotation_degrees: f32,
    z_rotation_degrees: f32,
    position: Vector3<f32>,
) -> Matrix4<f32> {
    Matrix4::from_translation(position)
        * Matrix4::from_angle_x(Deg(x_rotation_degrees))
        * Matrix4::from_angle_y(Deg(y_rotation_degrees))
        * Matrix4::from_angle_z(Deg(z_rotation_degrees))
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}

pub fn set_transform(
    shader: &mut impl ShaderUniforms,
    scale: Vector3<f32>,
    x_rotation_degrees: f32,
    y_rotation_degrees: f32,
    z_rotation_degrees: f32,
    position: Vector3<f32>,
) {
    shader.set_mat4(
        MODEL,
        model_matrix(
            scale,
            x_rotation_degrees,
            y_rotation_degrees,
            z_rotation_degrees,
            position,
        ),
    );
}

pub fn set_flat_color(shader: &mut impl ShaderUniforms, r: f32, g: f32, b: f32, a: f32) {
    shader.set_bool(USE_TEXTURE, false);
    shader.set_vec4(OBJECT_COLOR, Vector4::new(r, g, b, a));
}

pub fn set_texture_tiling(shader: &mut impl ShaderUniforms, u: f32, v: f32) {
    shader.set_vec2(UV_SCALE, Vector2::new(u, v));
}

#[derive(Debug)]
pub struct SceneComposer<H> {
    manifest: Vec<(PathBuf, String)>,
    textures: TextureRegistry<H>,
    materials: MaterialRegistry,
    loaded: bool,
}

impl<H: Copy + Debug> SceneComposer<H> {
    /// Composer for the demo scene with textures under `asset_root`.
    pub fn new(asset_root: &Path) -> Self {
        Self::with_manifest(
            TEXTURE_MANIFEST
                .iter()
                .map(|(path, tag)| (asset_root.join(path), tag.to_string()))
                .collect(),
        )
    }

    pub fn with_manifest(manifest: Vec<(PathBuf, String)>) -> Self {
        Self {
            manifest,
            textures: TextureRegistry::new(),
            materials: MaterialRegistry::new(),
            loaded: false,
        }
    }

    pub fn textures(&self) -> &TextureRegistry<H> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Register textures and materials, bind the textures and upload every
    /// primitive mesh.
    ///
    /// A texture that fails to load is skipped; draws using its tag then
    /// sample the unresolved unit. Only the first call does anything.
    pub fn load_scene<B>(&mut self, backend: &mut B)
    where
        B: TextureUploader<Handle = H> + MeshDrawer,
    {
        if self.loaded {
            log::warn!("scene already loaded, ignoring load request");
            return;
        }

        for (path, tag) in &self.manifest {
            // failures are logged by the registry
            let _ = self.textures.register_texture(backend, path, tag);
        }
        self.textures.bind_all_textures(backend);

        for material in scene_materials() {
            self.materials.register_material(material);
        }

        for primitive in Primitive::ALL {
            backend.load_mesh(primitive);
        }

        log::info!(
            "scene loaded: {}/{} textures, {} materials",
            self.textures.len(),
            self.manifest.len(),
            self.materials.len()
        );
        self.loaded = true;
    }

    /// Select the texture registered as `tag`. An unknown tag selects unit -1.
    pub fn set_texture(&self, shader: &mut impl ShaderUniforms, tag: &str) {
        let unit = self
            .textures
            .find_texture_unit(tag)
            .map_or(-1, |unit| unit as i32);
        shader.set_bool(USE_TEXTURE, true);
        shader.set_int(OBJECT_TEXTURE, unit);
    }

    /// Push the material registered as `tag`. An unknown tag leaves the
    /// material uniforms as they were.
    pub fn set_material(&self, shader: &mut impl ShaderUniforms, tag: &str) {
        if let Some(material) = self.materials.find_material(tag) {
            material.apply(shader);
        }
    }

    pub fn draw(&self, backend: &mut (impl ShaderUniforms + MeshDrawer), instruction: &DrawInstruction) {
        let [rx, ry, rz] = instruction.rotation;
        set_transform(
            backend,
            instruction.scale.into(),
            rx,
            ry,
            rz,
            instruction.position.into(),
        );
        if let Some(tag) = instruction.material {
            self.set_material(backend, tag);
        }
        match instruction.fill {
            Fill::Color([r, g, b, a]) => set_flat_color(backend, r, g, b, a),
            Fill::Texture(tag) => self.set_texture(backend, tag),
        }
        if let Some([u, v]) = instruction.tiling {
            set_texture_tiling(backend, u, v);
        }
        log::trace!("draw {}", instruction.name);
        backend.draw_mesh(instruction.primitive);
    }

    /// Replay the whole demo scene.
    pub fn render_scene(&self, backend: &mut (impl ShaderUniforms + MeshDrawer)) {
        for instruction in DEMO_SCENE {
            self.draw(backend, instruction);
        }
    }

    /// Release the scene's textures. The scene can be loaded again afterwards.
    pub fn destroy<B>(&mut self, backend: &mut B)
    where
        B: TextureUploader<Handle = H>,
    {
        self.textures.destroy_textures(backend);
        self.materials = MaterialRegistry::new();
        self.loaded = false;
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Matrix, SquareMatrix};

    use super::*;
    use crate::shader::{MATERIAL_SHININESS, UniformStore};

    fn close(a: Matrix4<f32>, b: Matrix4<f32>) -> bool {
        let a: [[f32; 4]; 4] = a.into();
        let b: [[f32; 4]; 4] = b.into();
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn transform_is_translate_rotate_scale() {
        let mut store = UniformStore::new();
        set_transform(
            &mut store,
            Vector3::new(2.0, 1.0, 1.0),
            0.0,
            90.0,
            0.0,
            Vector3::new(1.0, 0.0, 0.0),
        );

        let expected = Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0))
            * Matrix4::from_angle_y(Deg(90.0))
            * Matrix4::from_nonuniform_scale(2.0, 1.0, 1.0);
        assert!(close(store.mat4(MODEL), expected));

        // the scaled x axis ends up pointing down -z
        let x_axis = store.mat4(MODEL).x.truncate();
        assert!((x_axis - Vector3::new(0.0, 0.0, -2.0)).magnitude() < 1e-5);
        assert_eq!(store.mat4(MODEL).w.truncate(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn rotations_apply_x_then_y_then_z() {
        let m = model_matrix(Vector3::new(1.0, 1.0, 1.0), 10.0, 20.0, 30.0, Vector3::new(0.0, 0.0, 0.0));
        let expected = Matrix4::from_angle_x(Deg(10.0))
            * Matrix4::from_angle_y(Deg(20.0))
            * Matrix4::from_angle_z(Deg(30.0));
        assert!(close(m, expected));
        // pure rotation
        assert!(close(m * m.transpose(), Matrix4::identity()));
    }

    #[test]
    fn flat_color_disables_texturing() {
        let mut store = UniformStore::new();
        store.set_bool(USE_TEXTURE, true);
        set_flat_color(&mut store, 0.1, 0.2, 0.3, 0.4);
        assert!(!store.bool(USE_TEXTURE));
        assert_eq!(store.vec4(OBJECT_COLOR), Vector4::new(0.1, 0.2, 0.3, 0.4));
    }

    #[test]
    fn tiling_pushes_uv_scale() {
        let mut store = UniformStore::new();
        set_texture_tiling(&mut store, 2.0, 3.0);
        assert_eq!(store.vec2(UV_SCALE), Vector2::new(2.0, 3.0));
    }

    #[test]
    fn unknown_texture_selects_unit_minus_one() {
        let composer = SceneComposer::<u32>::with_manifest(Vec::new());
        let mut store = UniformStore::new();
        composer.set_texture(&mut store, "missing");
        assert!(store.bool(USE_TEXTURE));
        assert_eq!(store.int(OBJECT_TEXTURE), -1);
    }

    #[test]
    fn unknown_material_leaves_uniforms_alone() {
        let mut composer = SceneComposer::<u32>::with_manifest(Vec::new());
        composer.materials.register_material(scene_materials().remove(0));
        let mut store = UniformStore::new();
        store.set_float(MATERIAL_SHININESS, 7.0);

        composer.set_material(&mut store, "missing");
        assert_eq!(store.float(MATERIAL_SHININESS), 7.0);
        assert_eq!(store.len(), 1);

        composer.set_material(&mut store, "floor");
        assert_eq!(store.float(MATERIAL_SHININESS), 8.0);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn demo_scene_references_known_resources() {
        let materials = scene_materials();
        for instruction in DEMO_SCENE {
            if let Some(tag) = instruction.material {
                assert!(
                    materials.iter().any(|m| m.tag == tag),
                    "{} uses unknown material {}",
                    instruction.name,
                    tag
                );
            }
            if let Fill::Texture(tag) = instruction.fill {
                assert!(TEXTURE_MANIFEST.iter().any(|(_, t)| *t == tag));
            }
        }
        assert_eq!(DEMO_SCENE.len(), 13);
    }

    #[test]
    fn textured_draws_always_have_tiling_in_effect() {
        let mut tiling = None;
        for instruction in DEMO_SCENE {
            tiling = instruction.tiling.or(tiling);
            if let Fill::Texture(_) = instruction.fill {
                assert_eq!(tiling, Some([2.0, 2.0]), "{}", instruction.name);
            }
        }
    }
}
