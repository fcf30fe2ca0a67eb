//! reactor-viewer
//!
//! A first-person viewer for a small hand-composed scene: a reactor and a
//! helmet on a wooden placard, lit by a camera-mounted spotlight and one
//! coloured point light.
//!
//! The scene and camera logic only talk to the GPU through three traits,
//! [`shader::ShaderUniforms`], [`scene::MeshDrawer`] and
//! [`registry::TextureUploader`], so it runs unchanged against the wgpu
//! backend in [`render`] or a recording fake in tests.
//!
//! High-level modules
//! - `camera`: fly camera, its input controller and view/projection matrices
//! - `config`: viewer settings and logger initialisation
//! - `context`: window surface and GPU device
//! - `data_structures`: primitive meshes, materials, GPU textures
//! - `flow`: the winit application loop
//! - `input`: held-key tracking
//! - `pipelines`: lighting, uniform layouts and the render pipeline
//! - `registry`: texture and material lookup tables
//! - `render`: the wgpu backend
//! - `resources`: image decoding
//! - `scene`: the demo scene and its composer
//! - `shader`: named uniforms

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod input;
pub mod pipelines;
pub mod registry;
pub mod render;
pub mod resources;
pub mod scene;
pub mod shader;

pub use config::ViewerConfig;
pub use flow::run;
