//! Scene data types.
//!
//! - `primitive` holds the four procedural meshes and their vertex layout
//! - `material` holds Phong surface parameters
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod material;
pub mod primitive;
pub mod texture;
