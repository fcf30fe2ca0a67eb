//! The four primitive shapes the scene is built from.
//!
//! Every shape is centred on the origin and fits the unit cube, except the
//! plane which lies flat in XZ spanning [-1, 1] and the cylinder which stands
//! on the origin and rises to `y = 1`. Scale them into place with a model
//! matrix.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

const SPHERE_STACKS: u32 = 20;
const SPHERE_SLICES: u32 = 30;
const CYLINDER_SLICES: u32 = 36;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Box,
    Plane,
    Sphere,
    Cylinder,
}

impl Primitive {
    pub const ALL: [Primitive; 4] = [
        Primitive::Box,
        Primitive::Plane,
        Primitive::Sphere,
        Primitive::Cylinder,
    ];

    pub fn geometry(self) -> MeshData {
        match self {
            Primitive::Box => box_mesh(),
            Primitive::Plane => plane_mesh(),
            Primitive::Sphere => sphere_mesh(SPHERE_STACKS, SPHERE_SLICES),
            Primitive::Cylinder => cylinder_mesh(CYLINDER_SLICES),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn vertex(&mut self, position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> u32 {
        self.vertices.push(MeshVertex {
            position,
            normal,
            tex_coords,
        });
        self.vertices.len() as u32 - 1
    }

    /// Add a quad from four corners in counter-clockwise order.
    fn quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let base = self.vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertex(corner, normal, uv);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

fn box_mesh() -> MeshData {
    let mut mesh = MeshData::default();
    let h = 0.5;
    // +Z, -Z, +X, -X, +Y, -Y
    mesh.quad([[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]], [0.0, 0.0, 1.0]);
    mesh.quad([[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]], [0.0, 0.0, -1.0]);
    mesh.quad([[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]], [1.0, 0.0, 0.0]);
    mesh.quad([[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]], [-1.0, 0.0, 0.0]);
    mesh.quad([[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]], [0.0, 1.0, 0.0]);
    mesh.quad([[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]], [0.0, -1.0, 0.0]);
    mesh
}

fn plane_mesh() -> MeshData {
    let mut mesh = MeshData::default();
    mesh.quad(
        [[-1.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 0.0, -1.0], [-1.0, 0.0, -1.0]],
        [0.0, 1.0, 0.0],
    );
    mesh
}

fn sphere_mesh(stacks: u32, slices: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let radius = 0.5;
    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let phi = PI * v;
        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let theta = TAU * u;
            let normal = [
                phi.sin() * theta.cos(),
                -phi.cos(),
                phi.sin() * theta.sin(),
            ];
            mesh.vertex(
                [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
                [u, v],
            );
        }
    }
    let row = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * row + slice;
            let b = a + row;
            mesh.indices
                .extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    mesh
}

fn cylinder_mesh(slices: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let radius = 1.0;

    // side
    let side_start = mesh.vertices.len() as u32;
    for slice in 0..=slices {
        let u = slice as f32 / slices as f32;
        let theta = TAU * u;
        let (x, z) = (theta.cos(), theta.sin());
        mesh.vertex([x * radius, 0.0, z * radius], [x, 0.0, z], [u, 0.0]);
        mesh.vertex([x * radius, 1.0, z * radius], [x, 0.0, z], [u, 1.0]);
    }
    for slice in 0..slices {
        let a = side_start + slice * 2;
        mesh.indices
            .extend_from_slice(&[a, a + 1, a + 2, a + 2, a + 1, a + 3]);
    }

    // caps
    for (y, normal_y) in [(0.0, -1.0), (1.0, 1.0)] {
        let centre = mesh.vertex([0.0, y, 0.0], [0.0, normal_y, 0.0], [0.5, 0.5]);
        let rim_start = mesh.vertices.len() as u32;
        for slice in 0..=slices {
            let theta = TAU * slice as f32 / slices as f32;
            let (x, z) = (theta.cos(), theta.sin());
            mesh.vertex(
                [x * radius, y, z * radius],
                [0.0, normal_y, 0.0],
                [0.5 + 0.5 * x, 0.5 + 0.5 * z],
            );
        }
        for slice in 0..slices {
            let a = rim_start + slice;
            if normal_y > 0.0 {
                mesh.indices.extend_from_slice(&[centre, a + 1, a]);
            } else {
                mesh.indices.extend_from_slice(&[centre, a, a + 1]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(mesh: &MeshData) {
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        for v in &mesh.vertices {
            let n = v.normal;
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-4, "normal {:?} is not unit length", n);
        }
    }

    #[test]
    fn all_primitives_are_well_formed() {
        for primitive in Primitive::ALL {
            assert_valid(&primitive.geometry());
        }
    }

    #[test]
    fn box_has_six_faces() {
        let mesh = Primitive::Box.geometry();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.position.iter().all(|c| c.abs() == 0.5)));
    }

    #[test]
    fn plane_faces_up() {
        let mesh = Primitive::Plane.geometry();
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(mesh.vertices.iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn sphere_fits_the_unit_cube() {
        let mesh = Primitive::Sphere.geometry();
        for v in &mesh.vertices {
            let p = v.position;
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((r - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn cylinder_stands_on_the_origin() {
        let mesh = Primitive::Cylinder.geometry();
        let (min, max) = mesh
            .vertices
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), v| {
                (lo.min(v.position[1]), hi.max(v.position[1]))
            });
        assert_eq!((min, max), (0.0, 1.0));
    }
}
