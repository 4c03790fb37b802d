//! Mesh data structures and primitive generation.

use std::f32::consts::TAU;

use crate::vertex::Vertex;
use engine_core::Shape;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

/// CPU-side geometry ready for upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Unit cube centered at origin.
    pub fn cube() -> Self {
        let vertices = vec![
            // Front face
            Vertex::new([-0.5, -0.5, 0.5], [0.0, 0.0, 1.0]),
            Vertex::new([0.5, -0.5, 0.5], [0.0, 0.0, 1.0]),
            Vertex::new([0.5, 0.5, 0.5], [0.0, 0.0, 1.0]),
            Vertex::new([-0.5, 0.5, 0.5], [0.0, 0.0, 1.0]),
            // Back face
            Vertex::new([0.5, -0.5, -0.5], [0.0, 0.0, -1.0]),
            Vertex::new([-0.5, -0.5, -0.5], [0.0, 0.0, -1.0]),
            Vertex::new([-0.5, 0.5, -0.5], [0.0, 0.0, -1.0]),
            Vertex::new([0.5, 0.5, -0.5], [0.0, 0.0, -1.0]),
            // Top face
            Vertex::new([-0.5, 0.5, 0.5], [0.0, 1.0, 0.0]),
            Vertex::new([0.5, 0.5, 0.5], [0.0, 1.0, 0.0]),
            Vertex::new([0.5, 0.5, -0.5], [0.0, 1.0, 0.0]),
            Vertex::new([-0.5, 0.5, -0.5], [0.0, 1.0, 0.0]),
            // Bottom face
            Vertex::new([-0.5, -0.5, -0.5], [0.0, -1.0, 0.0]),
            Vertex::new([0.5, -0.5, -0.5], [0.0, -1.0, 0.0]),
            Vertex::new([0.5, -0.5, 0.5], [0.0, -1.0, 0.0]),
            Vertex::new([-0.5, -0.5, 0.5], [0.0, -1.0, 0.0]),
            // Right face
            Vertex::new([0.5, -0.5, 0.5], [1.0, 0.0, 0.0]),
            Vertex::new([0.5, -0.5, -0.5], [1.0, 0.0, 0.0]),
            Vertex::new([0.5, 0.5, -0.5], [1.0, 0.0, 0.0]),
            Vertex::new([0.5, 0.5, 0.5], [1.0, 0.0, 0.0]),
            // Left face
            Vertex::new([-0.5, -0.5, -0.5], [-1.0, 0.0, 0.0]),
            Vertex::new([-0.5, -0.5, 0.5], [-1.0, 0.0, 0.0]),
            Vertex::new([-0.5, 0.5, 0.5], [-1.0, 0.0, 0.0]),
            Vertex::new([-0.5, 0.5, -0.5], [-1.0, 0.0, 0.0]),
        ];

        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 2, 3, 0,       // Front
            4, 5, 6, 6, 7, 4,       // Back
            8, 9, 10, 10, 11, 8,   // Top
            12, 13, 14, 14, 15, 12, // Bottom
            16, 17, 18, 18, 19, 16, // Right
            20, 21, 22, 22, 23, 20, // Left
        ];

        Self { vertices, indices }
    }

    /// Unit square in the XY plane facing +Z.
    pub fn plane() -> Self {
        let n = [0.0, 0.0, 1.0];
        Self {
            vertices: vec![
                Vertex::new([-0.5, -0.5, 0.0], n),
                Vertex::new([0.5, -0.5, 0.0], n),
                Vertex::new([0.5, 0.5, 0.0], n),
                Vertex::new([-0.5, 0.5, 0.0], n),
            ],
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }

    /// Unit-radius disc in the XY plane facing +Z.
    pub fn disc(segments: u32) -> Self {
        let segments = segments.max(3);
        let n = [0.0, 0.0, 1.0];
        let mut vertices = vec![Vertex::new([0.0, 0.0, 0.0], n)];
        for i in 0..=segments {
            let a = i as f32 / segments as f32 * TAU;
            vertices.push(Vertex::new([a.cos(), a.sin(), 0.0], n));
        }
        let indices = (0..segments).flat_map(|i| [0, i + 1, i + 2]).collect();
        Self { vertices, indices }
    }

    /// Unit-radius UV sphere.
    pub fn sphere(segments: u32) -> Self {
        let sectors = segments.max(3);
        let rings = (segments / 2).max(2);
        let mut vertices = Vec::with_capacity(((rings + 1) * (sectors + 1)) as usize);
        for r in 0..=rings {
            let phi = r as f32 / rings as f32 * std::f32::consts::PI;
            for s in 0..=sectors {
                let theta = s as f32 / sectors as f32 * TAU;
                let p = Vec3::new(phi.sin() * theta.sin(), phi.cos(), phi.sin() * theta.cos());
                vertices.push(Vertex::new(p.to_array(), p.to_array()));
            }
        }
        let stride = sectors + 1;
        let mut indices = Vec::with_capacity((rings * sectors * 6) as usize);
        for r in 0..rings {
            for s in 0..sectors {
                let a = r * stride + s;
                let b = a + stride;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }
        Self { vertices, indices }
    }

    /// Capped cylinder of height 1 along Y with independent end radii.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let slope = radius_bottom - radius_top;
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        // Side: interleaved top/bottom pairs.
        for i in 0..=segments {
            let a = i as f32 / segments as f32 * TAU;
            let (sin, cos) = a.sin_cos();
            let normal = Vec3::new(sin, slope, cos).normalize().to_array();
            vertices.push(Vertex::new([radius_top * sin, 0.5, radius_top * cos], normal));
            vertices.push(Vertex::new([radius_bottom * sin, -0.5, radius_bottom * cos], normal));
        }
        for i in 0..segments {
            let top = 2 * i;
            let bottom = top + 1;
            indices.extend_from_slice(&[top, bottom, top + 2, top + 2, bottom, bottom + 2]);
        }

        // Caps.
        for (y, radius, ny) in [(0.5, radius_top, 1.0), (-0.5, radius_bottom, -1.0)] {
            let center = vertices.len() as u32;
            let n = [0.0, ny, 0.0];
            vertices.push(Vertex::new([0.0, y, 0.0], n));
            for i in 0..=segments {
                let a = i as f32 / segments as f32 * TAU;
                vertices.push(Vertex::new([radius * a.sin(), y, radius * a.cos()], n));
            }
            for i in 0..segments {
                indices.extend_from_slice(&[center, center + 1 + i, center + 2 + i]);
            }
        }

        Self { vertices, indices }
    }
}

/// Identifies one uploaded mesh. Shapes that differ only by a scale share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKey {
    UnitCube,
    UnitPlane,
    Disc { segments: u32 },
    Sphere { segments: u32 },
    Cylinder { radius_top: u32, radius_bottom: u32, segments: u32 },
}

impl MeshKey {
    /// Mesh to draw a shape with, plus the local scale that sizes it.
    pub fn for_shape(shape: &Shape) -> (Self, Mat4) {
        match *shape {
            Shape::Cuboid { size } => (MeshKey::UnitCube, Mat4::from_scale(size)),
            Shape::Plane { size } => (MeshKey::UnitPlane, Mat4::from_scale(Vec3::new(size, size, 1.0))),
            Shape::Disc { radius, segments } => (
                MeshKey::Disc { segments },
                Mat4::from_scale(Vec3::new(radius, radius, 1.0)),
            ),
            Shape::Sphere { radius, segments } => {
                (MeshKey::Sphere { segments }, Mat4::from_scale(Vec3::splat(radius)))
            }
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => (
                MeshKey::Cylinder {
                    radius_top: radius_top.to_bits(),
                    radius_bottom: radius_bottom.to_bits(),
                    segments,
                },
                Mat4::from_scale(Vec3::new(1.0, height, 1.0)),
            ),
        }
    }

    pub fn build(&self) -> MeshData {
        match *self {
            MeshKey::UnitCube => MeshData::cube(),
            MeshKey::UnitPlane => MeshData::plane(),
            MeshKey::Disc { segments } => MeshData::disc(segments),
            MeshKey::Sphere { segments } => MeshData::sphere(segments),
            MeshKey::Cylinder {
                radius_top,
                radius_bottom,
                segments,
            } => MeshData::cylinder(f32::from_bits(radius_top), f32::from_bits(radius_bottom), segments),
        }
    }
}

/// A GPU mesh with vertex and index buffers.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl Mesh {
    /// Upload mesh data.
    pub fn new(device: &wgpu::Device, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: data.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices_in_range(data: &MeshData) -> bool {
        data.indices.iter().all(|&i| (i as usize) < data.vertices.len())
    }

    #[test]
    fn cube_has_twelve_triangles() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert!(indices_in_range(&cube));
    }

    #[test]
    fn cylinder_counts_and_extent() {
        let cyl = MeshData::cylinder(0.1, 0.2, 8);
        assert_eq!(cyl.vertices.len(), 2 * 9 + 2 * 10);
        assert_eq!(cyl.indices.len(), 8 * 6 + 2 * 8 * 3);
        assert!(indices_in_range(&cyl));
        assert!(cyl.vertices.iter().all(|v| v.position[1].abs() <= 0.5));
    }

    #[test]
    fn sphere_vertices_lie_on_unit_sphere() {
        let sphere = MeshData::sphere(8);
        assert!(indices_in_range(&sphere));
        for v in &sphere.vertices {
            let len = Vec3::from(v.position).length();
            assert!((len - 1.0).abs() < 1.0e-5);
        }
    }

    #[test]
    fn disc_and_plane_face_positive_z() {
        for data in [MeshData::disc(16), MeshData::plane()] {
            assert!(indices_in_range(&data));
            assert!(data.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        }
    }

    #[test]
    fn cuboids_share_one_mesh() {
        let (a, scale_a) = MeshKey::for_shape(&Shape::cuboid(1.0, 0.8, 5.0));
        let (b, _) = MeshKey::for_shape(&Shape::cuboid(0.1, 0.1, 0.3));
        assert_eq!(a, b);
        assert!(scale_a.transform_point3(Vec3::splat(1.0)).abs_diff_eq(Vec3::new(1.0, 0.8, 5.0), 1.0e-6));
    }

    #[test]
    fn tapered_cylinders_get_their_own_mesh() {
        let rocket = Shape::Cylinder {
            radius_top: 0.1,
            radius_bottom: 0.2,
            height: 1.0,
            segments: 8,
        };
        let cowling = Shape::Cylinder {
            radius_top: 0.6,
            radius_bottom: 0.5,
            height: 1.0,
            segments: 8,
        };
        assert_ne!(MeshKey::for_shape(&rocket).0, MeshKey::for_shape(&cowling).0);
    }
}
