/// Demo geometry: the extruded letter F and a colour cube
use nalgebra::{Point3, Vector3};

/// A vertex with position and 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub color: [u8; 3],
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, color: [u8; 3]) -> Self {
        Self {
            position: Point3::new(x, y, z),
            color,
        }
    }

    /// Homogeneous row vector `(x, y, z, 1)` for `Mat4::transform_point`.
    pub fn homogeneous(&self) -> [f32; 4] {
        [self.position.x, self.position.y, self.position.z, 1.0]
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        crate::vector::normalize(&edge1.cross(&edge2))
    }
}

/// A triangle soup, laid out the way the GPU buffers expect it
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

/// Each face of the F is two triangles (six vertices) sharing one colour.
const F_FACES: [([[f32; 3]; 6], [u8; 3]); 16] = [
    // left column front
    (
        [[0.0, 0.0, 0.0], [0.0, 150.0, 0.0], [30.0, 0.0, 0.0], [0.0, 150.0, 0.0], [30.0, 150.0, 0.0], [30.0, 0.0, 0.0]],
        [200, 70, 120],
    ),
    // top rung front
    (
        [[30.0, 0.0, 0.0], [30.0, 30.0, 0.0], [100.0, 0.0, 0.0], [30.0, 30.0, 0.0], [100.0, 30.0, 0.0], [100.0, 0.0, 0.0]],
        [200, 70, 120],
    ),
    // middle rung front
    (
        [[30.0, 60.0, 0.0], [30.0, 90.0, 0.0], [67.0, 60.0, 0.0], [30.0, 90.0, 0.0], [67.0, 90.0, 0.0], [67.0, 60.0, 0.0]],
        [200, 70, 120],
    ),
    // left column back
    (
        [[0.0, 0.0, 30.0], [30.0, 0.0, 30.0], [0.0, 150.0, 30.0], [0.0, 150.0, 30.0], [30.0, 0.0, 30.0], [30.0, 150.0, 30.0]],
        [80, 70, 200],
    ),
    // top rung back
    (
        [[30.0, 0.0, 30.0], [100.0, 0.0, 30.0], [30.0, 30.0, 30.0], [30.0, 30.0, 30.0], [100.0, 0.0, 30.0], [100.0, 30.0, 30.0]],
        [80, 70, 200],
    ),
    // middle rung back
    (
        [[30.0, 60.0, 30.0], [67.0, 60.0, 30.0], [30.0, 90.0, 30.0], [30.0, 90.0, 30.0], [67.0, 60.0, 30.0], [67.0, 90.0, 30.0]],
        [80, 70, 200],
    ),
    // top
    (
        [[0.0, 0.0, 0.0], [100.0, 0.0, 0.0], [100.0, 0.0, 30.0], [0.0, 0.0, 0.0], [100.0, 0.0, 30.0], [0.0, 0.0, 30.0]],
        [70, 200, 210],
    ),
    // top rung right
    (
        [[100.0, 0.0, 0.0], [100.0, 30.0, 0.0], [100.0, 30.0, 30.0], [100.0, 0.0, 0.0], [100.0, 30.0, 30.0], [100.0, 0.0, 30.0]],
        [200, 200, 70],
    ),
    // under top rung
    (
        [[30.0, 30.0, 0.0], [30.0, 30.0, 30.0], [100.0, 30.0, 30.0], [30.0, 30.0, 0.0], [100.0, 30.0, 30.0], [100.0, 30.0, 0.0]],
        [210, 100, 70],
    ),
    // between top rung and middle
    (
        [[30.0, 30.0, 0.0], [30.0, 60.0, 30.0], [30.0, 30.0, 30.0], [30.0, 30.0, 0.0], [30.0, 60.0, 0.0], [30.0, 60.0, 30.0]],
        [210, 160, 70],
    ),
    // top of middle rung
    (
        [[30.0, 60.0, 0.0], [67.0, 60.0, 30.0], [30.0, 60.0, 30.0], [30.0, 60.0, 0.0], [67.0, 60.0, 0.0], [67.0, 60.0, 30.0]],
        [70, 180, 210],
    ),
    // right of middle rung
    (
        [[67.0, 60.0, 0.0], [67.0, 90.0, 30.0], [67.0, 60.0, 30.0], [67.0, 60.0, 0.0], [67.0, 90.0, 0.0], [67.0, 90.0, 30.0]],
        [100, 70, 210],
    ),
    // bottom of middle rung
    (
        [[30.0, 90.0, 0.0], [30.0, 90.0, 30.0], [67.0, 90.0, 30.0], [30.0, 90.0, 0.0], [67.0, 90.0, 30.0], [67.0, 90.0, 0.0]],
        [76, 210, 100],
    ),
    // right of bottom
    (
        [[30.0, 90.0, 0.0], [30.0, 150.0, 30.0], [30.0, 90.0, 30.0], [30.0, 90.0, 0.0], [30.0, 150.0, 0.0], [30.0, 150.0, 30.0]],
        [140, 210, 80],
    ),
    // bottom
    (
        [[0.0, 150.0, 0.0], [0.0, 150.0, 30.0], [30.0, 150.0, 30.0], [0.0, 150.0, 0.0], [30.0, 150.0, 30.0], [30.0, 150.0, 0.0]],
        [90, 130, 110],
    ),
    // left side
    (
        [[0.0, 0.0, 0.0], [0.0, 0.0, 30.0], [0.0, 150.0, 30.0], [0.0, 0.0, 0.0], [0.0, 150.0, 30.0], [0.0, 150.0, 0.0]],
        [160, 160, 220],
    ),
];

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Adds the quad `a b c d` (counter-clockwise) as two triangles.
    fn add_quad(&mut self, corners: [[f32; 3]; 4], color: [u8; 3]) {
        let [a, b, c, d] = corners.map(|[x, y, z]| Vertex::new(x, y, z, color));
        self.add_triangle(Triangle::new(a, b, c));
        self.add_triangle(Triangle::new(a, c, d));
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// The 100 × 150 × 30 letter F used throughout the WebGL demos,
    /// in pixel-like units with its top-left front corner at the origin.
    pub fn letter_f() -> Self {
        let mut mesh = Self::with_capacity(F_FACES.len() * 2);
        for (corners, color) in F_FACES {
            let v = corners.map(|[x, y, z]| Vertex::new(x, y, z, color));
            mesh.add_triangle(Triangle::new(v[0], v[1], v[2]));
            mesh.add_triangle(Triangle::new(v[3], v[4], v[5]));
        }
        mesh
    }

    /// Create a cube centred on the origin with one colour per face
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // front, back
        mesh.add_quad([[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]], [200, 70, 120]);
        mesh.add_quad([[-h, -h, -h], [-h, h, -h], [h, h, -h], [h, -h, -h]], [80, 70, 200]);
        // top, bottom
        mesh.add_quad([[-h, h, -h], [-h, h, h], [h, h, h], [h, h, -h]], [70, 200, 210]);
        mesh.add_quad([[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]], [90, 130, 110]);
        // right, left
        mesh.add_quad([[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]], [200, 200, 70]);
        mesh.add_quad([[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]], [160, 160, 220]);

        mesh
    }

    /// Flat `x, y, z` positions for a `FLOAT` vertex buffer.
    pub fn positions(&self) -> Vec<f32> {
        self.triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .flat_map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    /// Flat `r, g, b` bytes for a normalised `UNSIGNED_BYTE` buffer.
    pub fn colors(&self) -> Vec<u8> {
        self.triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .flat_map(|v| v.color)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_f_buffers() {
        let f = Mesh::letter_f();
        assert_eq!(f.triangles.len(), 32);
        assert_eq!(f.vertex_count(), 16 * 6);
        assert_eq!(f.positions().len(), 96 * 3);
        assert_eq!(f.colors().len(), 96 * 3);
        assert_eq!(&f.colors()[..3], &[200, 70, 120]);
        assert_eq!(&f.colors()[f.colors().len() - 3..], &[160, 160, 220]);
    }

    #[test]
    fn test_letter_f_bounds() {
        let positions = Mesh::letter_f().positions();
        let axis_max = |axis: usize| {
            positions
                .iter()
                .skip(axis)
                .step_by(3)
                .fold(f32::MIN, |m, v| m.max(*v))
        };
        assert_eq!(axis_max(0), 100.0);
        assert_eq!(axis_max(1), 150.0);
        assert_eq!(axis_max(2), 30.0);
        assert!(positions.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_letter_f_faces_are_not_degenerate() {
        for triangle in &Mesh::letter_f().triangles {
            assert!((triangle.calculate_normal().norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.triangles.len(), 12);
        for triangle in &cube.triangles {
            let normal = triangle.calculate_normal();
            let centre = triangle.vertices[0].position.coords;
            assert!(normal.dot(&centre) > 0.0);
        }
    }
}
