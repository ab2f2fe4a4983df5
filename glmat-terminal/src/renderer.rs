/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use glmat_core::{vector, Mat4, Mesh, Triangle};
use nalgebra::Vector3;
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Clip-space w below this is treated as behind the eye.
const MIN_W: f32 = 1e-6;

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<[u8; 3]>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![[0, 0, 0]; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Aspect ratio for the projection. Terminal cells are about twice
    /// as tall as they are wide.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / (self.height.max(1) as f32 * 2.0)
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill([0, 0, 0]);
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    /// Count of cells covered by geometry.
    pub fn covered(&self) -> usize {
        self.depth_buffer.iter().filter(|d| d.is_finite()).count()
    }

    /// Draw `mesh` with `frame` (model × view × projection). `model` alone
    /// is used to light faces in world space.
    pub fn render_mesh(&mut self, mesh: &Mesh, model: &Mat4, frame: &Mat4) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model, frame);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, model: &Mat4, frame: &Mat4) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match self.project(frame.transform_point(vertex.homogeneous())) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        let brightness = face_brightness(triangle, model);

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        let shade = 0.35 + 0.65 * brightness;
        let color = triangle.vertices[0].color.map(|c| (c as f32 * shade) as u8);

        self.rasterize_triangle(&screen_coords, character, color);
    }

    /// Perspective divide and viewport mapping. Returns `None` for
    /// vertices behind the eye or outside the depth range.
    fn project(&self, clip: [f32; 4]) -> Option<(f32, f32, f32)> {
        let [x, y, z, w] = clip;
        if w < MIN_W {
            return None;
        }
        let (ndc_x, ndc_y, ndc_z) = (x / w, y / w, z / w);
        if !(-1.0..=1.0).contains(&ndc_z) {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.height as f32;
        Some((screen_x, screen_y, ndc_z))
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: [u8; 3]) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py)) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                    self.color_buffer[idx] = color;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let [r, g, b] = self.color_buffer[idx];
                writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Lambert term of the face against a light shining down -Z, two-sided.
fn face_brightness(triangle: &Triangle, model: &Mat4) -> f32 {
    let world: Vec<Vector3<f32>> = triangle
        .vertices
        .iter()
        .map(|v| {
            let [x, y, z, _] = model.transform_point(v.homogeneous());
            Vector3::new(x, y, z)
        })
        .collect();
    let normal = vector::normalize(&vector::cross(&(world[1] - world[0]), &(world[2] - world[0])));
    normal.dot(&Vector3::z()).abs()
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
