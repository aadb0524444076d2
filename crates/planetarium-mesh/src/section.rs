//! Planet mesh sections: one icosahedron face, subdivided independently.

use std::collections::HashMap;

use glam::{Vec3, Vec4};

use crate::icosahedron::{NUM_SECTIONS, face_corners};

/// A vertex as handed to the mesh sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec4,
}

impl SectionVertex {
    /// A vertex on a sphere around the origin, normal pointing outward.
    pub fn on_sphere(position: Vec3) -> Self {
        Self {
            position,
            normal: position.normalize_or_zero(),
            color: Vec4::ONE,
        }
    }
}

/// Geometry for one mesh section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionData {
    pub vertices: Vec<SectionVertex>,
    pub triangles: Vec<u32>,
    /// Unit vector through the centre of the original face.
    pub section_normal: Vec3,
}

impl SectionData {
    pub fn from_triangle(corners: [Vec3; 3]) -> Self {
        let [a, b, c] = corners;
        Self {
            vertices: corners.map(SectionVertex::on_sphere).to_vec(),
            triangles: vec![0, 1, 2],
            section_normal: ((a + b + c) / 3.0).normalize_or_zero(),
        }
    }

    /// The 20 single-triangle sections of a unit icosahedron.
    pub fn base_sections() -> Vec<SectionData> {
        (0..NUM_SECTIONS)
            .map(|i| Self::from_triangle(face_corners(i)))
            .collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Split every triangle into four, `levels` times.
    ///
    /// New vertices sit on the sphere whose radius is the mean of the edge's
    /// endpoints, and each edge midpoint is created once per section.
    pub fn subdivide(&mut self, levels: u32) {
        for _ in 0..levels {
            let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
            let mut next = Vec::with_capacity(self.triangles.len() * 4);

            let current = std::mem::take(&mut self.triangles);
            for tri in current.chunks_exact(3) {
                let (v1, v2, v3) = (tri[0], tri[1], tri[2]);
                let a = self.midpoint(v1, v2, &mut midpoints);
                let b = self.midpoint(v2, v3, &mut midpoints);
                let c = self.midpoint(v3, v1, &mut midpoints);

                next.extend_from_slice(&[v1, a, c, v2, b, a, v3, c, b, a, b, c]);
            }

            self.triangles = next;
        }
    }

    fn midpoint(&mut self, p1: u32, p2: u32, cache: &mut HashMap<(u32, u32), u32>) -> u32 {
        let key = (p1.min(p2), p1.max(p2));
        if let Some(&index) = cache.get(&key) {
            return index;
        }

        let a = self.vertices[p1 as usize].position;
        let b = self.vertices[p2 as usize].position;
        let radius = (a.length() + b.length()) * 0.5;
        let position = ((a + b) * 0.5).normalize_or_zero() * radius;

        let index = self.vertices.len() as u32;
        self.vertices.push(SectionVertex::on_sphere(position));
        cache.insert(key, index);
        index
    }

    /// Area-weighted vertex normals from the current triangles.
    ///
    /// Vertices not referenced by any triangle fall back to their radial direction.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.triangles.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| self.vertices[i as usize].position);
            let face = (b - a).cross(c - a);
            for &i in tri {
                accum[i as usize] += face;
            }
        }
        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            let radial = vertex.position.normalize_or_zero();
            vertex.normal = n.try_normalize().unwrap_or(radial);
        }
    }
}
