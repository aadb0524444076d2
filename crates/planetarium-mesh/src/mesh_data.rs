//! A single whole-planet mesh with full vertex attributes.

use std::collections::HashMap;
use std::fmt;

use glam::{Vec2, Vec3, Vec4};

use crate::icosahedron;

/// Indexed triangle mesh with per-vertex normals, UVs, colours and tangents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<u32>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<Vec4>,
    pub tangents: Vec<Vec3>,
}

/// Attribute counts, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshSummary {
    pub vertices: usize,
    pub triangles: usize,
    pub normals: usize,
    pub tangents: usize,
}

impl fmt::Display for MeshSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "V: {} T: {} N: {} Ta: {}",
            self.vertices, self.triangles, self.normals, self.tangents
        )
    }
}

impl MeshData {
    /// A unit icosphere. Only positions and triangles are filled in.
    ///
    /// Vertex count is `10 * 4^n + 2`.
    pub fn icosphere(subdivisions: u32) -> Self {
        let mut vertices: Vec<Vec3> = icosahedron::vertices()
            .iter()
            .map(|v| v.normalize())
            .collect();
        let mut faces: Vec<[u32; 3]> = icosahedron::FACES.to_vec();

        for _ in 0..subdivisions {
            let mut cache: HashMap<(u32, u32), u32> = HashMap::new();
            let mut midpoint = |p1: u32, p2: u32, vertices: &mut Vec<Vec3>| -> u32 {
                *cache.entry((p1.min(p2), p1.max(p2))).or_insert_with(|| {
                    let mid = (vertices[p1 as usize] + vertices[p2 as usize]).normalize();
                    vertices.push(mid);
                    (vertices.len() - 1) as u32
                })
            };

            let mut next = Vec::with_capacity(faces.len() * 4);
            for [v1, v2, v3] in faces {
                let a = midpoint(v1, v2, &mut vertices);
                let b = midpoint(v2, v3, &mut vertices);
                let c = midpoint(v3, v1, &mut vertices);
                next.extend([[v1, a, c], [v2, b, a], [v3, c, b], [a, b, c]]);
            }
            faces = next;
        }

        Self {
            vertices,
            triangles: faces.into_iter().flatten().collect(),
            ..Self::default()
        }
    }

    pub fn is_populated(&self) -> bool {
        !self.vertices.is_empty() && !self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// One tangent per vertex: the normalised first edge leaving it, in triangle order.
    pub fn compute_tangents(&mut self) {
        let mut tangents = vec![Vec3::ZERO; self.vertices.len()];
        let mut assigned = vec![false; self.vertices.len()];
        for tri in self.triangles.chunks_exact(3) {
            for k in 0..3 {
                let here = tri[k] as usize;
                if assigned[here] {
                    continue;
                }
                let next = tri[(k + 1) % 3] as usize;
                tangents[here] = (self.vertices[next] - self.vertices[here]).normalize_or_zero();
                assigned[here] = true;
            }
        }
        self.tangents = tangents;
    }

    /// Area-weighted vertex normals.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.triangles.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| self.vertices[i as usize]);
            let face = (b - a).cross(c - a);
            for &i in tri {
                normals[i as usize] += face;
            }
        }
        self.normals = normals.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    pub fn summary(&self) -> MeshSummary {
        MeshSummary {
            vertices: self.vertices.len(),
            triangles: self.triangle_count(),
            normals: self.normals.len(),
            tangents: self.tangents.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icosphere_counts() {
        for n in 0..4u32 {
            let mesh = MeshData::icosphere(n);
            assert_eq!(mesh.vertices.len(), 10 * 4usize.pow(n) + 2, "subdivisions {n}");
            assert_eq!(mesh.triangle_count(), 20 * 4usize.pow(n));
        }
    }

    #[test]
    fn test_icosphere_unit_radius() {
        let mesh = MeshData::icosphere(2);
        for v in &mesh.vertices {
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_empty_mesh_not_populated() {
        assert!(!MeshData::default().is_populated());
        assert!(MeshData::icosphere(0).is_populated());
    }

    #[test]
    fn test_normals_match_positions_on_sphere() {
        let mut mesh = MeshData::icosphere(3);
        mesh.recompute_normals();
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        for (v, n) in mesh.vertices.iter().zip(&mesh.normals) {
            assert!(v.dot(*n) > 0.95, "normal {n} strays from radial {v}");
        }
    }

    #[test]
    fn test_tangents_unit_and_perpendicular_ish() {
        let mut mesh = MeshData::icosphere(2);
        mesh.compute_tangents();
        assert_eq!(mesh.tangents.len(), mesh.vertices.len());
        for (v, t) in mesh.vertices.iter().zip(&mesh.tangents) {
            assert!((t.length() - 1.0).abs() < 1e-4);
            assert!(v.dot(*t).abs() < 0.5);
        }
    }

    #[test]
    fn test_summary_display() {
        let mut mesh = MeshData::icosphere(0);
        mesh.recompute_normals();
        let summary = mesh.summary();
        assert_eq!(summary.tangents, 0);
        assert_eq!(summary.to_string(), "V: 12 T: 20 N: 12 Ta: 0");
    }
}
