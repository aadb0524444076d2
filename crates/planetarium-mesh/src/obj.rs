//! Wavefront OBJ export.

use std::io::Write;

use crate::error::MeshError;
use crate::mesh_data::MeshData;
use crate::section::SectionData;

/// Write sections as one OBJ object with a group per section.
pub fn write_obj<W: Write>(writer: &mut W, name: &str, sections: &[SectionData]) -> Result<(), MeshError> {
    writeln!(writer, "o {name}")?;
    let mut base = 1usize;
    for (index, section) in sections.iter().enumerate() {
        if section.triangles.len() % 3 != 0 {
            return Err(MeshError::MalformedTriangles {
                index,
                indices: section.triangles.len(),
            });
        }
        writeln!(writer, "g section_{index}")?;
        for v in &section.vertices {
            writeln!(writer, "v {} {} {}", v.position.x, v.position.y, v.position.z)?;
        }
        for v in &section.vertices {
            writeln!(writer, "vn {} {} {}", v.normal.x, v.normal.y, v.normal.z)?;
        }
        for tri in section.triangles.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| base + i as usize);
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
        base += section.vertices.len();
    }
    Ok(())
}

/// Write a whole mesh, including UVs when present.
pub fn write_mesh_obj<W: Write>(writer: &mut W, name: &str, mesh: &MeshData) -> Result<(), MeshError> {
    writeln!(writer, "o {name}")?;
    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    let has_uvs = mesh.uvs.len() == mesh.vertices.len();
    if has_uvs {
        for uv in &mesh.uvs {
            writeln!(writer, "vt {} {}", uv.x, uv.y)?;
        }
    }
    let has_normals = mesh.normals.len() == mesh.vertices.len();
    if has_normals {
        for n in &mesh.normals {
            writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
        }
    }
    for tri in mesh.triangles.chunks_exact(3) {
        let corners = [tri[0], tri[1], tri[2]].map(|i| {
            let i = i as usize + 1;
            match (has_uvs, has_normals) {
                (true, true) => format!("{i}/{i}/{i}"),
                (true, false) => format!("{i}/{i}"),
                (false, true) => format!("{i}//{i}"),
                (false, false) => format!("{i}"),
            }
        });
        writeln!(writer, "f {}", corners.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_starting(text: &str, prefix: &str) -> usize {
        text.lines().filter(|l| l.starts_with(prefix)).count()
    }

    #[test]
    fn test_sections_export() {
        let sections = SectionData::base_sections();
        let mut out = Vec::new();
        write_obj(&mut out, "planet", &sections[..2]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("o planet\n"));
        assert_eq!(lines_starting(&text, "g "), 2);
        assert_eq!(lines_starting(&text, "v "), 6);
        assert_eq!(lines_starting(&text, "vn "), 6);
        assert!(text.contains("f 4//4 5//5 6//6"), "second section indices are offset");
    }

    #[test]
    fn test_mesh_export_with_all_attributes() {
        let mut mesh = MeshData::icosphere(1);
        mesh.recompute_normals();
        mesh.uvs = mesh.vertices.iter().map(|v| crate::sphere_uv(*v)).collect();
        let mut out = Vec::new();
        write_mesh_obj(&mut out, "full", &mesh).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(lines_starting(&text, "v "), 42);
        assert_eq!(lines_starting(&text, "vt "), 42);
        assert_eq!(lines_starting(&text, "f "), 80);
        assert!(text.lines().any(|l| l.starts_with("f 1/1/1")));
    }

    #[test]
    fn test_mesh_export_positions_only() {
        let mesh = MeshData::icosphere(0);
        let mut out = Vec::new();
        write_mesh_obj(&mut out, "bare", &mesh).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\nf 1 6 12\n"));
    }
}
