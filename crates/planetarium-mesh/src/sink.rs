//! The boundary between planet generation and whatever displays the mesh.

use tracing::debug;

use crate::error::MeshError;
use crate::section::SectionData;

/// Receives planet mesh sections. A renderer-side component implements this.
pub trait MeshSink {
    /// Number of sections currently held.
    fn section_count(&self) -> usize;

    /// Create (or replace) section `index`, growing the sink as needed.
    fn create_section(&mut self, index: usize, section: &SectionData);

    /// Replace the geometry of an existing section.
    fn update_section(&mut self, index: usize, section: &SectionData) -> Result<(), MeshError>;

    /// Drop every section.
    fn clear_all(&mut self);
}

/// In-memory sink used for export and tests.
#[derive(Debug, Clone, Default)]
pub struct SectionStore {
    sections: Vec<SectionData>,
    updates: usize,
}

impl SectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[SectionData] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&SectionData> {
        self.sections.get(index)
    }

    /// Total successful `update_section` calls since creation.
    pub fn update_count(&self) -> usize {
        self.updates
    }

    pub fn vertex_count(&self) -> usize {
        self.sections.iter().map(|s| s.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.sections.iter().map(SectionData::triangle_count).sum()
    }
}

impl MeshSink for SectionStore {
    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn create_section(&mut self, index: usize, section: &SectionData) {
        if index >= self.sections.len() {
            self.sections.resize_with(index + 1, || SectionData {
                vertices: Vec::new(),
                triangles: Vec::new(),
                section_normal: section.section_normal,
            });
        }
        self.sections[index] = section.clone();
    }

    fn update_section(&mut self, index: usize, section: &SectionData) -> Result<(), MeshError> {
        if section.triangles.len() % 3 != 0 {
            return Err(MeshError::MalformedTriangles {
                index,
                indices: section.triangles.len(),
            });
        }
        let count = self.sections.len();
        let slot = self
            .sections
            .get_mut(index)
            .ok_or(MeshError::SectionOutOfRange { index, count })?;
        *slot = section.clone();
        self.updates += 1;
        debug!(index, triangles = section.triangle_count(), "Updated mesh section");
        Ok(())
    }

    fn clear_all(&mut self) {
        self.sections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NUM_SECTIONS;

    #[test]
    fn test_create_all_sections() {
        let mut store = SectionStore::new();
        for (i, section) in SectionData::base_sections().iter().enumerate() {
            store.create_section(i, section);
        }
        assert_eq!(store.section_count(), NUM_SECTIONS);
        assert_eq!(store.triangle_count(), NUM_SECTIONS);
        assert_eq!(store.vertex_count(), NUM_SECTIONS * 3);
    }

    #[test]
    fn test_update_replaces_geometry() {
        let mut store = SectionStore::new();
        let base = SectionData::base_sections();
        store.create_section(0, &base[0]);

        let mut fine = base[0].clone();
        fine.subdivide(2);
        store.update_section(0, &fine).unwrap();
        assert_eq!(store.section(0).unwrap().triangle_count(), 16);
        assert_eq!(store.update_count(), 1);
    }

    #[test]
    fn test_update_missing_section_fails() {
        let mut store = SectionStore::new();
        let base = SectionData::base_sections();
        let err = store.update_section(4, &base[4]).unwrap_err();
        assert!(matches!(err, MeshError::SectionOutOfRange { index: 4, count: 0 }));
    }

    #[test]
    fn test_update_rejects_partial_triangle() {
        let mut store = SectionStore::new();
        let mut base = SectionData::base_sections().swap_remove(0);
        store.create_section(0, &base);
        base.triangles.push(1);
        assert!(matches!(
            store.update_section(0, &base),
            Err(MeshError::MalformedTriangles { index: 0, indices: 4 })
        ));
    }

    #[test]
    fn test_clear_all() {
        let mut store = SectionStore::new();
        store.create_section(2, &SectionData::base_sections()[2]);
        assert_eq!(store.section_count(), 3);
        store.clear_all();
        assert_eq!(store.section_count(), 0);
    }
}
