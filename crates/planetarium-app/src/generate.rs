//! The "Generate Planet" and "Clear Planet" actions.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use glam::Vec3;
use planetarium_config::Config;
use planetarium_mesh::{SectionStore, obj};
use planetarium_planet::ProceduralPlanet;
use tracing::info;

use crate::error::AppError;

/// File the planet mesh is written to inside the output directory.
pub const OBJ_FILE_NAME: &str = "planet.obj";

/// Prefixes of the debug texture files.
const TEXTURE_PREFIXES: [&str; 2] = ["noise_", "steepness_"];

/// What [`generate`] wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateSummary {
    pub obj_path: PathBuf,
    pub vertices: usize,
    pub triangles: usize,
    pub textures: Vec<PathBuf>,
}

/// Build the planet and write it to `config.output.directory`.
///
/// With `full_lod` the whole sphere is built at that LOD, otherwise every
/// section gets the LOD chosen for `viewer`.
pub fn generate(
    config: &Config,
    viewer: Vec3,
    full_lod: Option<u8>,
) -> Result<GenerateSummary, AppError> {
    let out_dir = &config.output.directory;
    std::fs::create_dir_all(out_dir).map_err(AppError::io(out_dir))?;

    let mut planet = ProceduralPlanet::new(config.planet.clone(), Vec3::ZERO)?;
    info!(planet = planet.name(), seed = planet.seed(), "Generating planet");

    let obj_path = out_dir.join(OBJ_FILE_NAME);
    let file = File::create(&obj_path).map_err(AppError::io(&obj_path))?;
    let mut writer = BufWriter::new(file);

    let (vertices, triangles) = match full_lod {
        Some(lod) => {
            let mesh = planet.build_full_mesh(lod)?;
            obj::write_mesh_obj(&mut writer, planet.name(), &mesh)?;
            (mesh.vertices.len(), mesh.triangle_count())
        }
        None => {
            let mut store = SectionStore::new();
            let report = planet.update_sections(viewer, &mut store)?;
            info!(
                sections = report.updated.len(),
                lods = ?planet.previous_lods(),
                "Built planet sections"
            );
            obj::write_obj(&mut writer, planet.name(), store.sections())?;
            (store.vertex_count(), store.triangle_count())
        }
    };
    writer.flush().map_err(AppError::io(&obj_path))?;

    let mut textures = Vec::new();
    if config.planet.generate_debug_textures {
        for (name, image) in planet.debug_textures()? {
            let path = out_dir.join(format!("{name}.png"));
            image.write_png(&path)?;
            textures.push(path);
        }
    }

    info!(
        path = %obj_path.display(),
        vertices,
        triangles,
        textures = textures.len(),
        "Wrote planet"
    );
    Ok(GenerateSummary {
        obj_path,
        vertices,
        triangles,
        textures,
    })
}

/// Delete the files [`generate`] writes. Returns how many were removed.
pub fn clear(config: &Config) -> Result<usize, AppError> {
    let out_dir = &config.output.directory;
    if !out_dir.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in std::fs::read_dir(out_dir).map_err(AppError::io(out_dir))? {
        let path = entry.map_err(AppError::io(out_dir))?.path();
        if is_generated(&path) {
            std::fs::remove_file(&path).map_err(AppError::io(&path))?;
            removed += 1;
        }
    }
    info!(dir = %out_dir.display(), removed, "Cleared planet");
    Ok(removed)
}

fn is_generated(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name == OBJ_FILE_NAME
        || (name.ends_with(".png") && TEXTURE_PREFIXES.iter().any(|p| name.starts_with(p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.planet.cube_resolution = 16;
        config.planet.max_lod = 3;
        config.output.directory = dir.to_path_buf();
        config
    }

    #[test]
    fn test_generate_sections_writes_obj() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let summary = generate(&config, Vec3::new(0.0, 25_000.0, 0.0), None).unwrap();

        assert!(summary.obj_path.exists());
        assert!(summary.textures.is_empty());
        let text = std::fs::read_to_string(&summary.obj_path).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), summary.vertices);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), summary.triangles);
    }

    #[test]
    fn test_generate_full_mesh() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let summary = generate(&config, Vec3::ZERO, Some(1)).unwrap();
        assert_eq!(summary.vertices, 42);
        assert_eq!(summary.triangles, 80);
    }

    #[test]
    fn test_generate_then_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = test_config(tmp.path());
        config.planet.generate_debug_textures = true;
        std::fs::write(tmp.path().join("notes.txt"), "keep me").unwrap();

        let summary = generate(&config, Vec3::new(0.0, 25_000.0, 0.0), None).unwrap();
        assert_eq!(summary.textures.len(), 12);
        assert!(summary.textures.iter().all(|p| p.exists()));

        assert_eq!(clear(&config).unwrap(), 13);
        assert!(!summary.obj_path.exists());
        assert!(tmp.path().join("notes.txt").exists(), "unrelated files survive");
    }

    #[test]
    fn test_clear_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(&tmp.path().join("absent"));
        assert_eq!(clear(&config).unwrap(), 0);
    }
}
