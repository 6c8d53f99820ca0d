//! Reading snapshots and writing export files.

use crate::error::{AppError, AppResult};
use floorgrid_core::export::ExportTables;
use floorgrid_core::{Project, ProjectConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the normalized snapshot written next to the tables.
pub const SNAPSHOT_FILE: &str = "snapshot.json";

fn read(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Load a configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> AppResult<ProjectConfig> {
    let Some(path) = path else {
        return Ok(ProjectConfig::default());
    };
    let json = read(path)?;
    ProjectConfig::from_json(&json).map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
}

/// Load and validate a project snapshot.
pub fn load_project(snapshot: &Path, config: ProjectConfig) -> AppResult<Project> {
    let json = read(snapshot)?;
    let project = Project::from_json(&json, config)?;
    log::info!("Loaded {} ({} floor(s))", snapshot.display(), project.store.len());
    Ok(project)
}

/// Writes export files into one directory.
pub struct OutputDir {
    base_path: PathBuf,
}

impl OutputDir {
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> AppResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| AppError::Io(format!("Failed to create output directory: {}", e)))?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn write(&self, name: &str, contents: &str) -> AppResult<PathBuf> {
        let path = self.base_path.join(name);
        fs::write(&path, contents).map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        log::debug!("Wrote {} ({} bytes)", path.display(), contents.len());
        Ok(path)
    }

    /// Write the three tables and the normalized snapshot.
    pub fn write_export(&self, tables: &ExportTables, snapshot_json: &str) -> AppResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (name, contents) in tables.files() {
            written.push(self.write(name, contents)?);
        }
        written.push(self.write(SNAPSHOT_FILE, snapshot_json)?);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorgrid_core::ExportScope;
    use tempfile::TempDir;

    #[test]
    fn test_output_dir_is_created() {
        let temp = TempDir::new().unwrap();
        let out = OutputDir::new(temp.path().join("nested").join("out")).unwrap();
        assert!(out.base_path().is_dir());
    }

    #[test]
    fn test_write_export() {
        let temp = TempDir::new().unwrap();
        let out = OutputDir::new(temp.path().to_path_buf()).unwrap();
        let project = Project::new();
        let tables = project.export_tables(ExportScope::AllFloors);
        let written = out.write_export(&tables, &project.to_json().unwrap()).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["navigation.csv", "poi.csv", "vertical_connections.csv", "snapshot.json"]);
        assert_eq!(fs::read_to_string(&written[1]).unwrap(), tables.poi);
    }

    #[test]
    fn test_missing_snapshot_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = load_project(&temp.path().join("missing.json"), ProjectConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_config_file() {
        let temp = TempDir::new().unwrap();
        assert_eq!(load_config(None).unwrap(), ProjectConfig::default());

        let path = temp.path().join("config.json");
        fs::write(&path, r#"{ "max_zoom": 4.0 }"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.max_zoom, 4.0);
        assert_eq!(config.default_grid_size, 20);

        fs::write(&path, "max_zoom = 4").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(AppError::Config(_))));
    }
}
