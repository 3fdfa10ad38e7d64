//! Region files on disk.
//!
//! Writes go to a sibling `.tmp` file that is synced and renamed over the
//! target, so a crash never leaves a truncated region file behind.

use crate::error::{Result, TravelRegionsError};
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use travel_regions_types::region_file::RegionFile;

/// Read and validate a region file.
pub fn load_region_file<P: AsRef<Path>>(path: P) -> Result<RegionFile> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let file: RegionFile = serde_json::from_reader(reader)?;
    file.validate().map_err(|e| {
        TravelRegionsError::InvalidInput(format!("{}: {}", path.as_ref().display(), e))
    })?;
    Ok(file)
}

/// Write a region file as pretty-printed JSON.
///
/// The temporary sibling is removed again when any step fails.
pub fn save_region_file<P: AsRef<Path>>(file: &RegionFile, path: P) -> Result<()> {
    let path = path.as_ref();
    let temp_path = temp_path(path);

    let written = write_synced(file, &temp_path).and_then(|()| {
        std::fs::rename(&temp_path, path)?;
        Ok(())
    });
    if written.is_err() {
        if let Err(e) = std::fs::remove_file(&temp_path) {
            debug!("Could not remove {}: {}", temp_path.display(), e);
        }
    }
    written
}

fn write_synced(file: &RegionFile, temp_path: &Path) -> Result<()> {
    let handle = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)?;
    let mut writer = BufWriter::new(handle);
    serde_json::to_writer_pretty(&mut writer, file)?;
    writer.flush()?;

    let handle = writer.into_inner().map_err(|e| e.into_error())?;
    handle.sync_all()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut temp = path.to_path_buf();
    if let Some(name) = temp.file_name() {
        let mut new_name = name.to_string_lossy().into_owned();
        new_name.push_str(".tmp");
        temp.set_file_name(new_name);
    }
    temp
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use travel_regions_types::coords::LatLng;
    use travel_regions_types::geometry::RegionGeometry;
    use travel_regions_types::region_file::SerializedNode;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("level_1_regions.json");

        let mut file = RegionFile::new(1);
        file.push(
            4,
            Some(RegionGeometry::Polygon(vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [0.0, 0.0],
            ])),
            vec![SerializedNode {
                id: "45".to_string(),
                latlng: LatLng::new(0.2, 0.7),
            }],
            Vec::new(),
        );
        file.push(5, None, Vec::new(), Vec::new());

        save_region_file(&file, &path).unwrap();
        assert!(!temp_path(&path).exists());

        let loaded = load_region_file(&path).unwrap();
        assert_eq!(loaded, file);
    }

    #[test]
    fn test_load_rejects_misaligned_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(
            &path,
            r#"{"level": 1, "community_IDs": [1, 2], "geometries": [{}], "nodes": [[], []]}"#,
        )
        .unwrap();

        assert!(matches!(
            load_region_file(&path),
            Err(TravelRegionsError::InvalidInput(_))
        ));
        assert!(matches!(
            load_region_file(dir.path().join("missing.json")),
            Err(TravelRegionsError::Io(_))
        ));
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by the rename.
        let target = dir.path().join("level_1_regions.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        let result = save_region_file(&RegionFile::new(1), &target);
        assert!(matches!(result, Err(TravelRegionsError::Io(_))));
        assert!(!temp_path(&target).exists());
        assert!(target.join("keep").exists());
    }
}
