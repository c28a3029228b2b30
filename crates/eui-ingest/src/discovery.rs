//! Shapefile discovery in layer directories.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Lists all `.shp` files in a directory, sorted by filename.
pub fn list_shapefiles(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_shp = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("shp"));
        if is_shp {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// First shapefile of a layer directory in filename order.
pub fn first_shapefile(dir: &Path) -> Result<PathBuf> {
    list_shapefiles(dir)?
        .into_iter()
        .next()
        .ok_or_else(|| IngestError::NoShapefile {
            path: dir.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_shapefiles_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["b.shp", "a.SHP", "a.dbf", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.shp")).unwrap();

        let files = list_shapefiles(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.SHP", "b.shp"]);
        assert_eq!(first_shapefile(dir.path()).unwrap(), files[0]);
    }

    #[test]
    fn test_first_shapefile_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            first_shapefile(dir.path()),
            Err(IngestError::NoShapefile { .. })
        ));
    }

    #[test]
    fn test_list_shapefiles_missing_dir() {
        assert!(matches!(
            list_shapefiles(Path::new("/nonexistent/layers")),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }
}
