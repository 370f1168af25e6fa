use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::export::ExportedImage;
use thiserror::Error;

const PICTURES_SUBDIR: &str = "Pictures";
const PARTIAL_SUFFIX: &str = "partial";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("export name is empty")]
    MissingExportName,
    #[error("{path} is {size} bytes, above the {limit} byte limit")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Where exports end up on disk.
#[derive(Debug, Clone)]
pub struct StorageService {
    export_dir: PathBuf,
}

impl StorageService {
    pub const fn with_paths(export_dir: PathBuf) -> Self {
        Self { export_dir }
    }

    pub fn with_default_paths() -> StorageResult<Self> {
        let home = std::env::var("HOME").map_err(|_| StorageError::MissingHomeDirectory)?;
        let mut export_dir = PathBuf::from(home);
        export_dir.push(PICTURES_SUBDIR);
        fs::create_dir_all(&export_dir)?;
        Ok(Self::with_paths(export_dir))
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn allocate_target_path(&self, name: &str, extension: &str) -> StorageResult<PathBuf> {
        if name.is_empty() {
            return Err(StorageError::MissingExportName);
        }
        let mut path = self.export_dir.clone();
        path.push(format!("{name}.{extension}"));
        Ok(path)
    }

    pub fn save_export(&self, exported: &ExportedImage, name: &str) -> StorageResult<PathBuf> {
        let target = self.allocate_target_path(name, exported.file_extension())?;
        write_export(exported, &target)?;
        Ok(target)
    }
}

/// Reads an input file, refusing anything larger than `limit` before reading it.
pub fn read_source(path: &Path, limit: u64) -> StorageResult<Vec<u8>> {
    let size = fs::metadata(path)?.len();
    if size > limit {
        return Err(StorageError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }
    Ok(fs::read(path)?)
}

/// Writes the export next to `destination` first, then moves it into place.
pub fn write_export(exported: &ExportedImage, destination: &Path) -> StorageResult<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let partial = partial_path(destination);
    fs::write(&partial, &exported.bytes)?;
    if let Err(err) = fs::rename(&partial, destination) {
        let _ = fs::remove_file(&partial);
        return Err(StorageError::Io(err));
    }
    tracing::info!(path = %destination.display(), bytes = exported.bytes.len(), "export written");
    Ok(())
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    destination.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    fn exported(bytes: &[u8]) -> ExportedImage {
        ExportedImage {
            bytes: bytes.to_vec(),
            width: 1,
            height: 1,
            format: ImageFormat::Png,
        }
    }

    #[test]
    fn allocate_target_path_uses_name_and_extension() {
        let service = StorageService::with_paths(PathBuf::from("/home/test/Pictures"));
        let path = service.allocate_target_path("edit", "png").unwrap();
        assert_eq!(path, PathBuf::from("/home/test/Pictures/edit.png"));
        assert!(matches!(
            service.allocate_target_path("", "png"),
            Err(StorageError::MissingExportName)
        ));
    }

    #[test]
    fn save_export_overwrites_and_leaves_no_partial_file() {
        let dir = std::env::temp_dir().join("photo-editor-storage-test");
        let service = StorageService::with_paths(dir.clone());

        let first = service.save_export(&exported(b"first"), "out").unwrap();
        let second = service.save_export(&exported(b"second"), "out").unwrap();
        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second).unwrap(), b"second");
        assert!(!partial_path(&second).exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn read_source_rejects_oversized_files() {
        let path = std::env::temp_dir().join("photo-editor-read-source-test.bin");
        std::fs::write(&path, [0_u8; 32]).unwrap();

        assert_eq!(read_source(&path, 32).unwrap().len(), 32);
        let err = read_source(&path, 31).unwrap_err();
        assert!(matches!(err, StorageError::FileTooLarge { size: 32, limit: 31, .. }));
        let _ = std::fs::remove_file(path);
    }
}
