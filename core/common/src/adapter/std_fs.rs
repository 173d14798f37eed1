//! std::fs による FileSystem

use crate::error::Error;
use crate::ports::outbound::FileSystem;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

/// `<action> '<path>': <cause>` 形式の Io エラー
fn io_error(action: &str, path: &Path, e: std::io::Error) -> Error {
    Error::io_msg(format!("Failed to {} '{}': {}", action, path.display(), e))
}

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String, Error> {
        std::fs::read_to_string(path).map_err(|e| io_error("read", path, e))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), Error> {
        self.write_bytes(path, contents.as_bytes())
    }

    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<(), Error> {
        std::fs::write(path, contents).map_err(|e| io_error("write", path, e))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), Error> {
        std::fs::rename(from, to).map_err(|e| {
            Error::io_msg(format!(
                "Failed to move '{}' to '{}': {}",
                from.display(),
                to.display(),
                e
            ))
        })
    }

    fn remove_file(&self, path: &Path) -> Result<(), Error> {
        std::fs::remove_file(path).map_err(|e| io_error("remove", path, e))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Error> {
        std::fs::create_dir_all(path).map_err(|e| io_error("create directory", path, e))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Error> {
        std::fs::read_dir(path)
            .and_then(|entries| entries.map(|entry| entry.map(|e| e.path())).collect())
            .map_err(|e| io_error("list", path, e))
    }

    fn open_append(&self, path: &Path) -> Result<Box<dyn Write + Send>, Error> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| io_error("open", path, e))?;
        Ok(Box::new(file))
    }
}
