//! Filesystem storage adapter.
//!
//! Host-side [`StoragePort`]: one file per `namespace/key` under a root
//! directory.  Writes go to a temporary sibling first and are renamed into
//! place, so a crash leaves either the old or the new blob.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;

use crate::app::ports::StoragePort;
use crate::error::StorageError;

pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, namespace: &str, key: &str) -> PathBuf {
        self.root.join(namespace).join(format!("{key}.bin"))
    }
}

fn map_io(e: &std::io::Error) -> StorageError {
    match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound,
        ErrorKind::StorageFull => StorageError::Full,
        _ => StorageError::IoError,
    }
}

impl StoragePort for FileStorage {
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        fs::read(self.path(namespace, key)).map_err(|e| map_io(&e))
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.path(namespace, key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| map_io(&e))?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, data).map_err(|e| {
            warn!("Storage write to {} failed: {e}", tmp.display());
            map_io(&e)
        })?;
        fs::rename(&tmp, &path).map_err(|e| map_io(&e))
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(namespace, key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(&e)),
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.path(namespace, key).is_file()
    }
}
