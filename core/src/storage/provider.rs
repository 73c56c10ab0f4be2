//! storage/provider.rs
//! Logical file name -> absolute path under an injected root directory.
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::types::StoreError;

pub trait PathProvider: Send + Sync {
    /// Directory every logical name is resolved against.
    fn root(&self) -> &Path;

    /// Summary: Map a logical name to a path inside `root`.
    /// - Rejects empty names, absolute paths and `..` components.
    fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidArgument("file name is empty".into()));
        }
        let rel = Path::new(name);
        let escapes = rel.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });
        if escapes {
            return Err(StoreError::InvalidArgument(format!("file name {:?} escapes the store root", name)));
        }
        Ok(self.root().join(rel))
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Remove a file. `Ok(false)` when it was not there.
    fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.resolve(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Provider rooted at a fixed directory.
#[derive(Clone, Debug)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PathProvider for DirectoryProvider {
    fn root(&self) -> &Path {
        &self.root
    }
}
