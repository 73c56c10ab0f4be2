//! storage/listing.rs
//! File metadata and wildcard listing below the store root.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;
use walkdir::WalkDir;

use crate::constants::MAX_NAME_INDEX;
use crate::storage::provider::PathProvider;
use crate::types::StoreError;
use crate::utils::wildcard_to_regex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    /// File name without directories.
    pub name: String,
    pub len: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl FileInfo {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            len: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }
}

/// Summary: Files under `root` whose name matches `pattern` (`*`, `?`).
/// - A missing root yields an empty list.
/// - Symlinks are not followed; unreadable entries below the root are skipped
///   with a warning.
/// - Results are sorted by path.
pub fn list_files(root: &Path, pattern: &str, recursive: bool) -> Result<Vec<FileInfo>, StoreError> {
    let re = wildcard_to_regex(pattern)
        .map_err(|e| StoreError::InvalidArgument(format!("bad pattern {:?}: {}", pattern, e)))?;

    let mut files = Vec::new();
    if !root.is_dir() {
        return Ok(files);
    }

    let walk = WalkDir::new(root)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .follow_links(false);
    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(io::Error::from(e).into()),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if re.is_match(&entry.file_name().to_string_lossy()) {
            files.push(FileInfo::from_path(entry.path())?);
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Metadata for one logical name, `None` when the file does not exist.
pub fn file_info<P: PathProvider + ?Sized>(provider: &P, name: &str) -> Result<Option<FileInfo>, StoreError> {
    let path = provider.resolve(name)?;
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(FileInfo::from_path(&path)?))
}

/// Summary: First free name of the form `stem000.ext` .. `stem999.ext`.
/// - The directory part of `name` is kept.
/// - Fails once every index is taken.
pub fn next_available_name<P: PathProvider + ?Sized>(provider: &P, name: &str) -> Result<String, StoreError> {
    let rel = Path::new(name);
    let stem = rel
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| StoreError::InvalidArgument(format!("file name {:?} has no stem", name)))?;
    let ext = rel
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = rel.parent().filter(|p| !p.as_os_str().is_empty());

    for index in 0..MAX_NAME_INDEX {
        let file = format!("{}{:03}{}", stem, index, ext);
        let candidate = match parent {
            Some(dir) => dir.join(&file).to_string_lossy().into_owned(),
            None => file,
        };
        if !provider.exists(&candidate) {
            return Ok(candidate);
        }
    }

    warn!(file = name, "name index limit reached");
    Err(StoreError::InvalidArgument(format!("no free name left for {:?}", name)))
}
