use std::ffi::OsString;
use std::time::UNIX_EPOCH;

use tracing::debug;

use crate::error::BrowserError;
use crate::filetypes;
use crate::resolver::{PathResolver, ResolvedPath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One visible child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Display name (lossy for names that are not valid UTF-8)
    pub name: String,
    /// Name exactly as stored on disk, used for links
    pub raw_name: OsString,
    pub kind: EntryKind,
    /// Size in bytes, files only
    pub size: Option<u64>,
    /// Seconds since the Unix epoch
    pub modified: Option<u64>,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Lowercased extension, empty for directories and extensionless files.
    pub fn extension(&self) -> String {
        if self.is_dir() {
            return String::new();
        }
        filetypes::extension_of(&self.name)
    }
}

/// Keep entries whose display name contains `needle`, ignoring case.
pub fn filter_by_name(entries: Vec<DirEntry>, needle: &str) -> Vec<DirEntry> {
    let needle = needle.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .collect()
}

/// Lists the immediate children of workspace directories.
#[derive(Debug, Clone)]
pub struct EntryCatalog {
    resolver: PathResolver,
}

impl EntryCatalog {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// List the visible children of `dir` in filesystem order.
    ///
    /// Hidden names (leading `.`) are skipped. An entry whose metadata can't
    /// be read, that is neither a directory nor a regular file, or that is a
    /// symlink leading out of the root is dropped; the rest of the listing
    /// still comes back.
    pub fn list(&self, dir: &ResolvedPath) -> Result<Vec<DirEntry>, BrowserError> {
        if dir.kind() != EntryKind::Directory {
            return Err(BrowserError::NotADirectory);
        }

        let read_dir =
            std::fs::read_dir(dir.fs_path()).map_err(|e| BrowserError::from_io(&e))?;
        let mut entries = Vec::new();

        for entry in read_dir {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Skipping unreadable entry in {:?}: {}", dir.fs_path(), e);
                    continue;
                }
            };

            let raw_name = entry.file_name();
            let name = raw_name.to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }

            let entry_path = entry.path();
            let is_symlink = entry.file_type().map(|t| t.is_symlink()).unwrap_or(false);
            if is_symlink && !self.resolver.contains(&entry_path) {
                debug!("Skipping symlink leading outside the root: {:?}", entry_path);
                continue;
            }

            // Follows symlinks; fails for dangling links and vanished entries
            let metadata = match std::fs::metadata(&entry_path) {
                Ok(m) => m,
                Err(e) => {
                    debug!("Skipping {:?}: {}", entry_path, e);
                    continue;
                }
            };

            let kind = if metadata.is_dir() {
                EntryKind::Directory
            } else if metadata.is_file() {
                EntryKind::File
            } else {
                continue;
            };

            entries.push(DirEntry {
                name,
                raw_name,
                kind,
                size: (kind == EntryKind::File).then(|| metadata.len()),
                modified: metadata.modified().ok().and_then(|t| {
                    t.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
                }),
            });
        }

        Ok(entries)
    }
}
