//! Maps request paths onto the workspace root.
//!
//! A request path is percent-decoded into raw bytes, normalized segment by
//! segment, joined onto the canonical root and then re-checked after
//! symlinks are followed. Nothing outside the root ever comes back as a
//! [`ResolvedPath`].

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::catalog::EntryKind;
use crate::error::BrowserError;

/// A validated location inside the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    fs_path: PathBuf,
    relative: PathBuf,
    kind: EntryKind,
}

impl ResolvedPath {
    /// Canonical filesystem path (symlinks followed).
    pub fn fs_path(&self) -> &Path {
        &self.fs_path
    }

    /// Normalized path relative to the root, as the client addressed it.
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver for `root`. The root is canonicalized once here and
    /// must be an existing directory.
    pub fn new(root: &Path) -> io::Result<Self> {
        let root = root.canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode and normalize a raw request path into a root-relative path
    /// without touching the filesystem.
    pub fn normalize(&self, raw_path: &str) -> Result<PathBuf, BrowserError> {
        let decoded = urlencoding::decode_binary(raw_path.as_bytes());
        let mut relative = PathBuf::new();

        for segment in decoded.split(|b| *b == b'/') {
            match segment {
                b"" | b"." => continue,
                b".." => {
                    if !relative.pop() {
                        warn!("Path traversal attempt: {:?} escapes the root", raw_path);
                        return Err(BrowserError::OutOfBounds);
                    }
                }
                name => {
                    if name.contains(&0) {
                        return Err(BrowserError::NotFound);
                    }
                    relative.push(segment_to_os(name)?);
                }
            }
        }

        Ok(relative)
    }

    /// Resolve a raw request path to an existing directory or regular file
    /// inside the root.
    pub fn resolve(&self, raw_path: &str) -> Result<ResolvedPath, BrowserError> {
        let relative = self.normalize(raw_path)?;
        let joined = self.root.join(&relative);

        if !joined.starts_with(&self.root) {
            warn!("Path resolution left the root: {:?}", joined);
            return Err(BrowserError::OutOfBounds);
        }

        let fs_path = joined.canonicalize().map_err(|e| BrowserError::from_io(&e))?;
        if !fs_path.starts_with(&self.root) {
            warn!(
                "Symlink escape attempt: {:?} resolved to {:?} which is outside {:?}",
                joined, fs_path, self.root
            );
            return Err(BrowserError::OutOfBounds);
        }

        let metadata = std::fs::metadata(&fs_path).map_err(|e| BrowserError::from_io(&e))?;
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            return Err(BrowserError::NotFound);
        };

        Ok(ResolvedPath {
            fs_path,
            relative,
            kind,
        })
    }

    /// Whether `path`, once symlinks are followed, stays inside the root.
    pub fn contains(&self, path: &Path) -> bool {
        path.canonicalize()
            .map(|p| p.starts_with(&self.root))
            .unwrap_or(false)
    }
}

#[cfg(unix)]
fn segment_to_os(segment: &[u8]) -> Result<OsString, BrowserError> {
    use std::os::unix::ffi::OsStrExt;
    Ok(std::ffi::OsStr::from_bytes(segment).to_os_string())
}

#[cfg(not(unix))]
fn segment_to_os(segment: &[u8]) -> Result<OsString, BrowserError> {
    let name = std::str::from_utf8(segment).map_err(|_| BrowserError::NotFound)?;
    if name.contains(['\\', ':']) {
        return Err(BrowserError::OutOfBounds);
    }
    Ok(OsString::from(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, PathResolver) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("sub/dir")).unwrap();
        std::fs::write(root.join("sub/file.txt"), "hello").unwrap();
        std::fs::write(root.join(".secret"), "hidden").unwrap();
        let resolver = PathResolver::new(root).unwrap();
        (temp_dir, resolver)
    }

    #[test]
    fn test_root_variants() {
        let (_dir, resolver) = workspace();

        for raw in ["/", "", "/.", "//", "/./."] {
            let resolved = resolver.resolve(raw).unwrap();
            assert!(resolved.is_root(), "{raw:?} should resolve to the root");
            assert_eq!(resolved.fs_path(), resolver.root());
            assert_eq!(resolved.kind(), EntryKind::Directory);
        }
    }

    #[test]
    fn test_resolve_file_and_directory() {
        let (_dir, resolver) = workspace();

        let file = resolver.resolve("/sub/file.txt").unwrap();
        assert_eq!(file.kind(), EntryKind::File);
        assert_eq!(file.relative(), Path::new("sub/file.txt"));

        let dir = resolver.resolve("/sub/dir/").unwrap();
        assert_eq!(dir.kind(), EntryKind::Directory);
        assert_eq!(dir.fs_path(), resolver.root().join("sub/dir"));
    }

    #[test]
    fn test_dot_dot_inside_root_is_normalized() {
        let (_dir, resolver) = workspace();

        let resolved = resolver.resolve("/sub/dir/../file.txt").unwrap();
        assert_eq!(resolved.relative(), Path::new("sub/file.txt"));
    }

    #[test]
    fn test_traversal_is_out_of_bounds() {
        let (_dir, resolver) = workspace();

        for raw in [
            "/../../../etc/passwd",
            "/..",
            "/sub/../../etc/passwd",
            "/%2e%2e/%2e%2e/etc/passwd",
            "/%2E%2E%2F%2E%2E%2Fetc%2Fpasswd",
            "/sub/%2F..%2F..%2F",
        ] {
            assert!(
                matches!(resolver.resolve(raw), Err(BrowserError::OutOfBounds)),
                "{raw:?} must be rejected"
            );
        }
    }

    #[test]
    fn test_sibling_with_shared_prefix_is_out_of_bounds() {
        let parent = TempDir::new().unwrap();
        std::fs::create_dir_all(parent.path().join("ws")).unwrap();
        std::fs::create_dir_all(parent.path().join("wsX")).unwrap();
        std::fs::write(parent.path().join("wsX/data.txt"), "x").unwrap();

        let resolver = PathResolver::new(&parent.path().join("ws")).unwrap();
        assert!(matches!(
            resolver.resolve("/../wsX/data.txt"),
            Err(BrowserError::OutOfBounds)
        ));
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let (_dir, resolver) = workspace();

        assert!(matches!(
            resolver.resolve("/nope.txt"),
            Err(BrowserError::NotFound)
        ));
        assert!(matches!(
            resolver.resolve("/sub/file.txt/inner"),
            Err(BrowserError::NotFound | BrowserError::NotADirectory)
        ));
    }

    #[test]
    fn test_encoded_null_byte_is_not_found() {
        let (_dir, resolver) = workspace();

        assert!(matches!(
            resolver.resolve("/sub/file.txt%00.png"),
            Err(BrowserError::NotFound)
        ));
    }

    #[test]
    fn test_percent_decoding() {
        let (dir, resolver) = workspace();
        std::fs::write(dir.path().join("with space.txt"), "x").unwrap();
        std::fs::write(dir.path().join("100%zz.txt"), "x").unwrap();

        let resolved = resolver.resolve("/with%20space.txt").unwrap();
        assert_eq!(resolved.relative(), Path::new("with space.txt"));

        // Malformed escapes pass through untouched
        let resolved = resolver.resolve("/100%zz.txt").unwrap();
        assert_eq!(resolved.relative(), Path::new("100%zz.txt"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_name_is_reachable() {
        use std::os::unix::ffi::OsStrExt;

        let (dir, resolver) = workspace();
        let name = std::ffi::OsStr::from_bytes(b"caf\xe9.txt");
        std::fs::write(dir.path().join(name), "latin-1").unwrap();

        let resolved = resolver.resolve("/caf%E9.txt").unwrap();
        assert_eq!(resolved.kind(), EntryKind::File);
        assert_eq!(resolved.relative().as_os_str(), name);
    }

    #[test]
    fn test_hidden_file_is_resolvable() {
        let (_dir, resolver) = workspace();

        let resolved = resolver.resolve("/.secret").unwrap();
        assert_eq!(resolved.kind(), EntryKind::File);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_out_of_bounds() {
        use std::os::unix::fs::symlink;

        let (dir, resolver) = workspace();
        let outside_dir = TempDir::new().unwrap();
        std::fs::write(outside_dir.path().join("secret.txt"), "secret data").unwrap();
        symlink(outside_dir.path(), dir.path().join("sub/escape")).unwrap();

        assert!(matches!(
            resolver.resolve("/sub/escape/secret.txt"),
            Err(BrowserError::OutOfBounds)
        ));
        assert!(matches!(
            resolver.resolve("/sub/escape/"),
            Err(BrowserError::OutOfBounds)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_inside_root_is_followed() {
        use std::os::unix::fs::symlink;

        let (dir, resolver) = workspace();
        symlink(dir.path().join("sub/dir"), dir.path().join("shortcut")).unwrap();

        let resolved = resolver.resolve("/shortcut/").unwrap();
        assert_eq!(resolved.kind(), EntryKind::Directory);
        assert_eq!(resolved.relative(), Path::new("shortcut"));
        assert_eq!(resolved.fs_path(), resolver.root().join("sub/dir"));
    }
}
