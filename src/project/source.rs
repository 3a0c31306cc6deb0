//! Source providers: where candidate files come from.
//!
//! The generator never calls the filesystem directly. Everything goes
//! through [`SourceProvider`], so overlay or URI-addressed sources behave
//! exactly like files on disk.

use std::io;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{trace, warn};
use walkdir::WalkDir;

use super::path::{collapse_slashes, is_stream_uri, normalize_separators};
use crate::error::{Error, Result};

/// Enumeration, content access and canonical identity for candidate files.
pub trait SourceProvider: Send + Sync {
    /// List the files under `root` in a stable order.
    ///
    /// A root that names a single file yields just that file. A root that
    /// does not exist fails with [`Error::RootNotFound`].
    fn enumerate(&self, root: &str) -> Result<Vec<String>>;

    /// Full contents of `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Canonical identity of `path`, used as the recorded location and for
    /// duplicate-scan detection.
    fn canonicalize(&self, path: &str) -> Result<String>;
}

// ============================================================================
// NATIVE FILESYSTEM
// ============================================================================

/// Files on the local disk, walked with `walkdir` in file-name order.
///
/// Symbolic links are followed by default, so linked sources are indexed
/// under their canonical path.
#[derive(Clone, Debug)]
pub struct NativeFs {
    follow_links: bool,
}

impl Default for NativeFs {
    fn default() -> Self {
        Self { follow_links: true }
    }
}

impl NativeFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether to follow symbolic links while walking directories. When
    /// off, linked files and directories are skipped.
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }
}

impl SourceProvider for NativeFs {
    fn enumerate(&self, root: &str) -> Result<Vec<String>> {
        let path = Path::new(root);

        if path.is_file() {
            return Ok(vec![root.to_string()]);
        }
        if !path.is_dir() {
            return Err(Error::RootNotFound {
                path: root.to_string(),
            });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(path)
            .follow_links(self.follow_links)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.loop_ancestor().is_some() => {
                    warn!(root, error = %err, "skipping symlink loop");
                    continue;
                }
                Err(source) => {
                    return Err(Error::Walk {
                        path: root.to_string(),
                        source,
                    });
                }
            };
            if entry.file_type().is_file() {
                files.push(normalize_separators(&entry.path().to_string_lossy()));
            }
        }

        trace!(root, count = files.len(), "enumerated directory");
        Ok(files)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        if is_stream_uri(path) {
            return Err(Error::read(
                path,
                io::Error::new(io::ErrorKind::Unsupported, "stream URIs need a custom provider"),
            ));
        }
        std::fs::read(path).map_err(|source| Error::read(path, source))
    }

    fn canonicalize(&self, path: &str) -> Result<String> {
        if is_stream_uri(path) {
            return Ok(collapse_slashes(path));
        }
        let real = std::fs::canonicalize(path).map_err(|source| Error::read(path, source))?;
        Ok(normalize_separators(&real.to_string_lossy()))
    }
}

// ============================================================================
// IN-MEMORY OVERLAY
// ============================================================================

/// A virtual file tree keyed by `/`-separated path or URI.
///
/// Directories are implicit: a root names a directory when some file key
/// lives under it.
#[derive(Clone, Debug, Default)]
pub struct MemoryFs {
    files: IndexMap<String, Arc<[u8]>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: &str, contents: impl AsRef<[u8]>) {
        self.files
            .insert(collapse_slashes(path), Arc::from(contents.as_ref()));
    }

    /// Builder form of [`MemoryFs::insert`].
    pub fn with_file(mut self, path: &str, contents: impl AsRef<[u8]>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Remove a file, returning its contents.
    pub fn remove(&mut self, path: &str) -> Option<Arc<[u8]>> {
        self.files.shift_remove(&collapse_slashes(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(&collapse_slashes(path))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceProvider for MemoryFs {
    fn enumerate(&self, root: &str) -> Result<Vec<String>> {
        let root = collapse_slashes(root);
        if self.files.contains_key(&root) {
            return Ok(vec![root]);
        }

        let prefix = format!("{}/", root.trim_end_matches('/'));
        let mut files: Vec<String> = self
            .files
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();

        if files.is_empty() {
            return Err(Error::RootNotFound { path: root });
        }
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .get(&collapse_slashes(path))
            .map(|contents| contents.to_vec())
            .ok_or_else(|| Error::read(path, io::Error::from(io::ErrorKind::NotFound)))
    }

    fn canonicalize(&self, path: &str) -> Result<String> {
        let path = collapse_slashes(path);
        let dir_prefix = format!("{}/", path.trim_end_matches('/'));

        if self.files.contains_key(&path) || self.files.keys().any(|key| key.starts_with(&dir_prefix)) {
            Ok(path)
        } else {
            Err(Error::read(path, io::Error::from(io::ErrorKind::NotFound)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryFs {
        MemoryFs::new()
            .with_file("vfs://app/src/B.php", "<?php class B {}")
            .with_file("vfs://app/src/A.php", "<?php class A {}")
            .with_file("vfs://app/lib/C.php", "<?php class C {}")
    }

    #[test]
    fn test_memory_enumerate_sorted() {
        let fs = sample();
        let files = fs.enumerate("vfs://app/src").unwrap();

        assert_eq!(files, vec!["vfs://app/src/A.php", "vfs://app/src/B.php"]);
    }

    #[test]
    fn test_memory_enumerate_single_file() {
        let fs = sample();

        assert_eq!(
            fs.enumerate("vfs://app//lib/C.php").unwrap(),
            vec!["vfs://app/lib/C.php"]
        );
    }

    #[test]
    fn test_memory_enumerate_missing_root() {
        let fs = sample();
        let err = fs.enumerate("vfs://app/nope").unwrap_err();

        assert!(matches!(err, Error::RootNotFound { .. }));
    }

    #[test]
    fn test_memory_read_and_remove() {
        let mut fs = sample();

        assert_eq!(fs.read("vfs://app/src/A.php").unwrap(), b"<?php class A {}");
        assert!(fs.remove("vfs://app/src/A.php").is_some());
        assert!(fs.read("vfs://app/src/A.php").unwrap_err().is_not_found());
        assert_eq!(fs.len(), 2);
    }

    #[test]
    fn test_native_missing_root() {
        let err = NativeFs::new()
            .enumerate("/definitely/not/a/real/classmap/root")
            .unwrap_err();

        assert!(matches!(err, Error::RootNotFound { .. }));
    }

    #[cfg(unix)]
    fn linked_tree() -> (tempfile::TempDir, String) {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        let proj = dir.path().join("proj");
        std::fs::create_dir_all(&real).unwrap();
        std::fs::create_dir_all(&proj).unwrap();
        std::fs::write(real.join("Linked.php"), "<?php class Linked {}").unwrap();
        symlink(real.join("Linked.php"), proj.join("Linked.php")).unwrap();
        symlink(dir.path(), proj.join("loop")).unwrap();

        let root = normalize_separators(&proj.to_string_lossy());
        (dir, root)
    }

    #[cfg(unix)]
    #[test]
    fn test_native_follows_links_by_default() {
        let (_dir, root) = linked_tree();
        let fs = NativeFs::new();

        let files = fs.enumerate(&root).unwrap();
        let linked: Vec<&String> = files.iter().filter(|f| f.ends_with("/Linked.php")).collect();
        assert!(linked.iter().any(|f| f.starts_with(&root)));

        let canonical = fs.canonicalize(&format!("{root}/Linked.php")).unwrap();
        assert!(canonical.ends_with("/real/Linked.php"));
    }

    #[cfg(unix)]
    #[test]
    fn test_native_without_links_skips_them() {
        let (_dir, root) = linked_tree();
        let files = NativeFs::new().follow_links(false).enumerate(&root).unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn test_native_stream_canonicalize() {
        let fs = NativeFs::new();

        assert_eq!(
            fs.canonicalize("phar://lib.phar//src/A.php").unwrap(),
            "phar://lib.phar/src/A.php"
        );
    }
}
