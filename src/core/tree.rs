//! Workspace tree abstraction.
//!
//! Generators never touch the OS filesystem directly; they read and write
//! workspace-relative paths (forward slashes, no leading `/`) through a
//! [`Tree`]. [`FsTree`] maps onto a directory on disk, [`MemoryTree`] keeps
//! everything in memory, and [`StagingTree`] buffers writes over another tree
//! until they are committed.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::utils::{io, paths};

/// Trait for workspace file operations - on disk or in memory
pub trait Tree {
    /// Read a file as UTF-8. `Ok(None)` when it does not exist.
    fn read(&self, path: &str) -> Result<Option<String>>;
    /// Create or overwrite a file, creating parent directories as needed.
    fn write(&mut self, path: &str, content: &str) -> Result<()>;
    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &str) -> bool;
    fn is_file(&self, path: &str) -> bool;
    /// Whether `path` is a symbolic link. Trees without links never report one.
    fn is_symlink(&self, _path: &str) -> bool {
        false
    }
    /// Names (not paths) of the entries directly under `dir`, sorted.
    /// A missing directory has no children.
    fn children(&self, dir: &str) -> Result<Vec<String>>;
}

/// Read and deserialize a JSON file from the tree.
///
/// A missing file is an IO error; malformed content is `config.invalid_json`.
pub fn read_json<T, R>(tree: &R, path: &str) -> Result<T>
where
    T: DeserializeOwned,
    R: Tree + ?Sized,
{
    let content = tree.read(path)?.ok_or_else(|| {
        Error::internal_io(
            format!("Cannot find {}", path),
            Some("read json".to_string()),
        )
    })?;

    serde_json::from_str(&content).map_err(|e| Error::config_invalid_json(path, e))
}

/// Tree paths are workspace-relative; strip any leading `/` after normalizing.
fn tree_path(path: &str) -> String {
    paths::normalize_path(path).trim_start_matches('/').to_string()
}

/// Entry names directly under `dir`, derived from a set of file paths.
fn children_from_keys<'a>(keys: impl Iterator<Item = &'a String>, dir: &str) -> BTreeSet<String> {
    let dir = tree_path(dir);
    keys.filter_map(|key| {
        let rest = if dir.is_empty() {
            key.as_str()
        } else {
            key.strip_prefix(&dir)?.strip_prefix('/')?
        };
        rest.split('/').next().map(str::to_string)
    })
    .collect()
}

fn is_dir_in_keys<'a>(mut keys: impl Iterator<Item = &'a String>, path: &str) -> bool {
    let prefix = format!("{}/", path);
    keys.any(|key| key.starts_with(&prefix))
}

// ============================================================================
// Disk
// ============================================================================

/// Tree rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct FsTree {
    root: PathBuf,
}

impl FsTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, path: &str) -> PathBuf {
        let relative = tree_path(path);
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

impl Tree for FsTree {
    fn read(&self, path: &str) -> Result<Option<String>> {
        io::read_file_optional(&self.absolute(path), &format!("read {}", path))
    }

    fn write(&mut self, path: &str, content: &str) -> Result<()> {
        io::write_file_atomic(&self.absolute(path), content, &format!("write {}", path))
    }

    fn exists(&self, path: &str) -> bool {
        self.absolute(path).exists()
    }

    fn is_file(&self, path: &str) -> bool {
        self.absolute(path).is_file()
    }

    fn is_symlink(&self, path: &str) -> bool {
        fs::symlink_metadata(self.absolute(path))
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn children(&self, dir: &str) -> Result<Vec<String>> {
        let abs = self.absolute(dir);
        if !abs.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&abs)
            .map_err(|e| Error::internal_io(e.to_string(), Some(format!("list {}", dir))))?;

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        Ok(names)
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Tree held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    files: BTreeMap<String, String>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(tree_path(path), content.to_string());
        self
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Tree for MemoryTree {
    fn read(&self, path: &str) -> Result<Option<String>> {
        Ok(self.files.get(&tree_path(path)).cloned())
    }

    fn write(&mut self, path: &str, content: &str) -> Result<()> {
        let key = tree_path(path);
        if key.is_empty() {
            return Err(Error::internal_io(
                "Cannot write to the workspace root",
                Some("write file".to_string()),
            ));
        }
        self.files.insert(key, content.to_string());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        let key = tree_path(path);
        key.is_empty() || self.files.contains_key(&key) || is_dir_in_keys(self.files.keys(), &key)
    }

    fn is_file(&self, path: &str) -> bool {
        self.files.contains_key(&tree_path(path))
    }

    fn children(&self, dir: &str) -> Result<Vec<String>> {
        Ok(children_from_keys(self.files.keys(), dir).into_iter().collect())
    }
}

// ============================================================================
// Staging
// ============================================================================

/// Kind of change a staged write represents against its base tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Create,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
}

/// Buffers writes over a base tree. Reads see staged content first.
#[derive(Debug)]
pub struct StagingTree<T: Tree> {
    base: T,
    staged: BTreeMap<String, String>,
}

impl<T: Tree> StagingTree<T> {
    pub fn new(base: T) -> Self {
        Self {
            base,
            staged: BTreeMap::new(),
        }
    }

    /// Pending writes, in path order.
    pub fn changes(&self) -> Vec<FileChange> {
        self.staged
            .keys()
            .map(|path| FileChange {
                path: path.clone(),
                kind: if self.base.is_file(path) {
                    ChangeKind::Update
                } else {
                    ChangeKind::Create
                },
            })
            .collect()
    }

    /// Flush staged writes into the base tree. Returns the written paths.
    pub fn commit(&mut self) -> Result<Vec<String>> {
        let staged = std::mem::take(&mut self.staged);
        let mut written = Vec::with_capacity(staged.len());
        for (path, content) in staged {
            self.base.write(&path, &content)?;
            written.push(path);
        }
        Ok(written)
    }

    pub fn into_inner(self) -> T {
        self.base
    }
}

impl<T: Tree> Tree for StagingTree<T> {
    fn read(&self, path: &str) -> Result<Option<String>> {
        match self.staged.get(&tree_path(path)) {
            Some(content) => Ok(Some(content.clone())),
            None => self.base.read(path),
        }
    }

    fn write(&mut self, path: &str, content: &str) -> Result<()> {
        let key = tree_path(path);
        if key.is_empty() {
            return Err(Error::internal_io(
                "Cannot write to the workspace root",
                Some("stage file".to_string()),
            ));
        }
        self.staged.insert(key, content.to_string());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        let key = tree_path(path);
        self.staged.contains_key(&key)
            || is_dir_in_keys(self.staged.keys(), &key)
            || self.base.exists(path)
    }

    fn is_file(&self, path: &str) -> bool {
        self.staged.contains_key(&tree_path(path)) || self.base.is_file(path)
    }

    fn is_symlink(&self, path: &str) -> bool {
        !self.staged.contains_key(&tree_path(path)) && self.base.is_symlink(path)
    }

    fn children(&self, dir: &str) -> Result<Vec<String>> {
        let mut names: BTreeSet<String> = self.base.children(dir)?.into_iter().collect();
        names.extend(children_from_keys(self.staged.keys(), dir));
        Ok(names.into_iter().collect())
    }
}
