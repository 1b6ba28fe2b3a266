//! Directory traversal.
//!
//! [`list`] enumerates one level of a directory. [`Walker`] drives a whole
//! tree from an explicit stack of open directory streams and yields one
//! [`Operation`] per entry, so "how to traverse" stays separate from
//! "what to do per entry" ([`crate::materialize`]).

use std::fs::FileType;
use std::path::{Component, Path, PathBuf};

use tokio::fs::{self, ReadDir};

use crate::error::{Error, Result};
use crate::materialize::{self, Operation};

/// What a directory entry is. Symlinks and special files have no kind and
/// are skipped by the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    fn from_file_type(file_type: FileType) -> Option<Self> {
        if file_type.is_dir() {
            Some(EntryKind::Directory)
        } else if file_type.is_file() {
            Some(EntryKind::File)
        } else {
            None
        }
    }
}

/// A single directory entry observed during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    /// The final path component as UTF-8, lossily.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Explicit mapping from a source root to a destination root.
///
/// Destination paths are derived structurally: the entry's path relative to
/// the source root is joined onto the destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootMapping {
    source: PathBuf,
    dest: PathBuf,
}

impl RootMapping {
    /// Both roots are made absolute and lexically normalized.
    ///
    /// # Errors
    ///
    /// - [`Error::SameRoot`] when both resolve to the same directory.
    /// - [`Error::NestedRoot`] when the destination lies inside the source;
    ///   the walk would then visit its own output.
    pub fn new(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<Self> {
        let source = absolutize(source.as_ref())?;
        let dest = absolutize(dest.as_ref())?;

        if source == dest {
            return Err(Error::SameRoot { path: source });
        }
        if dest.starts_with(&source) {
            return Err(Error::NestedRoot {
                source_root: source,
                dest,
            });
        }

        Ok(RootMapping { source, dest })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Destination path for a path under the source root.
    pub fn destination_for(&self, path: &Path) -> Result<PathBuf> {
        let relative = path
            .strip_prefix(&self.source)
            .map_err(|_| Error::OutsideRoot {
                path: path.to_path_buf(),
            })?;
        Ok(self.dest.join(relative))
    }
}

/// Resolve `path` against the current directory and fold `.`/`..`.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| Error::io(path, e))?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

async fn open_dir(path: &Path) -> Result<ReadDir> {
    fs::read_dir(path).await.map_err(|e| Error::io(path, e))
}

/// List the immediate entries of `dir` without recursing.
///
/// The path is resolved to absolute form first. Order is whatever the
/// filesystem yields.
pub async fn list(dir: impl AsRef<Path>) -> Result<Vec<Entry>> {
    let dir = absolutize(dir.as_ref())?;
    let mut stream = open_dir(&dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = next_entry(&mut stream, &dir).await? {
        entries.push(entry);
    }
    Ok(entries)
}

/// Next entry with a known kind; skips symlinks and special files.
async fn next_entry(stream: &mut ReadDir, dir: &Path) -> Result<Option<Entry>> {
    loop {
        let Some(entry) = stream.next_entry().await.map_err(|e| Error::io(dir, e))? else {
            return Ok(None);
        };
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(|e| Error::io(&path, e))?;

        match EntryKind::from_file_type(file_type) {
            Some(kind) => return Ok(Some(Entry { path, kind })),
            None => tracing::debug!(path = %path.display(), "skipping non-regular entry"),
        }
    }
}

/// Depth-first worklist walk over a source tree.
///
/// Each call to [`Walker::next`] reads at most one directory entry. A
/// directory's [`Operation::CreateDir`] is yielded before any of its
/// contents.
pub struct Walker {
    mapping: RootMapping,
    stack: Vec<(PathBuf, ReadDir)>,
}

impl Walker {
    /// # Errors
    ///
    /// [`Error::MissingPath`] if the source root does not exist; an
    /// [`Error::Io`] if it is not a directory.
    pub async fn open(mapping: RootMapping) -> Result<Self> {
        let root = mapping.source().to_path_buf();
        let stream = open_dir(&root).await?;
        Ok(Walker {
            mapping,
            stack: vec![(root, stream)],
        })
    }

    pub fn mapping(&self) -> &RootMapping {
        &self.mapping
    }

    pub async fn next(&mut self) -> Result<Option<Operation>> {
        while let Some((dir, stream)) = self.stack.last_mut() {
            let Some(entry) = next_entry(stream, dir).await? else {
                self.stack.pop();
                continue;
            };

            let op = materialize::classify(&entry, &self.mapping)?;
            if entry.kind == EntryKind::Directory {
                let stream = open_dir(&entry.path).await?;
                self.stack.push((entry.path, stream));
            }
            return Ok(Some(op));
        }
        Ok(None)
    }
}

/// Collect every operation for the tree under `mapping` without applying any.
pub async fn plan(mapping: RootMapping) -> Result<Vec<Operation>> {
    let mut walker = Walker::open(mapping).await?;
    let mut ops = Vec::new();
    while let Some(op) = walker.next().await? {
        ops.push(op);
    }
    Ok(ops)
}
