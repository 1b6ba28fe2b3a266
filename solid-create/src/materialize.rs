//! Per-entry materialization: decide what an entry becomes in the
//! destination tree, then do it.
//!
//! Every file write uses create-new semantics. A destination that already
//! exists is an [`Error::Collision`] and is left untouched, so a re-run over
//! a partially populated project stops at the first file it already wrote.

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::downgrade::{self, Dialect, DowngradeOptions};
use crate::error::{Error, Result};
use crate::walk::{Entry, EntryKind, RootMapping, Walker};

/// One step of a materialization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create a destination directory (idempotent).
    CreateDir { dest: PathBuf },
    /// Copy a file byte-for-byte under the same name.
    Copy { source: PathBuf, dest: PathBuf },
    /// Downgrade a typed source and write it under its plain-script extension.
    Downgrade {
        source: PathBuf,
        dest: PathBuf,
        dialect: Dialect,
    },
}

impl Operation {
    pub fn dest(&self) -> &Path {
        match self {
            Operation::CreateDir { dest }
            | Operation::Copy { dest, .. }
            | Operation::Downgrade { dest, .. } => dest,
        }
    }
}

/// Counts of applied operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub directories: usize,
    pub copied: usize,
    pub downgraded: usize,
}

impl Summary {
    fn record(&mut self, op: &Operation) {
        match op {
            Operation::CreateDir { .. } => self.directories += 1,
            Operation::Copy { .. } => self.copied += 1,
            Operation::Downgrade { .. } => self.downgraded += 1,
        }
    }
}

/// Decide the operation for one entry.
pub fn classify(entry: &Entry, mapping: &RootMapping) -> Result<Operation> {
    let dest = mapping.destination_for(&entry.path)?;

    let op = match entry.kind {
        EntryKind::Directory => Operation::CreateDir { dest },
        EntryKind::File => match Dialect::from_path(&entry.path) {
            Some(dialect) => Operation::Downgrade {
                source: entry.path.clone(),
                dest: dest.with_extension(dialect.plain_extension()),
                dialect,
            },
            None => Operation::Copy {
                source: entry.path.clone(),
                dest,
            },
        },
    };
    Ok(op)
}

/// Apply a single operation.
pub async fn apply(op: &Operation, options: &DowngradeOptions) -> Result<()> {
    match op {
        Operation::CreateDir { dest } => {
            fs::create_dir_all(dest)
                .await
                .map_err(|e| Error::io(dest, e))?;
        }
        Operation::Copy { source, dest } => copy_new(source, dest).await?,
        Operation::Downgrade {
            source,
            dest,
            dialect,
        } => {
            let text = fs::read_to_string(source)
                .await
                .map_err(|e| Error::io(source, e))?;
            let code =
                downgrade::downgrade(&text, *dialect, options).map_err(|e| e.with_path(source))?;
            write_new(dest, code.as_bytes()).await?;
        }
    }
    Ok(())
}

/// Walk the tree under `mapping` and apply every operation in order. The
/// destination root is created when missing.
pub async fn materialize(mapping: RootMapping, options: &DowngradeOptions) -> Result<Summary> {
    let dest = mapping.dest().to_path_buf();
    let mut walker = Walker::open(mapping).await?;
    fs::create_dir_all(&dest)
        .await
        .map_err(|e| Error::io(&dest, e))?;
    let mut summary = Summary::default();

    while let Some(op) = walker.next().await? {
        tracing::debug!(?op, "materialize");
        apply(&op, options).await?;
        summary.record(&op);
    }
    Ok(summary)
}

/// Write `contents` to a file that must not exist yet.
pub async fn write_new(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    file.write_all(contents)
        .await
        .map_err(|e| Error::io(path, e))?;
    file.flush().await.map_err(|e| Error::io(path, e))?;
    Ok(())
}

async fn copy_new(source: &Path, dest: &Path) -> Result<()> {
    let mut reader = fs::File::open(source)
        .await
        .map_err(|e| Error::io(source, e))?;
    let permissions = reader
        .metadata()
        .await
        .map_err(|e| Error::io(source, e))?
        .permissions();

    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .await
        .map_err(|e| Error::io(dest, e))?;
    tokio::io::copy(&mut reader, &mut writer)
        .await
        .map_err(|e| Error::io(dest, e))?;
    writer.flush().await.map_err(|e| Error::io(dest, e))?;

    fs::set_permissions(dest, permissions)
        .await
        .map_err(|e| Error::io(dest, e))?;
    Ok(())
}
