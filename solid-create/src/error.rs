use std::io;
use std::path::{Path, PathBuf};

/// Errors produced while fetching, converting, or finalizing a project.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A file or directory that the step requires does not exist.
    #[error("Path not found: {}", path.display())]
    MissingPath { path: PathBuf },

    /// A write would have replaced an existing file.
    #[error("Refusing to overwrite existing file: {}", path.display())]
    Collision { path: PathBuf },

    /// The typed source could not be parsed.
    #[error("Syntax error in {} at {line}:{column} near `{snippet}`", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        snippet: String,
    },

    /// The source uses a TypeScript construct with no plain-script lowering.
    #[error("Unsupported TypeScript construct `{construct}` at line {line}")]
    Unsupported { construct: &'static str, line: usize },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Source and destination roots resolve to the same directory.
    #[error("Source and destination roots are the same directory: {}", path.display())]
    SameRoot { path: PathBuf },

    /// The destination root lies inside the source root.
    #[error("Destination {} is inside source {}", dest.display(), source_root.display())]
    NestedRoot { source_root: PathBuf, dest: PathBuf },

    /// A path handed to a root mapping is not under its source root.
    #[error("Path {} is outside the source root", path.display())]
    OutsideRoot { path: PathBuf },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Unknown template '{name}'. Available: {available}")]
    UnknownTemplate { name: String, available: String },

    /// The parser grammar could not be loaded.
    #[error("Failed to load grammar: {0}")]
    Grammar(String),

    /// The terminal prompt itself failed.
    #[error("Prompt failed: {0}")]
    Prompt(#[source] io::Error),

    /// The user dismissed a prompt.
    #[error("{message}")]
    Cancelled { message: String },
}

impl Error {
    /// Wrap an I/O error, mapping `NotFound` and `AlreadyExists` onto their
    /// dedicated variants.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Error::MissingPath { path },
            io::ErrorKind::AlreadyExists => Error::Collision { path },
            _ => Error::Io { path, source },
        }
    }

    /// Attach the file a syntax error came from. Other variants pass through.
    pub fn with_path(self, file: impl AsRef<Path>) -> Self {
        match self {
            Error::Syntax {
                line,
                column,
                snippet,
                ..
            } => Error::Syntax {
                path: file.as_ref().to_path_buf(),
                line,
                column,
                snippet,
            },
            other => other,
        }
    }

    /// `true` for the user-cancellation outcome, which is not a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
