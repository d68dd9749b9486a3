//! Error types for option validation and traversal

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Incoherent command-line options. Fatal: no traversal is performed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("-H requires -l")]
    HumanWithoutLong,

    #[error("depth must be -1 or a number >= 0, got {0}")]
    InvalidDepth(i64),
}

/// A failure local to one path during traversal.
///
/// These are reported through [`crate::output::ListingOutput::diagnostic`]
/// and never abort the walk.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The path could not be stat-ed.
    #[error("{}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory could not be opened for listing.
    #[error("{}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An individual entry of an open directory could not be read.
    #[error("{}: {source}", path.display())]
    ReadDirEntry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    pub fn metadata(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Metadata {
            path: path.into(),
            source,
        }
    }

    pub fn read_dir(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    pub fn read_dir_entry(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadDirEntry {
            path: path.into(),
            source,
        }
    }

    /// The underlying system error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::Metadata { source, .. }
            | Self::ReadDir { source, .. }
            | Self::ReadDirEntry { source, .. } => source,
        }
    }

    /// The path this error is keyed by.
    pub fn path(&self) -> &Path {
        match self {
            Self::Metadata { path, .. }
            | Self::ReadDir { path, .. }
            | Self::ReadDirEntry { path, .. } => path,
        }
    }
}
