//! Error kinds surfaced while building and rendering a series.

use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures that abort a run.
///
/// A missing snapshot file or an empty `tab_infos` list is not an error;
/// those indices contribute a zero to the series instead.
#[derive(Debug, Error)]
pub enum PlotError {
    /// A snapshot exists but could not be read
    #[error("failed to read snapshot {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A snapshot was read but is not usable JSON
    #[error("failed to parse snapshot {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    /// The chart or export could not be written
    #[error("failed to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },
}

impl PlotError {
    pub fn parse(path: &Path, reason: impl Display) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: &Path, reason: impl Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Stable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileRead { .. } => "file-read-error",
            Self::Parse { .. } => "parse-error",
            Self::Write { .. } => "write-error",
        }
    }

    /// Path of the file that caused the failure
    pub fn path(&self) -> &Path {
        match self {
            Self::FileRead { path, .. } | Self::Parse { path, .. } | Self::Write { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlotError>;
