//! Error type for voxtab file operations

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use voxtab_core::{ErrorCategory, VoxtabError};

use crate::table_file::WriteState;

/// Coarse kind of a [`TableError`], matching how callers react to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Storage failed or ended early
    Io,
    /// Bytes do not follow the block layout
    Format,
    /// Header fields contradict each other
    Consistency,
    /// Version is undefined or too new
    Version,
    /// The caller asked for something invalid
    Usage,
}

/// Errors raised while reading or writing voxtab files
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "reading {description} from '{}': expected {expected} bytes, obtained {obtained}",
        path.display()
    )]
    ShortRead {
        path: PathBuf,
        description: String,
        expected: u64,
        obtained: u64,
    },

    #[error("{description} in '{}': {source}", path.display())]
    Format {
        path: PathBuf,
        description: String,
        #[source]
        source: VoxtabError,
    },

    #[error(
        "failed to read voxel {voxel} channel {channel} from '{}': {source}",
        path.display()
    )]
    Read {
        path: PathBuf,
        voxel: usize,
        channel: usize,
        #[source]
        source: io::Error,
    },

    /// Format rule broken outside any file, e.g. a query out of bounds
    #[error("{0}")]
    Core(#[source] VoxtabError),

    #[error(
        "values {index}..{} outside a table of {n_entries} entries",
        *index as u64 + *len as u64
    )]
    RangeOutOfBounds {
        index: usize,
        len: usize,
        n_entries: usize,
    },

    #[error("cannot {step} '{}': writer is in state {state}", path.display())]
    WriteSequence {
        path: PathBuf,
        state: WriteState,
        step: &'static str,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TableError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TableError::Io { .. } | TableError::ShortRead { .. } | TableError::Read { .. } => {
                ErrorKind::Io
            }
            TableError::Format { source, .. } | TableError::Core(source) => {
                match source.category() {
                    ErrorCategory::Format => ErrorKind::Format,
                    ErrorCategory::Consistency => ErrorKind::Consistency,
                    ErrorCategory::Version => ErrorKind::Version,
                    ErrorCategory::Bounds => ErrorKind::Usage,
                }
            }
            TableError::RangeOutOfBounds { .. }
            | TableError::WriteSequence { .. }
            | TableError::Config(_) => ErrorKind::Usage,
        }
    }

    /// Underlying format error, if any
    pub fn format_error(&self) -> Option<&VoxtabError> {
        match self {
            TableError::Format { source, .. } | TableError::Core(source) => Some(source),
            _ => None,
        }
    }

    /// Whether the error means the file ended before the expected data
    pub fn is_truncation(&self) -> bool {
        matches!(self, TableError::ShortRead { .. })
    }
}

impl From<VoxtabError> for TableError {
    fn from(err: VoxtabError) -> Self {
        TableError::Core(err)
    }
}

/// Result type for voxtab file operations
pub type TableResult<T> = Result<T, TableError>;
