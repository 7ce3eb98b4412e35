//! Error types for voxtab format operations

use crate::format::{Axis, MagicKey, NumberKind};

/// Broad classification of a [`VoxtabError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bytes on disk do not match the expected block structure
    Format,
    /// Header fields contradict each other
    Consistency,
    /// Format version is undefined or newer than supported
    Version,
    /// A query addressed a cell outside the table
    Bounds,
}

impl core::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ErrorCategory::Format => "format",
            ErrorCategory::Consistency => "consistency",
            ErrorCategory::Version => "version",
            ErrorCategory::Bounds => "bounds",
        };
        f.write_str(name)
    }
}

/// Errors detected while encoding, decoding or validating voxtab data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoxtabError {
    /// Block key differs from the one the schema expects at this position
    KeyMismatch { expected: MagicKey, found: MagicKey },
    /// Declared payload size is not the one the block type requires
    PayloadSize {
        key: MagicKey,
        expected: u64,
        found: u64,
    },
    /// String payload is not UTF-8
    InvalidString { key: MagicKey },
    /// Widened integer slot holds a value outside the requested type
    NumberOutOfRange { key: MagicKey, kind: NumberKind },
    /// Bookmark block declares a payload
    BookmarkPayload { key: MagicKey, size: u64 },
    /// Axis upper bound is not `lower + step * n_steps`
    AxisBounds {
        axis: Axis,
        n_steps: u32,
        step: f64,
        lower: f64,
        upper: f64,
        expected_upper: f64,
    },
    /// Declared voxel count differs from the product of the axis steps
    VoxelCount { from_axes: u64, declared: u32 },
    /// Declared entry count differs from voxels times channels
    EntryCount {
        n_voxels: u32,
        n_channels: u32,
        declared: u32,
    },
    /// A table dimension does not fit a 32-bit count
    CountOverflow,
    /// Number of supplied values differs from the declared entry count
    ValueCount { expected: u64, found: u64 },
    /// Version 0 marks an uninitialised header
    UndefinedVersion,
    /// Version newer than this library understands
    UnsupportedVersion { version: u32, latest: u32 },
    /// Cell outside the table dimensions
    IndexOutOfBounds {
        voxel: usize,
        channel: usize,
        n_voxels: usize,
        n_channels: usize,
    },
}

impl VoxtabError {
    /// Classify the error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            VoxtabError::KeyMismatch { .. }
            | VoxtabError::PayloadSize { .. }
            | VoxtabError::InvalidString { .. }
            | VoxtabError::NumberOutOfRange { .. }
            | VoxtabError::BookmarkPayload { .. } => ErrorCategory::Format,
            VoxtabError::AxisBounds { .. }
            | VoxtabError::VoxelCount { .. }
            | VoxtabError::EntryCount { .. }
            | VoxtabError::CountOverflow
            | VoxtabError::ValueCount { .. } => ErrorCategory::Consistency,
            VoxtabError::UndefinedVersion | VoxtabError::UnsupportedVersion { .. } => {
                ErrorCategory::Version
            }
            VoxtabError::IndexOutOfBounds { .. } => ErrorCategory::Bounds,
        }
    }
}

impl core::fmt::Display for VoxtabError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            VoxtabError::KeyMismatch { expected, found } => {
                write!(f, "expected block key '{expected}', found '{found}'")
            }
            VoxtabError::PayloadSize {
                key,
                expected,
                found,
            } => write!(
                f,
                "block '{key}' has a payload of {found} bytes, expected {expected}"
            ),
            VoxtabError::InvalidString { key } => {
                write!(f, "block '{key}' does not hold valid UTF-8 text")
            }
            VoxtabError::NumberOutOfRange { key, kind } => {
                write!(f, "value stored in block '{key}' does not fit {kind}")
            }
            VoxtabError::BookmarkPayload { key, size } => {
                write!(f, "bookmark '{key}' carries {size} payload bytes")
            }
            VoxtabError::AxisBounds {
                axis,
                n_steps,
                step,
                lower,
                upper,
                expected_upper,
            } => write!(
                f,
                "axis {axis} with {n_steps} x {step} cm from {lower} should end at {expected_upper}, not at {upper}"
            ),
            VoxtabError::VoxelCount {
                from_axes,
                declared,
            } => write!(
                f,
                "{declared} voxels declared, but the axes describe {from_axes}"
            ),
            VoxtabError::EntryCount {
                n_voxels,
                n_channels,
                declared,
            } => write!(
                f,
                "{declared} entries declared, expected {n_voxels} voxels x {n_channels} channels"
            ),
            VoxtabError::CountOverflow => f.write_str("table dimensions overflow a 32-bit count"),
            VoxtabError::ValueCount { expected, found } => write!(
                f,
                "{found} values supplied for a table of {expected} entries"
            ),
            VoxtabError::UndefinedVersion => f.write_str("undefined format version 0"),
            VoxtabError::UnsupportedVersion { version, latest } => write!(
                f,
                "format version {version} not supported (latest is {latest})"
            ),
            VoxtabError::IndexOutOfBounds {
                voxel,
                channel,
                n_voxels,
                n_channels,
            } => write!(
                f,
                "voxel {voxel} channel {channel} outside a table of {n_voxels} voxels x {n_channels} channels"
            ),
        }
    }
}

impl core::error::Error for VoxtabError {}

/// Result type for voxtab format operations
pub type Result<T> = core::result::Result<T, VoxtabError>;
