//! Header consistency rules
//!
//! A header is consistent when each axis upper bound matches its binning,
//! the voxel count is the product of the axis steps and the entry count is
//! voxels times channels.

use crate::error::VoxtabError;
use crate::format::{version, Axis, AxisSpec};

/// Resolve the "use latest" placeholder to a concrete version
pub const fn resolve_version(requested: u32) -> u32 {
    if requested == version::DEFAULT {
        version::LATEST
    } else {
        requested
    }
}

/// Accept only defined versions this library understands
pub const fn validate_version(found: u32) -> Result<u32, VoxtabError> {
    if found == version::UNDEFINED {
        Err(VoxtabError::UndefinedVersion)
    } else if found > version::LATEST {
        Err(VoxtabError::UnsupportedVersion {
            version: found,
            latest: version::LATEST,
        })
    } else {
        Ok(found)
    }
}

/// Check that the declared upper bound of an axis lies within `tolerance`
/// (absolute, cm) of `lower + step * n_steps`
pub fn validate_axis(axis: Axis, spec: &AxisSpec, tolerance: f64) -> Result<(), VoxtabError> {
    let expected_upper = spec.expected_upper();
    let diff = spec.upper - expected_upper;
    // NaN fails both comparisons
    if diff <= tolerance && diff >= -tolerance {
        return Ok(());
    }
    Err(VoxtabError::AxisBounds {
        axis,
        n_steps: spec.n_steps,
        step: spec.step,
        lower: spec.lower,
        upper: spec.upper,
        expected_upper,
    })
}

/// Number of voxels described by the axes
pub fn voxel_count(axes: &[AxisSpec; 3]) -> Result<u64, VoxtabError> {
    axes.iter()
        .try_fold(1u64, |acc, axis| acc.checked_mul(u64::from(axis.n_steps)))
        .ok_or(VoxtabError::CountOverflow)
}

/// Number of entries in a table of the given dimensions
pub const fn entry_count(n_voxels: u32, n_channels: u32) -> u64 {
    n_voxels as u64 * n_channels as u64
}

/// Check the declared counts against the axes
pub fn validate_counts(
    axes: &[AxisSpec; 3],
    n_voxels: u32,
    n_channels: u32,
    n_entries: u32,
) -> Result<(), VoxtabError> {
    let from_axes = voxel_count(axes)?;
    if from_axes != u64::from(n_voxels) {
        return Err(VoxtabError::VoxelCount {
            from_axes,
            declared: n_voxels,
        });
    }
    if entry_count(n_voxels, n_channels) != u64::from(n_entries) {
        return Err(VoxtabError::EntryCount {
            n_voxels,
            n_channels,
            declared: n_entries,
        });
    }
    Ok(())
}
