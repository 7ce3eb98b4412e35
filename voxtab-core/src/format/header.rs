//! Table header model
//!
//! The header is everything a voxtab file stores before the value payload:
//! format version, a free-form configuration string, the table counts and
//! the binning of the three grid axes.

use alloc::string::String;

use super::axis::{Axis, AxisSpec};
use super::constants::{version, VALUE_SIZE};
use crate::error::VoxtabError;
use crate::validation::consistency::{
    entry_count, resolve_version, validate_axis, validate_counts, validate_version, voxel_count,
};

/// Metadata describing a stored table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableHeader {
    /// Format version ([`version::DEFAULT`] until normalised)
    pub version: u32,
    /// Free-form description of how the table was produced
    pub configuration: String,
    /// Number of stored values, `n_voxels * n_channels`
    pub n_entries: u32,
    /// Values per voxel
    pub n_channels: u32,
    /// Product of the axis step counts
    pub n_voxels: u32,
    /// Binning of X, Y and Z
    pub axes: [AxisSpec; 3],
}

impl TableHeader {
    /// Create a header whose counts are derived from the axes
    ///
    /// The version is left at [`version::DEFAULT`] and resolves to the
    /// latest one when written.
    pub fn new(
        configuration: impl Into<String>,
        n_channels: u32,
        axes: [AxisSpec; 3],
    ) -> Result<Self, VoxtabError> {
        let n_voxels =
            u32::try_from(voxel_count(&axes)?).map_err(|_| VoxtabError::CountOverflow)?;
        let n_entries = u32::try_from(entry_count(n_voxels, n_channels))
            .map_err(|_| VoxtabError::CountOverflow)?;
        Ok(Self {
            version: version::DEFAULT,
            configuration: configuration.into(),
            n_entries,
            n_channels,
            n_voxels,
            axes,
        })
    }

    pub fn axis(&self, axis: Axis) -> &AxisSpec {
        &self.axes[axis.index()]
    }

    /// Replace the version placeholder with the latest version and drop
    /// trailing NULs from the configuration, which a reader cannot recover
    pub fn normalize(&mut self) {
        self.version = resolve_version(self.version);
        let len = self.configuration.trim_end_matches('\0').len();
        self.configuration.truncate(len);
    }

    /// Normalised copy of the header
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Check the version and every consistency rule
    pub fn validate(&self, tolerance: f64) -> Result<(), VoxtabError> {
        validate_version(self.version)?;
        self.validate_layout(tolerance)
    }

    /// Check the axes and counts, ignoring the version
    pub fn validate_layout(&self, tolerance: f64) -> Result<(), VoxtabError> {
        for axis in Axis::ALL {
            validate_axis(axis, self.axis(axis), tolerance)?;
        }
        validate_counts(&self.axes, self.n_voxels, self.n_channels, self.n_entries)
    }

    /// Size in bytes of the value payload
    pub fn payload_size(&self) -> u64 {
        u64::from(self.n_entries) * VALUE_SIZE as u64
    }
}

impl core::fmt::Display for TableHeader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "format version: {}", self.version)?;
        if !self.configuration.is_empty() {
            writeln!(f, "configuration: {}", self.configuration)?;
        }
        write!(
            f,
            "{} entries = {} voxels x {} channels",
            self.n_entries, self.n_voxels, self.n_channels
        )?;
        for axis in Axis::ALL {
            let spec = self.axis(axis);
            write!(
                f,
                "\n  {axis}: [{} -- {}] cm in {} steps, {} cm each",
                spec.lower, spec.upper, spec.n_steps, spec.step
            )?;
        }
        Ok(())
    }
}
