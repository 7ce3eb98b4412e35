//! In-memory voxel table

use alloc::vec::Vec;

use crate::error::VoxtabError;
use crate::format::{TableHeader, DEFAULT_AXIS_TOLERANCE};
use crate::traits::VoxelTable;

/// Fully loaded table: a validated header and its values
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTable {
    header: TableHeader,
    values: Vec<f32>,
}

impl MemoryTable {
    /// Build a table, normalising and validating the header first
    pub fn new(header: TableHeader, values: Vec<f32>) -> Result<Self, VoxtabError> {
        Self::with_tolerance(header, values, DEFAULT_AXIS_TOLERANCE)
    }

    pub fn with_tolerance(
        header: TableHeader,
        values: Vec<f32>,
        tolerance: f64,
    ) -> Result<Self, VoxtabError> {
        let header = header.normalized();
        header.validate(tolerance)?;
        if values.len() as u64 != u64::from(header.n_entries) {
            return Err(VoxtabError::ValueCount {
                expected: u64::from(header.n_entries),
                found: values.len() as u64,
            });
        }
        Ok(Self { header, values })
    }

    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    /// Flat value array, voxel-major
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn into_parts(self) -> (TableHeader, Vec<f32>) {
        (self.header, self.values)
    }

    /// Borrow the values of one voxel
    pub fn row_slice(&self, voxel: usize) -> Result<&[f32], VoxtabError> {
        let (n_voxels, n_channels) = self.dimensions();
        if voxel >= n_voxels {
            return Err(VoxtabError::IndexOutOfBounds {
                voxel,
                channel: 0,
                n_voxels,
                n_channels,
            });
        }
        let start = voxel * n_channels;
        Ok(&self.values[start..start + n_channels])
    }
}

impl VoxelTable for MemoryTable {
    type Error = VoxtabError;

    fn dimensions(&self) -> (usize, usize) {
        (
            self.header.n_voxels as usize,
            self.header.n_channels as usize,
        )
    }

    fn value(&self, voxel: usize, channel: usize) -> Result<f32, VoxtabError> {
        let index = self.flat_index(voxel, channel)?;
        Ok(self.values[index])
    }

    fn row(&self, voxel: usize) -> Result<Vec<f32>, VoxtabError> {
        self.row_slice(voxel).map(<[f32]>::to_vec)
    }
}
