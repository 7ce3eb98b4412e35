//! Query interface shared by every voxel table backend

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::error::VoxtabError;

/// Dense `voxel x channel` table of `f32` values
///
/// Values are laid out voxel-major: the flat index of a cell is
/// `voxel * n_channels + channel`.
pub trait VoxelTable {
    /// Error returned by a failed query
    type Error: From<VoxtabError>;

    /// Table dimensions as (voxels, channels)
    fn dimensions(&self) -> (usize, usize);

    /// Value stored for one channel of one voxel
    fn value(&self, voxel: usize, channel: usize) -> Result<f32, Self::Error>;

    /// All channel values of one voxel, in channel order
    #[cfg(feature = "alloc")]
    fn row(&self, voxel: usize) -> Result<Vec<f32>, Self::Error>;

    /// Total number of stored values
    fn n_entries(&self) -> usize {
        let (n_voxels, n_channels) = self.dimensions();
        n_voxels * n_channels
    }

    /// Flat index of a cell, checked against the dimensions
    fn flat_index(&self, voxel: usize, channel: usize) -> Result<usize, VoxtabError> {
        let (n_voxels, n_channels) = self.dimensions();
        if voxel >= n_voxels || channel >= n_channels {
            return Err(VoxtabError::IndexOutOfBounds {
                voxel,
                channel,
                n_voxels,
                n_channels,
            });
        }
        Ok(voxel * n_channels + channel)
    }
}
