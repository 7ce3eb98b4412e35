//! Memory-mapped table reader
//!
//! Parses the header through the regular schema, then maps the whole file
//! read-only and serves queries straight from the mapping, without a lock.

use std::fs::File;
use std::ops::Range;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapOptions};
use tracing::debug;
use voxtab_core::{decode_values, keys, TableHeader, VoxelTable, VoxtabError, VALUE_SIZE};

use crate::config::TableConfig;
use crate::error::{TableError, TableResult};
use crate::table_file::{read_header_with, TableLayout};

/// Table file mapped into memory
#[derive(Debug)]
pub struct MmapTable {
    path: PathBuf,
    layout: TableLayout,
    mmap: Mmap,
}

impl MmapTable {
    pub fn open<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        Self::open_with(path, &TableConfig::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, config: &TableConfig) -> TableResult<Self> {
        let path = path.as_ref().to_path_buf();
        let layout = read_header_with(&path, config)?;
        let file = File::open(&path).map_err(|source| TableError::Io {
            action: "open",
            path: path.clone(),
            source,
        })?;
        // SAFETY: the mapping is read-only and owned by the table. Callers
        // must not truncate the file while it is mapped.
        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|source| TableError::Io {
            action: "map",
            path: path.clone(),
            source,
        })?;

        let payload_end = layout.payload_end();
        if payload_end > mmap.len() as u64 {
            return Err(TableError::Format {
                path,
                description: "mapped table values".to_string(),
                source: VoxtabError::PayloadSize {
                    key: keys::PAYLOAD,
                    expected: layout.header.payload_size(),
                    found: (mmap.len() as u64).saturating_sub(layout.data_offset),
                },
            });
        }
        debug!(path = %path.display(), bytes = mmap.len(), "mapped table");
        Ok(Self { path, layout, mmap })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata(&self) -> &TableHeader {
        &self.layout.header
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Byte range of `count` values starting at flat index `index`
    fn byte_range(&self, index: usize, count: usize) -> Range<usize> {
        let start = self.layout.offset_of(index as u64) as usize;
        start..start + count * VALUE_SIZE
    }

    /// Raw little-endian payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.mmap[self.byte_range(0, self.n_entries())]
    }

    /// Decode the values of one voxel into `row`, which must hold exactly
    /// `n_channels` values
    pub fn fill_row(&self, voxel: usize, row: &mut [f32]) -> TableResult<()> {
        let (n_voxels, n_channels) = self.dimensions();
        if voxel >= n_voxels {
            return Err(TableError::Core(VoxtabError::IndexOutOfBounds {
                voxel,
                channel: 0,
                n_voxels,
                n_channels,
            }));
        }
        if row.len() != n_channels {
            return Err(TableError::RangeOutOfBounds {
                index: voxel * n_channels,
                len: row.len(),
                n_entries: self.n_entries(),
            });
        }
        let bytes = &self.mmap[self.byte_range(voxel * n_channels, n_channels)];
        decode_values(bytes, row).map_err(|source| TableError::Format {
            path: self.path.clone(),
            description: "row buffer".to_string(),
            source,
        })
    }
}

impl VoxelTable for MmapTable {
    type Error = TableError;

    fn dimensions(&self) -> (usize, usize) {
        (
            self.layout.header.n_voxels as usize,
            self.layout.header.n_channels as usize,
        )
    }

    fn value(&self, voxel: usize, channel: usize) -> TableResult<f32> {
        let index = self.flat_index(voxel, channel)?;
        let bytes = &self.mmap[self.byte_range(index, 1)];
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn row(&self, voxel: usize) -> TableResult<Vec<f32>> {
        let mut row = vec![0.0; self.layout.header.n_channels as usize];
        self.fill_row(voxel, &mut row)?;
        Ok(row)
    }
}
