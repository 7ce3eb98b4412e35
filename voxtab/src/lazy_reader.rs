//! Lazy, thread-safe random access to table values
//!
//! [`TableHandle`] parses the header once and then answers every query with
//! a seek and a read on its own file handle. Nothing is cached. The handle
//! is shared between threads by reference; a mutex makes each seek+read pair
//! atomic.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};
use voxtab_core::{fix_value_order, values_as_bytes_mut, TableHeader, VoxelTable, VoxtabError};

use crate::config::TableConfig;
use crate::error::{TableError, TableResult};
use crate::table_file::{read_header_with, TableLayout};

/// Open table file serving point and row queries
#[derive(Debug)]
pub struct TableHandle {
    path: PathBuf,
    layout: TableLayout,
    file: Mutex<File>,
}

impl TableHandle {
    /// Parse and validate the header of `path` and keep the file open
    pub fn open<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        Self::open_with(path, &TableConfig::default())
    }

    /// [`TableHandle::open`] with explicit configuration
    pub fn open_with<P: AsRef<Path>>(path: P, config: &TableConfig) -> TableResult<Self> {
        let path = path.as_ref().to_path_buf();
        let layout = read_header_with(&path, config)?;
        let file = File::open(&path).map_err(|source| TableError::Io {
            action: "open",
            path: path.clone(),
            source,
        })?;
        debug!(
            path = %path.display(),
            n_voxels = layout.header.n_voxels,
            n_channels = layout.header.n_channels,
            "opened table"
        );
        Ok(Self {
            path,
            layout,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header of the open table
    pub fn metadata(&self) -> &TableHeader {
        &self.layout.header
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn n_voxels(&self) -> usize {
        self.layout.header.n_voxels as usize
    }

    pub fn n_channels(&self) -> usize {
        self.layout.header.n_channels as usize
    }

    pub fn n_entries(&self) -> usize {
        self.layout.header.n_entries as usize
    }

    /// Absolute file offset of the first value
    pub fn data_offset(&self) -> u64 {
        self.layout.data_offset
    }

    /// Zeroed buffer sized for one row
    pub fn make_row_buffer(&self) -> Vec<f32> {
        vec![0.0; self.n_channels()]
    }

    /// Value of one channel of one voxel
    pub fn value(&self, voxel: usize, channel: usize) -> TableResult<f32> {
        let index = self.flat_index(voxel, channel)?;
        let mut value = [0.0f32];
        self.read_at(index, &mut value, voxel, channel)?;
        Ok(value[0])
    }

    /// All channel values of one voxel
    pub fn row(&self, voxel: usize) -> TableResult<Vec<f32>> {
        let mut row = self.make_row_buffer();
        self.fill_row(voxel, &mut row)?;
        Ok(row)
    }

    /// Read the values of one voxel into `row`, which must hold exactly
    /// `n_channels` values
    pub fn fill_row(&self, voxel: usize, row: &mut [f32]) -> TableResult<()> {
        if voxel >= self.n_voxels() {
            return Err(self.out_of_bounds(voxel, 0));
        }
        if row.len() != self.n_channels() {
            return Err(TableError::RangeOutOfBounds {
                index: voxel * self.n_channels(),
                len: row.len(),
                n_entries: self.n_entries(),
            });
        }
        self.read_at(voxel * self.n_channels(), row, voxel, 0)
    }

    /// Read `buf.len()` consecutive values starting at flat index `index`
    pub fn read_values(&self, index: usize, buf: &mut [f32]) -> TableResult<()> {
        let in_range = index
            .checked_add(buf.len())
            .is_some_and(|end| end <= self.n_entries());
        if !in_range {
            return Err(TableError::RangeOutOfBounds {
                index,
                len: buf.len(),
                n_entries: self.n_entries(),
            });
        }
        let (voxel, channel) = match self.n_channels() {
            0 => (index, 0),
            n => (index / n, index % n),
        };
        self.read_at(index, buf, voxel, channel)
    }

    fn out_of_bounds(&self, voxel: usize, channel: usize) -> TableError {
        TableError::Core(VoxtabError::IndexOutOfBounds {
            voxel,
            channel,
            n_voxels: self.n_voxels(),
            n_channels: self.n_channels(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, File> {
        // Every read seeks first, so a poisoned handle is still usable
        self.file.lock().unwrap_or_else(|poisoned| {
            warn!(path = %self.path.display(), "recovering poisoned table lock");
            poisoned.into_inner()
        })
    }

    /// Seek to value `index` and fill `buf`, both under one lock
    fn read_at(
        &self,
        index: usize,
        buf: &mut [f32],
        voxel: usize,
        channel: usize,
    ) -> TableResult<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let offset = self.layout.offset_of(index as u64);
        let bytes = values_as_bytes_mut(buf);
        let result = {
            let mut file = self.lock();
            file.seek(SeekFrom::Start(offset))
                .and_then(|_| file.read_exact(bytes))
        };
        result.map_err(|source: io::Error| TableError::Read {
            path: self.path.clone(),
            voxel,
            channel,
            source,
        })?;
        fix_value_order(buf);
        Ok(())
    }
}

impl VoxelTable for TableHandle {
    type Error = TableError;

    fn dimensions(&self) -> (usize, usize) {
        (self.n_voxels(), self.n_channels())
    }

    fn value(&self, voxel: usize, channel: usize) -> TableResult<f32> {
        TableHandle::value(self, voxel, channel)
    }

    fn row(&self, voxel: usize) -> TableResult<Vec<f32>> {
        TableHandle::row(self, voxel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::table_file::write_file;
    use tempfile::TempDir;
    use voxtab_core::AxisSpec;

    fn write_small(dir: &TempDir) -> PathBuf {
        let axes = [
            AxisSpec::from_steps(0.0, 1.0, 3),
            AxisSpec::from_steps(0.0, 1.0, 1),
            AxisSpec::from_steps(0.0, 1.0, 1),
        ];
        let header = TableHeader::new("small", 4, axes).unwrap();
        let values: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let path = dir.path().join("small.vxt");
        write_file(&path, &header, &values).unwrap();
        path
    }

    #[test]
    fn test_point_and_row_queries() {
        let dir = TempDir::new().unwrap();
        let table = TableHandle::open(write_small(&dir)).unwrap();
        assert_eq!(table.dimensions(), (3, 4));
        assert_eq!(table.value(2, 1).unwrap(), 9.0);
        assert_eq!(table.row(2).unwrap(), [8.0, 9.0, 10.0, 11.0]);
        assert_eq!(table.value(0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_out_of_bounds_queries() {
        let dir = TempDir::new().unwrap();
        let table = TableHandle::open(write_small(&dir)).unwrap();
        for err in [
            table.value(3, 0).unwrap_err(),
            table.value(0, 4).unwrap_err(),
            table.row(3).unwrap_err(),
        ] {
            assert_eq!(err.kind(), ErrorKind::Usage);
        }
    }

    #[test]
    fn test_read_values_and_fill_row() {
        let dir = TempDir::new().unwrap();
        let table = TableHandle::open(write_small(&dir)).unwrap();

        let mut buf = [0.0f32; 5];
        table.read_values(3, &mut buf).unwrap();
        assert_eq!(buf, [3.0, 4.0, 5.0, 6.0, 7.0]);
        assert!(table.read_values(8, &mut buf).is_err());
        assert!(table.read_values(usize::MAX, &mut buf).is_err());

        let mut row = table.make_row_buffer();
        table.fill_row(1, &mut row).unwrap();
        assert_eq!(row, [4.0, 5.0, 6.0, 7.0]);
        assert!(table.fill_row(1, &mut buf).is_err());
    }

    #[test]
    fn test_truncated_payload_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = write_small(&dir);
        let table = TableHandle::open(&path).unwrap();
        let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_len(table.data_offset() + 8).unwrap();

        assert_eq!(table.value(0, 1).unwrap(), 1.0);
        let err = table.value(2, 3).unwrap_err();
        assert!(matches!(
            err,
            TableError::Read {
                voxel: 2,
                channel: 3,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TableHandle>();
    }
}
