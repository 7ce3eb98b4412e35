//! voxtab - Voxel Table Files with Lazy Random Access
//!
//! This library stores a dense table of `f32` values indexed by
//! (voxel, channel) in a versioned file made of key-tagged, word-aligned
//! blocks, and reads it back lazily from many threads at once.
//!
//! ## Architecture
//!
//! - **voxtab-core**: block vocabulary, header model and validation (no I/O)
//! - **voxtab**: block codec over streams, table file schema, readers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use voxtab::{write_file, AxisSpec, TableHandle, TableHeader};
//!
//! fn example() -> Result<(), voxtab::TableError> {
//!     let axes = [
//!         AxisSpec::from_steps(-100.0, 10.0, 20),
//!         AxisSpec::from_steps(-100.0, 10.0, 20),
//!         AxisSpec::from_steps(0.0, 25.0, 40),
//!     ];
//!     let header = TableHeader::new("example", 90, axes)?;
//!     let values = vec![0.0f32; header.n_entries as usize];
//!     write_file("table.vxt", &header, &values)?;
//!
//!     let table = TableHandle::open("table.vxt")?;
//!     let row = table.row(1234)?;
//!     println!("voxel 1234, channel 5 = {}", table.value(1234, 5)?);
//!     assert_eq!(row.len(), 90);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Lazy reads**: every query is one seek and one read, nothing is cached
//! - **Thread safety**: a [`TableHandle`] can be shared across threads
//! - **Memory mapping**: [`MmapTable`] serves the same queries from a mapping
//! - **Checked writes**: headers are validated before any byte is written

// Re-export core abstractions and format definitions
pub use voxtab_core::{
    // Core traits
    Scalar, VoxelTable,
    // Format definitions
    Axis, AxisSpec, Block, BlockInfo, BlockKind, MagicKey, MemoryTable, Number, NumberKind,
    TableHeader,
    // Error handling
    ErrorCategory, VoxtabError,
    // Constants
    keys, version, DEFAULT_AXIS_TOLERANCE, VALUE_SIZE, WORD_SIZE,
};

// Implementation modules
pub mod block_file;
pub mod codec;
pub mod config;
pub mod error;
pub mod lazy_reader;
#[cfg(feature = "mmap")]
pub mod mmap_backend;
pub mod table_file;

// Public exports
pub use block_file::BlockFile;
pub use config::TableConfig;
pub use error::{ErrorKind, TableError, TableResult};
pub use lazy_reader::TableHandle;
pub use table_file::{
    probe, read_header, read_header_with, read_table, read_table_with, write_data, write_file,
    write_file_with, write_footer, write_header, TableLayout, TableWriter, WriteState,
};

#[cfg(feature = "mmap")]
pub use mmap_backend::MmapTable;
