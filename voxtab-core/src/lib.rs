#![no_std]

//! voxtab-core - Voxel Table Format Definitions
//!
//! This crate provides the block vocabulary, the table header model and the
//! consistency rules of the voxtab file format. It performs no I/O; the
//! `voxtab` crate drives these definitions against real files.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod format;
#[cfg(feature = "alloc")]
pub mod memory;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
#[cfg(feature = "alloc")]
pub use memory::MemoryTable;
pub use traits::*;
pub use validation::*;
