//! Abstract interfaces for voxtab tables
//!
//! Traits are pure interfaces; concrete readers live in the `voxtab` crate.

pub mod scalar;
pub mod table;

pub use scalar::Scalar;
pub use table::VoxelTable;
