//! Format validation utilities for voxtab files
//!
//! This module contains pure validation functions with no I/O dependencies:
//! block alignment arithmetic and the header consistency rules.

pub mod alignment;
pub mod consistency;

pub use alignment::{align_to_boundary, align_to_word, word_padding};
pub use consistency::{
    entry_count, resolve_version, validate_axis, validate_counts, validate_version, voxel_count,
};
