//! Binary format definitions for voxtab files
//!
//! This module contains pure data structure definitions for the block wire
//! format. No I/O operations - only encoding rules.

pub mod axis;
#[cfg(feature = "alloc")]
pub mod block;
pub mod block_info;
pub mod constants;
#[cfg(feature = "alloc")]
pub mod header;
pub mod key;
pub mod number;
#[cfg(feature = "alloc")]
pub mod payload;

#[cfg(feature = "alloc")]
pub use block::{decode_string, Block, BlockKind};
pub use axis::{Axis, AxisKeys, AxisSpec};
pub use block_info::BlockInfo;
pub use constants::{keys, version, DEFAULT_AXIS_TOLERANCE, VALUE_SIZE, WORD_SIZE};
#[cfg(feature = "alloc")]
pub use payload::{decode_values, fix_value_order, values_as_bytes_mut, values_as_le_bytes};
#[cfg(feature = "alloc")]
pub use header::TableHeader;
pub use key::MagicKey;
pub use number::{Number, NumberKind};
