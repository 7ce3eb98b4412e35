//! Conversion between table values and payload bytes
//!
//! The payload is a flat array of little-endian `f32`. On little-endian
//! targets the conversions are zero-copy casts.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use super::constants::{keys, VALUE_SIZE};
use crate::error::VoxtabError;

/// Payload bytes of `values`
pub fn values_as_le_bytes(values: &[f32]) -> Cow<'_, [u8]> {
    if cfg!(target_endian = "little") {
        Cow::Borrowed(bytemuck::cast_slice(values))
    } else {
        Cow::Owned(values.iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<u8>>())
    }
}

/// Byte view of a value buffer to read payload bytes into
///
/// Call [`fix_value_order`] on the buffer once the bytes are in place.
pub fn values_as_bytes_mut(values: &mut [f32]) -> &mut [u8] {
    bytemuck::cast_slice_mut(values)
}

/// Turn little-endian payload bytes read in place into native values
pub fn fix_value_order(values: &mut [f32]) {
    if cfg!(target_endian = "big") {
        for value in values {
            *value = f32::from_bits(u32::from_le(value.to_bits()));
        }
    }
}

/// Decode payload bytes into `out`; `bytes` must hold exactly
/// `out.len()` values
pub fn decode_values(bytes: &[u8], out: &mut [f32]) -> Result<(), VoxtabError> {
    let expected = (out.len() * VALUE_SIZE) as u64;
    if bytes.len() as u64 != expected {
        return Err(VoxtabError::PayloadSize {
            key: keys::PAYLOAD,
            expected,
            found: bytes.len() as u64,
        });
    }
    for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(VALUE_SIZE)) {
        *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(())
}
