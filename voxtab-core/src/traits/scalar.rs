//! Primitive types that can be stored in a number block
//!
//! This module defines the trait that ties a Rust primitive to its
//! [`NumberKind`] and to the widened slot it occupies on disk.

use crate::error::VoxtabError;
use crate::format::{MagicKey, Number, NumberKind};

/// Trait for primitives stored as a single number block
pub trait Scalar: Copy + PartialEq + Sized + 'static {
    /// Type tag written for this primitive
    const KIND: NumberKind;

    /// Wrap the value as a [`Number`]
    fn into_number(self) -> Number;

    /// Widen to the on-disk slot; only the first `len` bytes are used
    fn to_slot(self) -> ([u8; 8], usize);

    /// Narrow a slot read from block `key`
    ///
    /// Fails when the slot has the wrong length or when the widened value
    /// does not fit `Self`.
    fn from_slot(key: MagicKey, slot: &[u8]) -> Result<Self, VoxtabError>;
}

/// Implement [`Scalar`] for a primitive stored in a slot of type `$wide`
macro_rules! impl_scalar {
    ($type:ty, $variant:ident, $wide:ty) => {
        impl Scalar for $type {
            const KIND: NumberKind = NumberKind::$variant;

            fn into_number(self) -> Number {
                Number::$variant(self)
            }

            fn to_slot(self) -> ([u8; 8], usize) {
                let wide = <$wide>::from(self).to_le_bytes();
                let mut slot = [0u8; 8];
                slot[..wide.len()].copy_from_slice(&wide);
                (slot, wide.len())
            }

            fn from_slot(key: MagicKey, slot: &[u8]) -> Result<Self, VoxtabError> {
                const SIZE: usize = core::mem::size_of::<$wide>();
                let bytes: [u8; SIZE] =
                    slot.try_into()
                        .map_err(|_| VoxtabError::PayloadSize {
                            key,
                            expected: SIZE as u64,
                            found: slot.len() as u64,
                        })?;
                <$type>::try_from(<$wide>::from_le_bytes(bytes)).map_err(|_| {
                    VoxtabError::NumberOutOfRange {
                        key,
                        kind: NumberKind::$variant,
                    }
                })
            }
        }
    };
}

impl_scalar!(u8, U8, u32);
impl_scalar!(i8, I8, i32);
impl_scalar!(u16, U16, u32);
impl_scalar!(i16, I16, i32);
impl_scalar!(u32, U32, u32);
impl_scalar!(i32, I32, i32);
impl_scalar!(u64, U64, u64);
impl_scalar!(i64, I64, i64);
impl_scalar!(f32, F32, f32);
impl_scalar!(f64, F64, f64);
