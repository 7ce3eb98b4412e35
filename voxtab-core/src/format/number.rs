//! Scalar values carried by number blocks
//!
//! Integers narrower than a word are stored widened to a 4-byte slot:
//! zero-extended when unsigned, sign-extended when signed. Every number
//! block therefore has a payload of either 4 or 8 bytes.

use super::key::MagicKey;
use crate::error::VoxtabError;
use crate::traits::Scalar;

/// Type tag of a number block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl NumberKind {
    /// Bytes occupied on disk (the widened slot)
    pub const fn slot_size(self) -> usize {
        match self {
            NumberKind::U64 | NumberKind::I64 | NumberKind::F64 => 8,
            _ => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            NumberKind::U8 => "u8",
            NumberKind::I8 => "i8",
            NumberKind::U16 => "u16",
            NumberKind::I16 => "i16",
            NumberKind::U32 => "u32",
            NumberKind::I32 => "i32",
            NumberKind::U64 => "u64",
            NumberKind::I64 => "i64",
            NumberKind::F32 => "f32",
            NumberKind::F64 => "f64",
        }
    }
}

impl core::fmt::Display for NumberKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// One scalar value of any supported width
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Number {
    pub const fn kind(&self) -> NumberKind {
        match self {
            Number::U8(_) => NumberKind::U8,
            Number::I8(_) => NumberKind::I8,
            Number::U16(_) => NumberKind::U16,
            Number::I16(_) => NumberKind::I16,
            Number::U32(_) => NumberKind::U32,
            Number::I32(_) => NumberKind::I32,
            Number::U64(_) => NumberKind::U64,
            Number::I64(_) => NumberKind::I64,
            Number::F32(_) => NumberKind::F32,
            Number::F64(_) => NumberKind::F64,
        }
    }

    /// Little-endian slot bytes; only the first `len` bytes are meaningful
    pub fn to_slot(self) -> ([u8; 8], usize) {
        match self {
            Number::U8(v) => v.to_slot(),
            Number::I8(v) => v.to_slot(),
            Number::U16(v) => v.to_slot(),
            Number::I16(v) => v.to_slot(),
            Number::U32(v) => v.to_slot(),
            Number::I32(v) => v.to_slot(),
            Number::U64(v) => v.to_slot(),
            Number::I64(v) => v.to_slot(),
            Number::F32(v) => v.to_slot(),
            Number::F64(v) => v.to_slot(),
        }
    }

    /// Decode a slot read from block `key` as a value of type `kind`
    pub fn from_slot(kind: NumberKind, key: MagicKey, slot: &[u8]) -> Result<Self, VoxtabError> {
        Ok(match kind {
            NumberKind::U8 => Number::U8(u8::from_slot(key, slot)?),
            NumberKind::I8 => Number::I8(i8::from_slot(key, slot)?),
            NumberKind::U16 => Number::U16(u16::from_slot(key, slot)?),
            NumberKind::I16 => Number::I16(i16::from_slot(key, slot)?),
            NumberKind::U32 => Number::U32(u32::from_slot(key, slot)?),
            NumberKind::I32 => Number::I32(i32::from_slot(key, slot)?),
            NumberKind::U64 => Number::U64(u64::from_slot(key, slot)?),
            NumberKind::I64 => Number::I64(i64::from_slot(key, slot)?),
            NumberKind::F32 => Number::F32(f32::from_slot(key, slot)?),
            NumberKind::F64 => Number::F64(f64::from_slot(key, slot)?),
        })
    }
}
