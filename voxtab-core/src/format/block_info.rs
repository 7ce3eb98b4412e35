//! Generic block header: key followed by a 64-bit payload size

use super::key::MagicKey;
use crate::validation::alignment::{align_to_word, word_padding};

/// Header of a generic block as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockInfo {
    pub key: MagicKey,
    /// Payload size in bytes, padding excluded
    pub size: u64,
}

impl BlockInfo {
    /// Size of the header on disk
    pub const SIZE: usize = MagicKey::SIZE + 8;

    pub const fn new(key: MagicKey, size: u64) -> Self {
        Self { key, size }
    }

    /// Payload size rounded up to the storage word
    pub const fn aligned_size(&self) -> u64 {
        align_to_word(self.size)
    }

    /// Zero bytes following the payload
    pub const fn padding_size(&self) -> u64 {
        word_padding(self.size)
    }

    /// Number of whole `T` values the payload holds
    pub const fn size_as<T>(&self) -> u64 {
        self.size / core::mem::size_of::<T>() as u64
    }

    /// Bytes occupied by header, payload and padding together
    pub const fn total_size(&self) -> u64 {
        Self::SIZE as u64 + self.aligned_size()
    }

    /// Encode as 12 little-endian bytes
    pub const fn to_bytes(&self) -> [u8; Self::SIZE] {
        let key = self.key.as_bytes();
        let size = self.size.to_le_bytes();
        [
            key[0], key[1], key[2], key[3], size[0], size[1], size[2], size[3], size[4], size[5],
            size[6], size[7],
        ]
    }

    /// Decode 12 bytes produced by [`BlockInfo::to_bytes`]
    pub const fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        let key = MagicKey::new([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let size = u64::from_le_bytes([
            bytes[4], bytes[5], bytes[6], bytes[7], bytes[8], bytes[9], bytes[10], bytes[11],
        ]);
        Self { key, size }
    }
}
