//! The closed block vocabulary of voxtab files
//!
//! Every block is a [`Block`] variant. Encoding and decoding dispatch on the
//! variant (or on its [`BlockKind`] when reading) with an exhaustive match.
//!
//! On disk:
//! - `Version`: key + one `u32` word, no size field
//! - all others: key + `u64` size + payload + zero padding to the word

use alloc::string::String;
use alloc::vec::Vec;

use super::block_info::BlockInfo;
use super::constants::VERSION_BLOCK_SIZE;
use super::key::MagicKey;
use super::number::{Number, NumberKind};
use crate::error::VoxtabError;
use crate::traits::Scalar;

/// Shape of a block expected at a position in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Version,
    Bookmark,
    String,
    Number(NumberKind),
    Raw,
}

impl BlockKind {
    /// Payload size required by the kind, if it is fixed
    pub const fn fixed_size(self) -> Option<u64> {
        match self {
            BlockKind::Version => Some(4),
            BlockKind::Bookmark => Some(0),
            BlockKind::Number(kind) => Some(kind.slot_size() as u64),
            BlockKind::String | BlockKind::Raw => None,
        }
    }

    /// Reject a header whose size cannot belong to this kind
    pub fn check_size(self, info: &BlockInfo) -> Result<(), VoxtabError> {
        match (self, self.fixed_size()) {
            (_, None) => Ok(()),
            (_, Some(expected)) if expected == info.size => Ok(()),
            (BlockKind::Bookmark, Some(_)) => Err(VoxtabError::BookmarkPayload {
                key: info.key,
                size: info.size,
            }),
            (_, Some(expected)) => Err(VoxtabError::PayloadSize {
                key: info.key,
                expected,
                found: info.size,
            }),
        }
    }
}

/// One block with its decoded content
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Version { key: MagicKey, version: u32 },
    Bookmark { key: MagicKey },
    String { key: MagicKey, value: String },
    Number { key: MagicKey, value: Number },
    Raw { key: MagicKey, payload: Vec<u8> },
}

impl Block {
    pub fn string(key: MagicKey, value: impl Into<String>) -> Self {
        Block::String {
            key,
            value: value.into(),
        }
    }

    pub fn number<T: Scalar>(key: MagicKey, value: T) -> Self {
        Block::Number {
            key,
            value: value.into_number(),
        }
    }

    pub fn key(&self) -> MagicKey {
        match self {
            Block::Version { key, .. }
            | Block::Bookmark { key }
            | Block::String { key, .. }
            | Block::Number { key, .. }
            | Block::Raw { key, .. } => *key,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Version { .. } => BlockKind::Version,
            Block::Bookmark { .. } => BlockKind::Bookmark,
            Block::String { .. } => BlockKind::String,
            Block::Number { value, .. } => BlockKind::Number(value.kind()),
            Block::Raw { .. } => BlockKind::Raw,
        }
    }

    /// Logical payload size, padding excluded
    pub fn payload_size(&self) -> u64 {
        match self {
            Block::Version { .. } => 4,
            Block::Bookmark { .. } => 0,
            Block::String { value, .. } => value.len() as u64,
            Block::Number { value, .. } => value.kind().slot_size() as u64,
            Block::Raw { payload, .. } => payload.len() as u64,
        }
    }

    /// Generic header of the block; `None` for the reduced version block
    pub fn info(&self) -> Option<BlockInfo> {
        match self {
            Block::Version { .. } => None,
            _ => Some(BlockInfo::new(self.key(), self.payload_size())),
        }
    }

    /// Bytes the block occupies on disk
    pub fn encoded_size(&self) -> u64 {
        match self.info() {
            Some(info) => info.total_size(),
            None => VERSION_BLOCK_SIZE as u64,
        }
    }

    /// Append the on-disk encoding of the block to `out`
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        if let Block::Version { key, version } = self {
            out.extend_from_slice(key.as_bytes());
            out.extend_from_slice(&version.to_le_bytes());
            return;
        }
        let info = BlockInfo::new(self.key(), self.payload_size());
        out.extend_from_slice(&info.to_bytes());
        match self {
            Block::Version { .. } | Block::Bookmark { .. } => {}
            Block::String { value, .. } => out.extend_from_slice(value.as_bytes()),
            Block::Number { value, .. } => {
                let (slot, len) = value.to_slot();
                out.extend_from_slice(&slot[..len]);
            }
            Block::Raw { payload, .. } => out.extend_from_slice(payload),
        }
        out.resize(out.len() + info.padding_size() as usize, 0);
    }

    /// On-disk encoding of the block
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_size() as usize);
        self.encode_into(&mut out);
        out
    }

    /// Decode a reduced version block (key + word)
    pub fn decode_version(bytes: &[u8; VERSION_BLOCK_SIZE]) -> Self {
        let key = MagicKey::new([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Block::Version { key, version }
    }

    /// Decode a payload of `info.size` bytes (padding already stripped)
    ///
    /// For [`BlockKind::Version`] the payload is the version word.
    pub fn decode(kind: BlockKind, info: BlockInfo, payload: &[u8]) -> Result<Self, VoxtabError> {
        kind.check_size(&info)?;
        if payload.len() as u64 != info.size {
            return Err(VoxtabError::PayloadSize {
                key: info.key,
                expected: info.size,
                found: payload.len() as u64,
            });
        }
        let key = info.key;
        Ok(match kind {
            BlockKind::Version => Block::Version {
                key,
                version: u32::from_slot(key, payload)?,
            },
            BlockKind::Bookmark => Block::Bookmark { key },
            BlockKind::String => Block::String {
                key,
                value: decode_string(key, payload)?,
            },
            BlockKind::Number(number) => Block::Number {
                key,
                value: Number::from_slot(number, key, payload)?,
            },
            BlockKind::Raw => Block::Raw {
                key,
                payload: payload.to_vec(),
            },
        })
    }

    pub fn as_version(&self) -> Option<u32> {
        match self {
            Block::Version { version, .. } => Some(*version),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Block::String { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Block::Number { value, .. } => Some(*value),
            _ => None,
        }
    }
}

/// Decode string payload, dropping trailing NUL bytes
pub fn decode_string(key: MagicKey, payload: &[u8]) -> Result<String, VoxtabError> {
    let len = payload.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    core::str::from_utf8(&payload[..len])
        .map(String::from)
        .map_err(|_| VoxtabError::InvalidString { key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const KEY: MagicKey = MagicKey::new(*b"TEST");

    fn decode_encoded(block: &Block) -> Block {
        let bytes = block.to_bytes();
        let info = BlockInfo::from_bytes(bytes[..BlockInfo::SIZE].try_into().unwrap());
        let payload = &bytes[BlockInfo::SIZE..BlockInfo::SIZE + info.size as usize];
        Block::decode(block.kind(), info, payload).unwrap()
    }

    #[test]
    fn test_version_block_layout() {
        let block = Block::Version {
            key: MagicKey::new(*b"PLIB"),
            version: 1,
        };
        let bytes = block.to_bytes();
        assert_eq!(bytes, b"PLIB\x01\x00\x00\x00");
        assert_eq!(Block::decode_version(bytes[..].try_into().unwrap()), block);
        assert!(block.info().is_none());
    }

    #[test]
    fn test_string_is_padded() {
        let block = Block::string(KEY, "abcde");
        let bytes = block.to_bytes();
        assert_eq!(bytes.len(), 12 + 8);
        assert_eq!(&bytes[12..17], b"abcde");
        assert_eq!(&bytes[17..], &[0, 0, 0]);
        assert_eq!(decode_encoded(&block), block);
    }

    #[test]
    fn test_string_trailing_nuls_dropped() {
        let info = BlockInfo::new(KEY, 6);
        let block = Block::decode(BlockKind::String, info, b"ab\0c\0\0").unwrap();
        assert_eq!(block.as_str(), Some("ab\0c"));
    }

    #[test]
    fn test_invalid_string() {
        let info = BlockInfo::new(KEY, 2);
        assert_eq!(
            Block::decode(BlockKind::String, info, &[0xff, 0xfe]),
            Err(VoxtabError::InvalidString { key: KEY })
        );
    }

    #[test]
    fn test_encoded_sizes_are_word_multiples() {
        let blocks = vec![
            Block::Bookmark { key: KEY },
            Block::string(KEY, ""),
            Block::string(KEY, "x"),
            Block::number(KEY, 3u8),
            Block::number(KEY, -1.5f64),
            Block::Raw {
                key: KEY,
                payload: vec![1, 2, 3, 4, 5, 6, 7],
            },
        ];
        for block in &blocks {
            let bytes = block.to_bytes();
            assert_eq!(bytes.len() as u64, block.encoded_size());
            assert_eq!(bytes.len() % 4, 0, "{block:?}");
            assert_eq!(&decode_encoded(block), block);
        }
    }

    #[test]
    fn test_bookmark_with_payload_rejected() {
        let info = BlockInfo::new(KEY, 4);
        assert_eq!(
            BlockKind::Bookmark.check_size(&info),
            Err(VoxtabError::BookmarkPayload { key: KEY, size: 4 })
        );
    }

    #[test]
    fn test_number_size_mismatch() {
        let info = BlockInfo::new(KEY, 4);
        assert_eq!(
            BlockKind::Number(NumberKind::F64).check_size(&info),
            Err(VoxtabError::PayloadSize {
                key: KEY,
                expected: 8,
                found: 4
            })
        );
        assert_eq!(BlockKind::Raw.check_size(&info), Ok(()));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(
            Block::number(KEY, 12u32).as_number(),
            Some(Number::U32(12))
        );
        assert_eq!(Block::Bookmark { key: KEY }.as_number(), None);
        assert_eq!(Block::string(KEY, "cfg").key(), KEY);
    }
}
