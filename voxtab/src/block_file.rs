//! Sequential block stream bound to a file path
//!
//! [`BlockFile`] reads and writes blocks one after another, checking the key
//! of each block it reads and wrapping every failure with the file path and
//! a description of the block that was expected.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use voxtab_core::format::constants::VERSION_BLOCK_SIZE;
use voxtab_core::{
    decode_string, values_as_le_bytes, Block, BlockInfo, BlockKind, MagicKey, Scalar, VoxtabError,
};

use crate::codec::{self, CodecError};
use crate::error::{TableError, TableResult};

/// Block-level view of a stream, `File` by default
#[derive(Debug)]
pub struct BlockFile<S = File> {
    stream: S,
    path: PathBuf,
}

impl BlockFile<File> {
    /// Open an existing file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TableError::Io {
            action: "open",
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file, path))
    }

    /// Create or truncate a file for writing
    pub fn create<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| TableError::Io {
            action: "create",
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file, path))
    }

    /// Open an existing file for appending
    pub fn append<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|source| TableError::Io {
                action: "append to",
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(file, path))
    }
}

impl<S> BlockFile<S> {
    /// Wrap a stream; `path` is only used in error messages
    pub fn new(stream: S, path: impl Into<PathBuf>) -> Self {
        Self {
            stream,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    fn error(&self, err: CodecError, descr: &str, key: Option<MagicKey>) -> TableError {
        let description = describe(descr, key);
        match err {
            CodecError::Io(source) => TableError::Io {
                action: "access",
                path: self.path.clone(),
                source,
            },
            CodecError::ShortRead { expected, obtained } => TableError::ShortRead {
                path: self.path.clone(),
                description,
                expected,
                obtained,
            },
            CodecError::Format(source) => TableError::Format {
                path: self.path.clone(),
                description,
                source,
            },
        }
    }

    fn check_key(
        &self,
        found: MagicKey,
        expected: Option<MagicKey>,
        descr: &str,
    ) -> TableResult<()> {
        match expected {
            Some(expected) if expected != found => Err(self.error(
                VoxtabError::KeyMismatch { expected, found }.into(),
                descr,
                Some(expected),
            )),
            _ => Ok(()),
        }
    }
}

impl<S: Read + Seek> BlockFile<S> {
    /// Read one block of `kind`, checking its key when `expected` is given
    pub fn read_block(
        &mut self,
        kind: BlockKind,
        expected: Option<MagicKey>,
        descr: &str,
    ) -> TableResult<Block> {
        if kind == BlockKind::Version {
            return self.read_version_block(expected, descr);
        }
        let info = self.read_block_header(expected, descr)?;
        kind.check_size(&info)
            .map_err(|err| self.error(err.into(), descr, Some(info.key)))?;
        let payload = self.read_payload(&info, descr)?;
        Block::decode(kind, info, &payload)
            .map_err(|err| self.error(err.into(), descr, Some(info.key)))
    }

    fn read_version_block(
        &mut self,
        expected: Option<MagicKey>,
        descr: &str,
    ) -> TableResult<Block> {
        let mut bytes = [0u8; VERSION_BLOCK_SIZE];
        codec::read_exact_counted(&mut self.stream, &mut bytes)
            .map_err(|err| self.error(err, descr, expected))?;
        let block = Block::decode_version(&bytes);
        self.check_key(block.key(), expected, descr)?;
        Ok(block)
    }

    /// Read a generic block header, checking its key
    pub fn read_block_header(
        &mut self,
        expected: Option<MagicKey>,
        descr: &str,
    ) -> TableResult<BlockInfo> {
        let info = codec::read_block_info(&mut self.stream)
            .map_err(|err| self.error(err, descr, expected))?;
        self.check_key(info.key, expected, descr)?;
        Ok(info)
    }

    /// Read the payload of a block whose header was just read
    pub fn read_payload(&mut self, info: &BlockInfo, descr: &str) -> TableResult<Vec<u8>> {
        codec::read_payload(&mut self.stream, info)
            .map_err(|err| self.error(err, descr, Some(info.key)))
    }

    /// Read a version block and return its version word
    pub fn read_version(&mut self, key: MagicKey, descr: &str) -> TableResult<u32> {
        let block = self.read_version_block(Some(key), descr)?;
        block.as_version().ok_or_else(|| {
            self.error(
                VoxtabError::PayloadSize {
                    key,
                    expected: 4,
                    found: block.payload_size(),
                }
                .into(),
                descr,
                Some(key),
            )
        })
    }

    /// Read a bookmark block
    pub fn read_bookmark(&mut self, key: MagicKey, descr: &str) -> TableResult<()> {
        let info = self.read_block_header(Some(key), descr)?;
        BlockKind::Bookmark
            .check_size(&info)
            .map_err(|err| self.error(err.into(), descr, Some(key)))
    }

    /// Read a string block
    pub fn read_string(&mut self, key: MagicKey, descr: &str) -> TableResult<String> {
        let info = self.read_block_header(Some(key), descr)?;
        let payload = self.read_payload(&info, descr)?;
        decode_string(key, &payload).map_err(|err| self.error(err.into(), descr, Some(key)))
    }

    /// Read a number block holding a `T`
    pub fn read_number<T: Scalar>(&mut self, key: MagicKey, descr: &str) -> TableResult<T> {
        let info = self.read_block_header(Some(key), descr)?;
        BlockKind::Number(T::KIND)
            .check_size(&info)
            .map_err(|err| self.error(err.into(), descr, Some(key)))?;
        let payload = self.read_payload(&info, descr)?;
        T::from_slot(key, &payload).map_err(|err| self.error(err.into(), descr, Some(key)))
    }

    /// Read a generic block and return its payload
    pub fn read_raw(&mut self, key: MagicKey, descr: &str) -> TableResult<Vec<u8>> {
        let info = self.read_block_header(Some(key), descr)?;
        self.read_payload(&info, descr)
    }

    /// Skip the payload of a block whose header was just read
    pub fn skip_payload(&mut self, info: &BlockInfo, descr: &str) -> TableResult<()> {
        codec::skip_payload(&mut self.stream, info)
            .map_err(|err| self.error(err, descr, Some(info.key)))
    }

    /// Skip a whole generic block, returning its header
    pub fn skip_block(
        &mut self,
        expected: Option<MagicKey>,
        descr: &str,
    ) -> TableResult<BlockInfo> {
        let info = self.read_block_header(expected, descr)?;
        self.skip_payload(&info, descr)?;
        Ok(info)
    }
}

impl<S: Seek> BlockFile<S> {
    /// Absolute position of the next byte to read or write
    pub fn current_offset(&mut self) -> TableResult<u64> {
        self.stream
            .seek(SeekFrom::Current(0))
            .map_err(|source| TableError::Io {
                action: "seek in",
                path: self.path.clone(),
                source,
            })
    }
}

impl<S: Write> BlockFile<S> {
    /// Write a complete block
    pub fn write_block(&mut self, block: &Block) -> TableResult<u64> {
        codec::write_block(&mut self.stream, block)
            .map_err(|err| self.error(err, "", Some(block.key())))
    }

    /// Write a block header and a payload borrowed from the caller
    pub fn write_block_and_payload(
        &mut self,
        info: &BlockInfo,
        payload: &[u8],
    ) -> TableResult<u64> {
        codec::write_block_and_payload(&mut self.stream, info, payload)
            .map_err(|err| self.error(err, "", Some(info.key)))
    }

    /// Write a raw block holding `values` as little-endian `f32`
    pub fn write_values(&mut self, key: MagicKey, values: &[f32]) -> TableResult<u64> {
        let bytes = values_as_le_bytes(values);
        let info = BlockInfo::new(key, bytes.len() as u64);
        self.write_block_and_payload(&info, &bytes)
    }

    pub fn flush(&mut self) -> TableResult<()> {
        self.stream.flush().map_err(|source| TableError::Io {
            action: "flush",
            path: self.path.clone(),
            source,
        })
    }
}

/// Text naming a block in error messages
fn describe(descr: &str, key: Option<MagicKey>) -> String {
    match key {
        _ if !descr.is_empty() => descr.to_string(),
        Some(key) if !key.is_null() => format!("block '{key}'"),
        _ => "block header".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use voxtab_core::ErrorCategory;

    const KEY: MagicKey = MagicKey::new(*b"NCHN");

    fn stream_of(blocks: &[Block]) -> BlockFile<Cursor<Vec<u8>>> {
        let mut file = BlockFile::new(Cursor::new(Vec::new()), "memory.vxt");
        for block in blocks {
            file.write_block(block).unwrap();
        }
        file.get_mut().set_position(0);
        file
    }

    #[test]
    fn test_typed_reads() {
        let mut file = stream_of(&[
            Block::Version {
                key: MagicKey::new(*b"PLIB"),
                version: 1,
            },
            Block::string(MagicKey::new(*b"CNFG"), "cfg"),
            Block::number(KEY, 12u32),
            Block::number(MagicKey::new(*b"MINX"), -1.5f64),
            Block::Bookmark {
                key: MagicKey::new(*b"DONE"),
            },
        ]);
        assert_eq!(file.read_version(MagicKey::new(*b"PLIB"), "version").unwrap(), 1);
        assert_eq!(file.read_string(MagicKey::new(*b"CNFG"), "configuration").unwrap(), "cfg");
        assert_eq!(file.read_number::<u32>(KEY, "channels").unwrap(), 12);
        assert_eq!(file.read_number::<f64>(MagicKey::new(*b"MINX"), "lower").unwrap(), -1.5);
        file.read_bookmark(MagicKey::new(*b"DONE"), "trailer").unwrap();
        assert_eq!(file.current_offset().unwrap(), file.get_mut().get_ref().len() as u64);
    }

    #[test]
    fn test_key_mismatch_names_description() {
        let mut file = stream_of(&[Block::number(KEY, 3u32)]);
        let err = file
            .read_number::<u32>(MagicKey::new(*b"NVXL"), "number of voxels")
            .unwrap_err();
        assert_eq!(err.format_error().map(VoxtabError::category), Some(ErrorCategory::Format));
        let message = err.to_string();
        assert!(message.contains("number of voxels"), "{message}");
        assert!(message.contains("memory.vxt"), "{message}");
        assert!(message.contains("NCHN"), "{message}");
    }

    #[test]
    fn test_short_read_is_reported() {
        let mut file = BlockFile::new(Cursor::new(b"PLI".to_vec()), "short.vxt");
        let err = file.read_version(MagicKey::new(*b"PLIB"), "").unwrap_err();
        assert!(err.is_truncation());
        assert!(err.to_string().contains("block 'PLIB'"));
    }

    #[test]
    fn test_read_block_any_key() {
        let block = Block::Raw {
            key: MagicKey::new(*b"PHVS"),
            payload: vec![1, 2, 3, 4, 5],
        };
        let mut file = stream_of(&[block.clone()]);
        assert_eq!(file.read_block(BlockKind::Raw, None, "payload").unwrap(), block);
    }

    #[test]
    fn test_read_raw_drops_padding() {
        let mut file = stream_of(&[Block::Raw {
            key: MagicKey::new(*b"PHVS"),
            payload: vec![9; 6],
        }]);
        assert_eq!(file.read_raw(MagicKey::new(*b"PHVS"), "payload").unwrap(), [9u8; 6]);
        assert_eq!(file.current_offset().unwrap(), 20);
    }

    #[test]
    fn test_skip_block() {
        let mut file = stream_of(&[
            Block::Raw {
                key: MagicKey::new(*b"PHVS"),
                payload: vec![0; 7],
            },
            Block::Bookmark {
                key: MagicKey::new(*b"DONE"),
            },
        ]);
        let info = file.skip_block(Some(MagicKey::new(*b"PHVS")), "payload").unwrap();
        assert_eq!(info.size, 7);
        assert_eq!(file.current_offset().unwrap(), 20);
        file.read_bookmark(MagicKey::new(*b"DONE"), "trailer").unwrap();
    }

    #[test]
    fn test_write_values() {
        let mut file = BlockFile::new(Cursor::new(Vec::new()), "values.vxt");
        let written = file.write_values(MagicKey::new(*b"PHVS"), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(written, 24);
        let bytes = file.into_inner().into_inner();
        assert_eq!(&bytes[..4], b"PHVS");
        assert_eq!(&bytes[12..16], &1.0f32.to_le_bytes());
    }
}
