//! Block codec over `std::io` streams
//!
//! Reads and writes single blocks of the voxtab vocabulary. These functions
//! know nothing about file paths or the table schema; [`crate::BlockFile`]
//! adds that context.

use std::io::{self, Read, Seek, SeekFrom, Write};

use thiserror::Error;
use voxtab_core::format::constants::VERSION_BLOCK_SIZE;
use voxtab_core::{Block, BlockInfo, BlockKind, VoxtabError};

/// Failure of a single codec operation
#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("stream ended after {obtained} of {expected} bytes")]
    ShortRead { expected: u64, obtained: u64 },

    #[error(transparent)]
    Format(#[from] VoxtabError),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Fill `buf` completely, reporting how much was obtained if the stream ends
pub fn read_exact_counted<R: Read>(reader: &mut R, buf: &mut [u8]) -> CodecResult<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(CodecError::ShortRead {
                    expected: buf.len() as u64,
                    obtained: filled as u64,
                })
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Read a generic block header (key and size)
pub fn read_block_info<R: Read>(reader: &mut R) -> CodecResult<BlockInfo> {
    let mut bytes = [0u8; BlockInfo::SIZE];
    read_exact_counted(reader, &mut bytes)?;
    Ok(BlockInfo::from_bytes(&bytes))
}

/// Read a reduced version block (key and word)
pub fn read_version_block<R: Read>(reader: &mut R) -> CodecResult<Block> {
    let mut bytes = [0u8; VERSION_BLOCK_SIZE];
    read_exact_counted(reader, &mut bytes)?;
    Ok(Block::decode_version(&bytes))
}

/// Read the padded payload of a block whose header was just read, returning
/// only the `info.size` meaningful bytes
pub fn read_payload<R: Read>(reader: &mut R, info: &BlockInfo) -> CodecResult<Vec<u8>> {
    let expected = info.aligned_size();
    // No up-front allocation: the declared size comes from the file
    let mut payload = Vec::new();
    let obtained = reader.by_ref().take(expected).read_to_end(&mut payload)? as u64;
    if obtained < expected {
        return Err(CodecError::ShortRead { expected, obtained });
    }
    payload.truncate(info.size as usize);
    Ok(payload)
}

/// Read one block of the given kind
pub fn read_block<R: Read>(reader: &mut R, kind: BlockKind) -> CodecResult<Block> {
    match kind {
        BlockKind::Version => read_version_block(reader),
        BlockKind::Bookmark | BlockKind::String | BlockKind::Number(_) | BlockKind::Raw => {
            let info = read_block_info(reader)?;
            kind.check_size(&info)?;
            let payload = read_payload(reader, &info)?;
            Ok(Block::decode(kind, info, &payload)?)
        }
    }
}

/// Move past the padded payload of a block without reading it
pub fn skip_payload<S: Seek>(stream: &mut S, info: &BlockInfo) -> CodecResult<()> {
    let start = stream.stream_position()?;
    let end = stream.seek(SeekFrom::End(0))?;
    let expected = info.aligned_size();
    let available = end.saturating_sub(start);
    if available < expected {
        return Err(CodecError::ShortRead {
            expected,
            obtained: available,
        });
    }
    stream.seek(SeekFrom::Start(start + expected))?;
    Ok(())
}

/// Write a complete block, padding included; returns the bytes written
pub fn write_block<W: Write>(writer: &mut W, block: &Block) -> CodecResult<u64> {
    let bytes = block.to_bytes();
    writer.write_all(&bytes)?;
    Ok(bytes.len() as u64)
}

/// Write a block header followed by `payload` taken from the caller's
/// buffer; `payload.len()` must equal `info.size`
pub fn write_block_and_payload<W: Write>(
    writer: &mut W,
    info: &BlockInfo,
    payload: &[u8],
) -> CodecResult<u64> {
    if payload.len() as u64 != info.size {
        return Err(VoxtabError::PayloadSize {
            key: info.key,
            expected: info.size,
            found: payload.len() as u64,
        }
        .into());
    }
    writer.write_all(&info.to_bytes())?;
    writer.write_all(payload)?;
    let padding = info.padding_size() as usize;
    writer.write_all(&[0u8; 4][..padding])?;
    Ok(info.total_size())
}
