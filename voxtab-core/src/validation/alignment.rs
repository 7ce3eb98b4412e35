//! Word alignment arithmetic for block payloads
//!
//! Every payload is followed by zero bytes up to the next multiple of
//! [`WORD_SIZE`].

use crate::format::WORD_SIZE;

const WORD: u64 = WORD_SIZE as u64;

/// Align a size to a power-of-two boundary, saturating at the largest
/// aligned `u64`
pub const fn align_to_boundary(size: u64, boundary: u64) -> u64 {
    let mask = !(boundary - 1);
    match size.checked_add(boundary - 1) {
        Some(padded) => padded & mask,
        None => u64::MAX & mask,
    }
}

/// Size of a payload once padded to the storage word
pub const fn align_to_word(size: u64) -> u64 {
    align_to_boundary(size, WORD)
}

/// Zero bytes written after a payload of `size` bytes
pub const fn word_padding(size: u64) -> u64 {
    align_to_word(size).saturating_sub(size)
}

/// Whether an offset sits on a word boundary
pub const fn is_word_aligned(offset: u64) -> bool {
    offset % WORD == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_to_boundary() {
        assert_eq!(align_to_boundary(0, 8), 0);
        assert_eq!(align_to_boundary(1, 8), 8);
        assert_eq!(align_to_boundary(8, 8), 8);
        assert_eq!(align_to_boundary(9, 8), 16);
        assert_eq!(align_to_boundary(u64::MAX, 4), u64::MAX & !3);
    }

    #[test]
    fn test_align_to_word() {
        assert_eq!(align_to_word(0), 0);
        assert_eq!(align_to_word(1), 4);
        assert_eq!(align_to_word(3), 4);
        assert_eq!(align_to_word(4), 4);
        assert_eq!(align_to_word(5), 8);
        assert_eq!(align_to_word(13), 16);
    }

    #[test]
    fn test_word_padding() {
        for size in 0..64u64 {
            let padding = word_padding(size);
            assert!(padding < WORD);
            assert!(is_word_aligned(size + padding));
        }
        assert_eq!(word_padding(5), 3);
        assert_eq!(word_padding(8), 0);
    }
}
