//! Format constants and magic keys for voxtab files

use super::key::MagicKey;

/// Size of the storage word; block payloads are padded to a multiple of it
pub const WORD_SIZE: usize = 4;

/// Size of one stored table value (`f32`)
pub const VALUE_SIZE: usize = 4;

/// Size of a block header on disk: key followed by a 64-bit payload size
pub const BLOCK_HEADER_SIZE: usize = MagicKey::SIZE + 8;

/// Size of a version block on disk: key followed by one word, no size field
pub const VERSION_BLOCK_SIZE: usize = MagicKey::SIZE + WORD_SIZE;

/// Absolute tolerance (cm) allowed between a declared axis upper bound and
/// `lower + step * n_steps`
pub const DEFAULT_AXIS_TOLERANCE: f64 = 1e-3;

/// Format version numbers
pub mod version {
    /// Marks a header that was never filled in
    pub const UNDEFINED: u32 = 0;

    /// Newest version this library reads and writes
    pub const LATEST: u32 = 1;

    /// Placeholder meaning "write the latest version"
    pub const DEFAULT: u32 = u32::MAX;
}

/// Magic keys of the table schema, in file order
pub mod keys {
    use super::MagicKey;

    pub const VERSION: MagicKey = MagicKey::new(*b"PLIB");
    pub const CONFIGURATION: MagicKey = MagicKey::new(*b"CNFG");
    pub const N_ENTRIES: MagicKey = MagicKey::new(*b"NTRY");
    pub const N_CHANNELS: MagicKey = MagicKey::new(*b"NCHN");
    pub const N_VOXELS: MagicKey = MagicKey::new(*b"NVXL");
    pub const PAYLOAD: MagicKey = MagicKey::new(*b"PHVS");
    pub const DONE: MagicKey = MagicKey::new(*b"DONE");

    /// Axis key prefixes; the axis letter completes the key
    pub const AXIS_START: [u8; 3] = *b"AXI";
    pub const AXIS_STEPS: [u8; 3] = *b"NBO";
    pub const AXIS_LOWER: [u8; 3] = *b"MIN";
    pub const AXIS_UPPER: [u8; 3] = *b"MAX";
    pub const AXIS_STEP: [u8; 3] = *b"STE";
    pub const AXIS_END: [u8; 3] = *b"END";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_tolerance_value() {
        assert_eq!(DEFAULT_AXIS_TOLERANCE, 1e-3);
    }

    #[test]
    fn test_layout_sizes() {
        assert_eq!(BLOCK_HEADER_SIZE, 12);
        assert_eq!(VERSION_BLOCK_SIZE, 8);
    }

    #[test]
    fn test_versions() {
        assert_eq!(version::UNDEFINED, 0);
        assert!(version::LATEST > version::UNDEFINED);
        assert!(version::DEFAULT > version::LATEST);
    }
}
