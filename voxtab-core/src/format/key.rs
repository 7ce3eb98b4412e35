//! Four-byte magic keys identifying the role of each block

/// Block identifier: exactly four bytes, compared byte-wise
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MagicKey([u8; 4]);

impl MagicKey {
    /// Size of a key on disk
    pub const SIZE: usize = 4;

    /// Key of an unset block
    pub const NULL: Self = Self([0; 4]);

    /// Create a key from its raw bytes
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Create a key from text, keeping at most four bytes and zero-filling
    /// the rest
    pub const fn from_text(text: &str) -> Self {
        let src = text.as_bytes();
        let mut bytes = [0u8; 4];
        let mut i = 0;
        while i < bytes.len() && i < src.len() {
            bytes[i] = src[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Three-byte prefix completed by a one-byte suffix (e.g. `MIN` + `X`)
    pub const fn with_suffix(prefix: [u8; 3], suffix: u8) -> Self {
        Self([prefix[0], prefix[1], prefix[2], suffix])
    }

    /// Raw key bytes
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Key bytes without trailing NULs
    pub fn trimmed(&self) -> &[u8] {
        let len = self.0.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        &self.0[..len]
    }

    pub const fn is_null(&self) -> bool {
        self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0
    }
}

impl From<[u8; 4]> for MagicKey {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl core::fmt::Display for MagicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match core::str::from_utf8(self.trimmed()) {
            Ok(text) => f.write_str(text),
            Err(_) => {
                for &byte in self.trimmed() {
                    write!(f, "{}", core::ascii::escape_default(byte))?;
                }
                Ok(())
            }
        }
    }
}

impl core::fmt::Debug for MagicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "MagicKey(\"{self}\")")
    }
}
