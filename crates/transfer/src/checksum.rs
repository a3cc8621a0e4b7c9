use std::fmt;

use crc32fast::Hasher;

/// Rolling CRC-32 (IEEE) over a byte stream, seeded with 0.
///
/// This detects transport corruption only; no secret is involved.
#[derive(Clone, Default)]
pub struct Crc32 {
    hasher: Hasher,
    len: u64,
}

impl Crc32 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `bytes` into the running value.
    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
        self.len += bytes.len() as u64;
    }

    /// Current checksum value. The accumulator stays usable.
    pub fn value(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Number of bytes folded in so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for Crc32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crc32")
            .field("value", &format_args!("{:#010x}", self.value()))
            .field("len", &self.len)
            .finish()
    }
}
