use qfile_transfer::Crc32;

use crate::UnpackError;

/// Session quotas. `0` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    pub bytes: u64,
    pub files: u64,
}

impl Limits {
    pub fn unlimited() -> Self {
        Self::default()
    }
}

/// Running totals of one transfer.
///
/// Counters only ever grow. The checksum covers every byte consumed from
/// the input stream, in read order.
#[derive(Debug, Default)]
pub struct TransferSession {
    limits: Limits,
    bytes_received: u64,
    files_received: u64,
    checksum: Crc32,
}

impl TransferSession {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Accounts a regular file's declared size before its payload is read.
    pub fn reserve_bytes(&mut self, declared: u64) -> Result<(), UnpackError> {
        self.bytes_received = self.bytes_received.saturating_add(declared);
        if self.limits.bytes != 0 && self.bytes_received > self.limits.bytes {
            return Err(UnpackError::ByteQuota {
                total: self.bytes_received,
                limit: self.limits.bytes,
            });
        }
        Ok(())
    }

    /// Counts a successfully applied entry.
    pub fn complete_entry(&mut self) -> Result<(), UnpackError> {
        self.files_received += 1;
        if self.limits.files != 0 && self.files_received > self.limits.files {
            return Err(UnpackError::FileQuota {
                total: self.files_received,
                limit: self.limits.files,
            });
        }
        Ok(())
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    pub fn files_received(&self) -> u64 {
        self.files_received
    }

    /// Current value of the rolling checksum.
    pub fn checksum(&self) -> u32 {
        self.checksum.value()
    }

    pub(crate) fn checksum_mut(&mut self) -> &mut Crc32 {
        &mut self.checksum
    }
}
