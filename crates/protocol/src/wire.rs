//! Fixed-size protocol headers.
//!
//! # Wire format
//!
//! ```text
//! ENTRY HEADER (sender -> receiver, 32 bytes):
//!   [4: name_len] [4: mode] [8: data_len]
//!   [4: atime] [4: atime_nsec] [4: mtime] [4: mtime_nsec]
//!   followed by name_len bytes of name (no NUL)
//!   followed by data_len bytes of payload (regular files and symlinks)
//!
//! END MARKER: entry header with name_len == 0
//!
//! RESULT HEADER (receiver -> sender, 16 bytes):
//!   [4: error_code] [4: padding] [8: crc32, zero-extended]
//!
//! RESULT EXTENSION (only after a failure tied to an entry):
//!   [4: last_name_len] [last_name_len bytes: name]
//! ```
//!
//! Integers use the native byte order of the two VMs, which share an
//! architecture.

use crate::constants::{
    ENTRY_HEADER_SIZE, PERMISSION_BITS, RESULT_EXTENSION_SIZE, RESULT_HEADER_SIZE,
};
use crate::types::{EntryKind, Timestamp};

/// Per-entry header. Every field is untrusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryHeader {
    pub name_len: u32,
    pub mode: u32,
    pub data_len: u64,
    pub atime: Timestamp,
    pub mtime: Timestamp,
}

impl EntryHeader {
    /// The end-of-transfer marker.
    pub fn terminator() -> Self {
        Self::default()
    }

    /// Whether this header marks the end of the transfer.
    pub fn is_terminator(&self) -> bool {
        self.name_len == 0
    }

    pub fn kind(&self) -> EntryKind {
        EntryKind::from_mode(self.mode)
    }

    /// Permission bits requested by the sender.
    pub fn permissions(&self) -> u32 {
        self.mode & PERMISSION_BITS
    }

    pub fn to_bytes(&self) -> [u8; ENTRY_HEADER_SIZE] {
        let mut buf = [0u8; ENTRY_HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.name_len.to_ne_bytes());
        buf[4..8].copy_from_slice(&self.mode.to_ne_bytes());
        buf[8..16].copy_from_slice(&self.data_len.to_ne_bytes());
        buf[16..20].copy_from_slice(&self.atime.sec.to_ne_bytes());
        buf[20..24].copy_from_slice(&self.atime.nsec.to_ne_bytes());
        buf[24..28].copy_from_slice(&self.mtime.sec.to_ne_bytes());
        buf[28..32].copy_from_slice(&self.mtime.nsec.to_ne_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; ENTRY_HEADER_SIZE]) -> Self {
        Self {
            name_len: u32_at(buf, 0),
            mode: u32_at(buf, 4),
            data_len: u64::from_ne_bytes([
                buf[8], buf[9], buf[10], buf[11], buf[12], buf[13], buf[14], buf[15],
            ]),
            atime: Timestamp {
                sec: u32_at(buf, 16),
                nsec: u32_at(buf, 20),
            },
            mtime: Timestamp {
                sec: u32_at(buf, 24),
                nsec: u32_at(buf, 28),
            },
        }
    }
}

/// Final status sent back to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultHeader {
    /// `0` on success, otherwise an errno value.
    pub error_code: u32,
    /// Rolling CRC-32 over every byte consumed from the input stream.
    pub crc32: u32,
}

impl ResultHeader {
    pub fn to_bytes(&self) -> [u8; RESULT_HEADER_SIZE] {
        let mut buf = [0u8; RESULT_HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.error_code.to_ne_bytes());
        // bytes 4..8 are padding
        buf[8..16].copy_from_slice(&u64::from(self.crc32).to_ne_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; RESULT_HEADER_SIZE]) -> Self {
        let crc = u64::from_ne_bytes([
            buf[8], buf[9], buf[10], buf[11], buf[12], buf[13], buf[14], buf[15],
        ]);
        Self {
            error_code: u32_at(buf, 0),
            crc32: crc as u32,
        }
    }
}

/// Name of the entry being processed when the session failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultExtension {
    pub last_name: Vec<u8>,
}

impl ResultExtension {
    pub fn new(last_name: impl Into<Vec<u8>>) -> Self {
        Self {
            last_name: last_name.into(),
        }
    }

    /// Encodes the length prefix followed by the raw name (no NUL).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RESULT_EXTENSION_SIZE + self.last_name.len());
        buf.extend_from_slice(&(self.last_name.len() as u32).to_ne_bytes());
        buf.extend_from_slice(&self.last_name);
        buf
    }
}

fn u32_at(buf: &[u8], pos: usize) -> u32 {
    u32::from_ne_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]])
}
