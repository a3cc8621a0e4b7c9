use crate::constants::{S_IFDIR, S_IFLNK, S_IFMT, S_IFREG};

/// Kind of a transferred entry, decoded once from the header's `mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    RegularFile,
    Directory,
    Symlink,
    /// Any other file type (devices, fifos, sockets, garbage). Always rejected.
    Other(u32),
}

impl EntryKind {
    /// Classifies a POSIX `mode` by its file type bits.
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFREG => Self::RegularFile,
            S_IFDIR => Self::Directory,
            S_IFLNK => Self::Symlink,
            other => Self::Other(other),
        }
    }

    /// Whether `dataLength` payload bytes follow the entry name.
    pub fn has_payload(self) -> bool {
        matches!(self, Self::RegularFile | Self::Symlink)
    }
}

/// Seconds plus nanoseconds, as carried for access and modification times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub sec: u32,
    pub nsec: u32,
}
