/// Upper bound for entry names and symlink targets, including the
/// terminating NUL the peer reserves room for.
///
/// Anything declaring `MAX_PATH_LENGTH` bytes or more is rejected before a
/// single byte of it is read.
pub const MAX_PATH_LENGTH: usize = 16384;

/// Encoded size of an [`EntryHeader`](crate::EntryHeader).
pub const ENTRY_HEADER_SIZE: usize = 32;

/// Encoded size of a [`ResultHeader`](crate::ResultHeader).
pub const RESULT_HEADER_SIZE: usize = 16;

/// Encoded size of the fixed part of a [`ResultExtension`](crate::ResultExtension).
pub const RESULT_EXTENSION_SIZE: usize = 4;

/// Status used internally when the peer closed the stream before a new
/// header could be read.
///
/// The peer has usually reported its own failure already, so this is
/// reported as success (`0`) on the wire.
pub const LEGAL_EOF: u32 = 31_415_926;

// POSIX file type bits as sent by the peer.
pub const S_IFMT: u32 = 0o170_000;
pub const S_IFDIR: u32 = 0o040_000;
pub const S_IFREG: u32 = 0o100_000;
pub const S_IFLNK: u32 = 0o120_000;

/// Permission bits carried in `mode` (including setuid/setgid/sticky).
pub const PERMISSION_BITS: u32 = 0o7777;
