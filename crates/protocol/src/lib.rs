//! Wire format of the inter-VM file copy protocol.
//!
//! The sender streams one [`EntryHeader`] per file, directory or symlink,
//! each followed by the raw entry name and (for files and symlinks) the
//! payload. A header with a zero name length ends the transfer. The
//! receiver answers with a single [`ResultHeader`], optionally followed by
//! a [`ResultExtension`] naming the entry that failed.
//!
//! All integers travel in the sender's native byte order.

pub mod constants;
pub mod error_code;
pub mod types;
pub mod wire;

pub use constants::{ENTRY_HEADER_SIZE, LEGAL_EOF, MAX_PATH_LENGTH, RESULT_HEADER_SIZE};
pub use error_code::ErrorCode;
pub use types::{EntryKind, Timestamp};
pub use wire::{EntryHeader, ResultExtension, ResultHeader};
