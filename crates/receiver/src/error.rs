//! Error types for the receiver.

use std::io;

use qfile_protocol::ErrorCode;
use qfile_transfer::CopyError;

/// Reasons a transfer session is aborted.
///
/// Every variant maps to exactly one wire [`ErrorCode`].
#[derive(Debug, thiserror::Error)]
pub enum UnpackError {
    #[error("name length {len} exceeds the {max}-byte limit")]
    NameTooLong { len: u64, max: usize },

    #[error("symlink target length {len} exceeds the {max}-byte limit")]
    LinkTargetTooLong { len: u64, max: usize },

    #[error("unsupported entry type (mode {mode:#o})")]
    UnsupportedKind { mode: u32 },

    #[error("name is not representable on this platform")]
    InvalidName,

    #[error("path escapes the incoming directory: {0}")]
    EscapesRoot(String),

    #[error("absolute symlink target denied: {0}")]
    AbsoluteLinkTarget(String),

    #[error("already exists: {0}")]
    AlreadyExists(#[source] io::Error),

    #[error("permission denied: {0}")]
    PermissionDenied(#[source] io::Error),

    #[error("cannot create directory: {0}")]
    CreateDirectory(#[source] io::Error),

    #[error("stream closed after {got} of {expected} bytes")]
    ShortRead { got: usize, expected: usize },

    #[error("copy failed: {0}")]
    Copy(#[from] CopyError),

    #[error("byte quota exceeded: {total} > {limit}")]
    ByteQuota { total: u64, limit: u64 },

    #[error("file quota exceeded: {total} > {limit}")]
    FileQuota { total: u64, limit: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl UnpackError {
    /// Wire code reported to the peer.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NameTooLong { .. } | Self::LinkTargetTooLong { .. } => ErrorCode::NameTooLong,
            Self::UnsupportedKind { .. } | Self::InvalidName | Self::EscapesRoot(_) => {
                ErrorCode::Invalid
            }
            Self::AbsoluteLinkTarget(_) => ErrorCode::NotPermitted,
            Self::AlreadyExists(_) => ErrorCode::AlreadyExists,
            Self::PermissionDenied(_) => ErrorCode::AccessDenied,
            Self::CreateDirectory(_) => ErrorCode::NotADirectory,
            Self::ShortRead { .. } | Self::Copy(_) | Self::Io(_) => ErrorCode::Io,
            Self::ByteQuota { .. } | Self::FileQuota { .. } => ErrorCode::QuotaExceeded,
        }
    }

    /// Classifies a failure to create a file or symlink.
    ///
    /// Only collisions and access denials are told apart; the peer handles
    /// nothing finer than that.
    pub fn from_create(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(err),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(err),
            _ if is_privilege_not_held(&err) => Self::PermissionDenied(err),
            _ => Self::Io(err),
        }
    }
}

// Creating symlinks on Windows needs SeCreateSymbolicLinkPrivilege.
#[cfg(windows)]
fn is_privilege_not_held(err: &io::Error) -> bool {
    const ERROR_PRIVILEGE_NOT_HELD: i32 = 1314;
    err.raw_os_error() == Some(ERROR_PRIVILEGE_NOT_HELD)
}

#[cfg(not(windows))]
fn is_privilege_not_held(_err: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_errors_map_to_wire_codes() {
        let exists = UnpackError::from_create(io::Error::from(io::ErrorKind::AlreadyExists));
        assert_eq!(exists.code(), ErrorCode::AlreadyExists);

        let denied = UnpackError::from_create(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(denied.code(), ErrorCode::AccessDenied);

        let other = UnpackError::from_create(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(other.code(), ErrorCode::Io);
    }

    #[test]
    fn copy_failures_are_io() {
        let err = UnpackError::from(CopyError::UnexpectedEof {
            copied: 1,
            expected: 2,
        });
        assert_eq!(err.code(), ErrorCode::Io);
    }

    #[test]
    fn policy_codes() {
        assert_eq!(
            UnpackError::AbsoluteLinkTarget("/etc".into()).code(),
            ErrorCode::NotPermitted
        );
        assert_eq!(
            UnpackError::EscapesRoot("../x".into()).code(),
            ErrorCode::Invalid
        );
        assert_eq!(
            UnpackError::UnsupportedKind { mode: 0o010_644 }.code(),
            ErrorCode::Invalid
        );
        assert_eq!(
            UnpackError::FileQuota { total: 2, limit: 1 }.code(),
            ErrorCode::QuotaExceeded
        );
    }
}
