use std::fmt;

/// Failure codes reported to the peer.
///
/// The numeric values are the Linux errno values the sending VM expects,
/// independent of the platform the receiver runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// `EPERM`: policy denial (absolute symlink target).
    NotPermitted,
    /// `EIO`: read, write or creation failure.
    Io,
    /// `EACCES`: the local filesystem refused access.
    AccessDenied,
    /// `EEXIST`: an entry with that name already exists.
    AlreadyExists,
    /// `ENOTDIR`: a directory could not be created.
    NotADirectory,
    /// `EINVAL`: malformed or unsupported entry.
    Invalid,
    /// `ENAMETOOLONG`: name or link target over the length bound.
    NameTooLong,
    /// `EDQUOT`: byte or file quota exceeded.
    QuotaExceeded,
}

impl ErrorCode {
    /// Returns the errno value sent on the wire.
    pub const fn errno(self) -> u32 {
        match self {
            Self::NotPermitted => 1,
            Self::Io => 5,
            Self::AccessDenied => 13,
            Self::AlreadyExists => 17,
            Self::NotADirectory => 20,
            Self::Invalid => 22,
            Self::NameTooLong => 36,
            Self::QuotaExceeded => 122,
        }
    }

    /// Symbolic errno name, as used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotPermitted => "EPERM",
            Self::Io => "EIO",
            Self::AccessDenied => "EACCES",
            Self::AlreadyExists => "EEXIST",
            Self::NotADirectory => "ENOTDIR",
            Self::Invalid => "EINVAL",
            Self::NameTooLong => "ENAMETOOLONG",
            Self::QuotaExceeded => "EDQUOT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.errno())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_values_match_linux() {
        assert_eq!(ErrorCode::NotPermitted.errno(), 1);
        assert_eq!(ErrorCode::Io.errno(), 5);
        assert_eq!(ErrorCode::AccessDenied.errno(), 13);
        assert_eq!(ErrorCode::AlreadyExists.errno(), 17);
        assert_eq!(ErrorCode::NotADirectory.errno(), 20);
        assert_eq!(ErrorCode::Invalid.errno(), 22);
        assert_eq!(ErrorCode::NameTooLong.errno(), 36);
        assert_eq!(ErrorCode::QuotaExceeded.errno(), 122);
    }

    #[test]
    fn display_includes_name_and_value() {
        assert_eq!(ErrorCode::NameTooLong.to_string(), "ENAMETOOLONG (36)");
    }
}
