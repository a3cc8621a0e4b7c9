//! Applying sender-supplied times and permissions.

use std::fs::File;
use std::io;
use std::path::Path;

use filetime::FileTime;
use qfile_protocol::{EntryHeader, Timestamp};

const MAX_NSEC: u32 = 999_999_999;

fn file_time(ts: Timestamp) -> FileTime {
    FileTime::from_unix_time(i64::from(ts.sec), ts.nsec.min(MAX_NSEC))
}

/// Applies times and permission bits through an open handle.
pub(crate) fn apply_to_file(file: &File, header: &EntryHeader) -> io::Result<()> {
    filetime::set_file_handle_times(
        file,
        Some(file_time(header.atime)),
        Some(file_time(header.mtime)),
    )?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(header.permissions()))?;
    }

    Ok(())
}

/// Applies times and permission bits to an existing directory.
pub(crate) fn apply_to_dir(path: &Path, header: &EntryHeader) -> io::Result<()> {
    filetime::set_file_times(path, file_time(header.atime), file_time(header.mtime))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(header.permissions()))?;
    }

    Ok(())
}
