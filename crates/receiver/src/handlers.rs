//! Applying one parsed entry to the filesystem.
//!
//! Each handler consumes exactly the payload its entry carries (or stops at
//! the first error) and closes every handle it opened before returning.

use std::fs::{self, OpenOptions};
use std::io::{self, Read};
use std::path::Path;

use qfile_protocol::EntryHeader;
use qfile_transfer::{ProgressThrottle, copy_stream, read_full};
use tracing::{debug, info};

use crate::confine::{Confiner, LinkKind, path_from_bytes};
use crate::metadata;
use crate::{UnpackError, Unpacker};

impl<R: Read> Unpacker<R> {
    pub(crate) fn receive_file(
        &mut self,
        header: &EntryHeader,
        name: &Path,
    ) -> Result<(), UnpackError> {
        let path = self.confiner.resolve(name)?;
        self.confiner.check_parent(&path)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(UnpackError::from_create)?;

        let size = header.data_len;
        self.session.reserve_bytes(size)?;

        info!(path = %path.display(), size, "receiving file");

        let mut throttle = ProgressThrottle::default();
        let mut on_chunk = |n: usize| {
            if let Some(received) = throttle.advance(n) {
                debug!(received, size, "file progress");
            }
        };
        copy_stream(
            &mut self.input,
            &mut file,
            size,
            Some(self.session.checksum_mut()),
            Some(&mut on_chunk),
        )?;

        if self.preserve_metadata {
            metadata::apply_to_file(&file, header)?;
        }
        Ok(())
    }

    pub(crate) fn create_directory(
        &mut self,
        header: &EntryHeader,
        name: &Path,
    ) -> Result<(), UnpackError> {
        let path = self.confiner.resolve(name)?;
        self.confiner.check_parent(&path)?;

        match fs::create_dir(&path) {
            Ok(()) => {
                info!(path = %path.display(), "created directory");
            }
            // A symlink in the way is a conflict even when it leads to a
            // directory.
            Err(e)
                if e.kind() == io::ErrorKind::AlreadyExists
                    && fs::symlink_metadata(&path).is_ok_and(|meta| meta.is_dir()) =>
            {
                // Directories are announced again after their contents so
                // that restrictive permissions can be applied last.
                debug!(path = %path.display(), "directory already exists");
                if self.preserve_metadata {
                    metadata::apply_to_dir(&path, header)?;
                }
            }
            Err(e) => return Err(UnpackError::CreateDirectory(e)),
        }
        Ok(())
    }

    pub(crate) fn create_symlink(
        &mut self,
        header: &EntryHeader,
        name: &Path,
    ) -> Result<(), UnpackError> {
        let link = self.confiner.resolve(name)?;
        self.confiner.check_parent(&link)?;

        let len = Confiner::check_target_len(header.data_len)?;
        let mut raw_target = vec![0u8; len];
        let got = read_full(
            &mut self.input,
            &mut raw_target,
            Some(self.session.checksum_mut()),
        )?;
        if got < len {
            return Err(UnpackError::ShortRead { got, expected: len });
        }

        let target = path_from_bytes(&raw_target)?;
        let resolved = self.confiner.resolve_link_target(&link, target)?;
        let kind = LinkKind::classify(&resolved);

        info!(
            link = %link.display(),
            target = %target.display(),
            ?kind,
            "creating symlink"
        );
        make_symlink(target, &link, kind).map_err(UnpackError::from_create)
    }
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path, _kind: LinkKind) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path, kind: LinkKind) -> io::Result<()> {
    match kind {
        LinkKind::File => std::os::windows::fs::symlink_file(target, link),
        LinkKind::Directory => std::os::windows::fs::symlink_dir(target, link),
    }
}

#[cfg(not(any(unix, windows)))]
fn make_symlink(_target: &Path, _link: &Path, _kind: LinkKind) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}
