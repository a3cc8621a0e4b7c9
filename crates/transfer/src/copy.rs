use std::io::{self, ErrorKind, Read, Write};

use crate::Crc32;

/// Size of the intermediate buffer used by [`copy_stream`].
pub const COPY_BUFFER_SIZE: usize = 4096;

/// Why a [`copy_stream`] call stopped before moving every byte.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("unexpected end of data while reading ({copied} of {expected} bytes)")]
    UnexpectedEof { copied: u64, expected: u64 },

    #[error("error reading: {0}")]
    Read(#[source] io::Error),

    #[error("error writing: {0}")]
    Write(#[source] io::Error),
}

/// Moves exactly `size` bytes from `input` to `output`.
///
/// Every chunk read is fed to `checksum` (if any) before it is written, and
/// `progress` (if any) is called with the chunk length once it is written.
/// The caller decides which checksum to feed; this function never assumes
/// it owns a session-wide value.
pub fn copy_stream<R, W>(
    input: &mut R,
    output: &mut W,
    size: u64,
    mut checksum: Option<&mut Crc32>,
    mut progress: Option<&mut dyn FnMut(usize)>,
) -> Result<(), CopyError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = [0u8; COPY_BUFFER_SIZE];
    let mut copied: u64 = 0;

    while copied < size {
        let want = (size - copied).min(COPY_BUFFER_SIZE as u64) as usize;
        let n = match input.read(&mut buf[..want]) {
            Ok(0) => {
                return Err(CopyError::UnexpectedEof {
                    copied,
                    expected: size,
                });
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        if let Some(crc) = checksum.as_deref_mut() {
            crc.update(&buf[..n]);
        }
        output.write_all(&buf[..n]).map_err(CopyError::Write)?;
        if let Some(notify) = progress.as_deref_mut() {
            notify(n);
        }
        copied += n as u64;
    }

    Ok(())
}
