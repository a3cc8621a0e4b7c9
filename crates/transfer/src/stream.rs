//! Blocking reads over an untrusted transport.
//!
//! Reads retry until satisfied; there is no timeout, so a stalled peer
//! stalls the caller. Hard errors are returned immediately.

use std::io::{self, ErrorKind, Read};

use tracing::trace;

use crate::Crc32;

/// Fills `buf` from `reader`, stopping early only at end of stream.
///
/// Returns the number of bytes obtained; a value below `buf.len()` means the
/// peer closed the stream. Every byte obtained, including those of a short
/// read, is folded into `checksum` in read order.
pub fn read_full<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    mut checksum: Option<&mut Crc32>,
) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => {
                if let Some(crc) = checksum.as_deref_mut() {
                    crc.update(&buf[filled..filled + n]);
                }
                filled += n;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    if filled < buf.len() {
        trace!(requested = buf.len(), filled, "short read");
    }
    Ok(filled)
}

/// Appends to `buf` until the peer closes the stream or `max_len` bytes
/// have been collected. Returns the number of bytes appended.
pub fn read_until_eof<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_len: usize,
) -> io::Result<usize> {
    let mut limited = Read::take(&mut *reader, max_len as u64);
    limited.read_to_end(buf)
}
