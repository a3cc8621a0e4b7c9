//! The final status message sent back to the peer.

use std::io::{self, Write};

use qfile_protocol::{LEGAL_EOF, ResultExtension, ResultHeader};
use tracing::debug;

use crate::{Outcome, TransferSession};

/// Writes the result header, plus the last entry name for failures.
///
/// `LEGAL_EOF` is reported as `0`. Returns the code actually sent, which is
/// also the process exit code.
pub fn send_status<W: Write + ?Sized>(
    out: &mut W,
    status: u32,
    crc32: u32,
    last_entry: Option<&[u8]>,
) -> io::Result<u32> {
    let error_code = if status == LEGAL_EOF { 0 } else { status };
    debug!(error_code, crc32, "sending status");

    out.write_all(&ResultHeader { error_code, crc32 }.to_bytes())?;
    match last_entry {
        Some(name) if error_code != 0 => {
            out.write_all(&ResultExtension::new(name).to_bytes())?;
        }
        _ => {}
    }
    out.flush()?;
    Ok(error_code)
}

/// Reports the outcome of a finished session.
pub fn report<W: Write + ?Sized>(
    out: &mut W,
    outcome: &Outcome,
    session: &TransferSession,
) -> io::Result<u32> {
    send_status(out, outcome.status(), session.checksum(), outcome.last_entry())
}
