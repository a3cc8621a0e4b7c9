//! The entry dispatch loop.

use std::io::Read;
use std::path::Path;

use qfile_protocol::{ENTRY_HEADER_SIZE, EntryHeader, EntryKind, LEGAL_EOF};
use qfile_transfer::read_full;
use tracing::{debug, info, warn};

use crate::confine::{Confiner, path_from_bytes};
use crate::{Limits, TransferSession, UnpackError};

/// How a session ended.
#[derive(Debug)]
pub enum Outcome {
    /// The peer sent the end-of-transfer marker.
    Complete,
    /// The peer closed the stream where a header or name was expected.
    PeerClosed,
    /// An entry was rejected; nothing after it was read.
    Failed {
        error: UnpackError,
        /// Raw name of the entry being processed, when it was read.
        entry: Option<Vec<u8>>,
    },
}

impl Outcome {
    /// Status code before the legal-EOF sentinel is folded into success.
    pub fn status(&self) -> u32 {
        match self {
            Self::Complete => 0,
            Self::PeerClosed => LEGAL_EOF,
            Self::Failed { error, .. } => error.code().errno(),
        }
    }

    pub fn last_entry(&self) -> Option<&[u8]> {
        match self {
            Self::Failed {
                entry: Some(name), ..
            } => Some(name),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Reads entries from an untrusted stream and materializes them under the
/// confinement root.
pub struct Unpacker<R> {
    pub(crate) input: R,
    pub(crate) confiner: Confiner,
    pub(crate) session: TransferSession,
    pub(crate) preserve_metadata: bool,
}

impl<R: Read> Unpacker<R> {
    pub fn new(input: R, confiner: Confiner, limits: Limits) -> Self {
        Self {
            input,
            confiner,
            session: TransferSession::new(limits),
            preserve_metadata: false,
        }
    }

    /// Applies sender times and permission bits to received entries.
    pub fn preserve_metadata(mut self, enabled: bool) -> Self {
        self.preserve_metadata = enabled;
        self
    }

    pub fn session(&self) -> &TransferSession {
        &self.session
    }

    /// Returns the input stream, positioned after the last byte consumed.
    pub fn into_inner(self) -> R {
        self.input
    }

    /// Processes entries until the end marker, end of stream, or the first
    /// failure.
    pub fn run(&mut self) -> Outcome {
        debug!(
            root = %self.confiner.root().display(),
            confinement = ?self.confiner.mode(),
            "receiving files"
        );

        loop {
            let header = match self.read_header() {
                Some(header) => header,
                None => {
                    info!(
                        files = self.session.files_received(),
                        "peer closed the stream before the end marker"
                    );
                    return Outcome::PeerClosed;
                }
            };

            if header.is_terminator() {
                info!(
                    files = self.session.files_received(),
                    bytes = self.session.bytes_received(),
                    "transfer complete"
                );
                return Outcome::Complete;
            }

            let name_len = match Confiner::check_name_len(u64::from(header.name_len)) {
                Ok(len) => len,
                Err(error) => return fail(error, None),
            };

            let mut name = vec![0u8; name_len];
            match read_full(&mut self.input, &mut name, Some(self.session.checksum_mut())) {
                Ok(n) if n == name_len => {}
                _ => {
                    info!("peer closed the stream inside an entry name");
                    return Outcome::PeerClosed;
                }
            }

            let path = match path_from_bytes(&name) {
                Ok(path) => path,
                Err(error) => return fail(error, None),
            };

            if let Err(error) = self.process_entry(&header, path) {
                return fail(error, Some(name));
            }
            if let Err(error) = self.session.complete_entry() {
                return fail(error, Some(name));
            }
        }
    }

    /// Reads the next header. `None` means the stream ended or broke first.
    fn read_header(&mut self) -> Option<EntryHeader> {
        let mut buf = [0u8; ENTRY_HEADER_SIZE];
        match read_full(&mut self.input, &mut buf, Some(self.session.checksum_mut())) {
            Ok(ENTRY_HEADER_SIZE) => Some(EntryHeader::from_bytes(&buf)),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "reading entry header failed");
                None
            }
        }
    }

    fn process_entry(&mut self, header: &EntryHeader, name: &Path) -> Result<(), UnpackError> {
        debug!(name = %name.display(), mode = header.mode, "entry");
        match header.kind() {
            EntryKind::RegularFile => self.receive_file(header, name),
            EntryKind::Directory => self.create_directory(header, name),
            EntryKind::Symlink => self.create_symlink(header, name),
            EntryKind::Other(_) => Err(UnpackError::UnsupportedKind { mode: header.mode }),
        }
    }
}

fn fail(error: UnpackError, entry: Option<Vec<u8>>) -> Outcome {
    warn!(
        code = %error.code(),
        entry = %entry.as_deref().map(String::from_utf8_lossy).unwrap_or_default(),
        %error,
        "transfer aborted"
    );
    Outcome::Failed { error, entry }
}
