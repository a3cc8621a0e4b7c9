//! Receiving side of the inter-VM file copy protocol.
//!
//! The peer is untrusted. [`Unpacker`] reads entries from its stream,
//! validates each one against the [`Confiner`] and the session [`Limits`],
//! and creates the described files, directories and symlinks. The first
//! failure ends the session; [`report`] then sends the status and rolling
//! checksum back to the peer.
//!
//! # Wire format
//!
//! See [`qfile_protocol::wire`].

mod confine;
mod error;
mod handlers;
mod metadata;
mod session;
pub mod status;
mod unpacker;

pub use confine::{Confinement, Confiner, LinkKind, path_from_bytes};
pub use error::UnpackError;
pub use session::{Limits, TransferSession};
pub use status::{report, send_status};
pub use unpacker::{Outcome, Unpacker};
