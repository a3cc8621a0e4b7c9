//! Blocking stream primitives shared by the file copy tools.
//!
//! - [`stream`]: read-exactly / read-until-EOF helpers over any [`std::io::Read`].
//! - [`Crc32`]: the rolling checksum accumulated over a transfer.
//! - [`copy_stream`]: chunked copy of a known number of bytes, optionally
//!   feeding a checksum and a progress callback.

mod checksum;
mod copy;
mod progress;
pub mod stream;

pub use checksum::Crc32;
pub use copy::{COPY_BUFFER_SIZE, CopyError, copy_stream};
pub use progress::{PROGRESS_NOTIFY_DELTA, ProgressThrottle};
pub use stream::{read_full, read_until_eof};
