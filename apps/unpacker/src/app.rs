//! Session setup: incoming directory, standard streams, exit status.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use qfile_receiver::{Confiner, Unpacker, report};

use crate::config::{Config, expand_home};

/// Picks the confinement root.
///
/// Priority: explicit argument > `<incoming_dir>/<remote domain>`.
pub fn incoming_root(
    config: &Config,
    arg: Option<OsString>,
    remote_domain: Option<String>,
) -> anyhow::Result<PathBuf> {
    if let Some(arg) = arg.filter(|a| !a.is_empty()) {
        return Ok(PathBuf::from(arg));
    }

    let Some(domain) = remote_domain.filter(|d| !d.is_empty()) else {
        bail!("QREXEC_REMOTE_DOMAIN is not set and no incoming directory was given");
    };
    if domain.contains(['/', '\\']) || domain == "." || domain == ".." {
        bail!("invalid remote domain name: {domain}");
    }

    Ok(expand_home(&config.incoming_dir).join(domain))
}

/// Creates the incoming directory chain if needed and returns its
/// canonical path.
pub fn prepare_root(path: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create incoming directory {}", path.display()))?;
    std::fs::canonicalize(path)
        .with_context(|| format!("failed to canonicalize {}", path.display()))
}

/// Runs one session over standard input/output and returns the exit code.
pub fn run(config: &Config, root: &Path) -> anyhow::Result<u32> {
    let confiner = Confiner::new(root, config.confinement)
        .with_context(|| format!("invalid incoming directory {}", root.display()))?;

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    let mut unpacker = Unpacker::new(stdin, confiner, config.limits())
        .preserve_metadata(config.preserve_metadata);
    let outcome = unpacker.run();

    let code = report(&mut stdout, &outcome, unpacker.session()).context("sending status")?;
    tracing::debug!(
        code,
        success = outcome.is_success(),
        files = unpacker.session().files_received(),
        "session finished"
    );
    Ok(code)
}
