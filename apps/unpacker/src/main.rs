//! qfile-unpacker entry point.
//!
//! Standard input carries the sender's stream and standard output the
//! result header, so logs go to standard error.

mod app;
mod config;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting qfile-unpacker");

    let config = config::Config::load()?;
    let root = app::incoming_root(
        &config,
        std::env::args_os().nth(1),
        std::env::var("QREXEC_REMOTE_DOMAIN").ok(),
    )?;
    let root = app::prepare_root(&root)?;

    let code = app::run(&config, &root)?;
    std::process::exit(code as i32);
}
