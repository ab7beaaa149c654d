use std::io;

use anyhow::Context;

pub mod cli;
pub mod commands;
pub mod dispatch;
pub mod error;
pub mod version;

pub type Result<T> = anyhow::Result<T>;

/// Entry point used by the binary crate and integration tests.
pub fn run() -> Result<()> {
    init_tracing();

    let registry = commands::registry(version::BuildInfo::from_build_env())
        .context("failed to build command registry")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch::execute(&registry, std::env::args_os().skip(1), &mut out)
        .context("failed to execute command")?;
    Ok(())
}

fn init_tracing() {
    use std::sync::Once;
    use tracing_subscriber::{fmt, EnvFilter};

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    });
}
