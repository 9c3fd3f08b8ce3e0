use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Sends `tracing` output to `log_file`.
///
/// The terminal belongs to the UI, so without a log file nothing is
/// installed and events are dropped. `RUST_LOG` overrides the default filter.
pub fn init_logging(log_file: Option<&Path>, debug: bool) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let default_filter = if debug { "rwinfra=debug" } else { "rwinfra=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
