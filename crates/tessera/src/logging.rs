//! File logging. The terminal belongs to the UI, so logs never go to stdout.

use std::fs::{self, File};
use std::sync::Mutex;

use color_eyre::eyre::{WrapErr, eyre};

use crate::config::Config;

/// Install the log subscriber when `log_level` is configured.
pub fn init(config: &Config) -> color_eyre::Result<()> {
    let Some(level) = config.log_level()? else {
        return Ok(());
    };
    let dirs = Config::project_dirs().ok_or_else(|| eyre!("no home directory for log file"))?;
    let dir = dirs.data_dir();
    fs::create_dir_all(dir).wrap_err_with(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join("tessera.log");
    let file =
        File::create(&path).wrap_err_with(|| format!("failed to create {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))?;

    tracing::info!(path = %path.display(), %level, "logging started");
    Ok(())
}
