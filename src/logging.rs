use std::fs::{self, File, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

fn filter(cfg: &Config) -> EnvFilter {
    EnvFilter::try_new(&cfg.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// The dashboard owns the terminal, so its logs go to a file.
/// Returns `Ok(false)` when no log file location is configured.
pub fn init_file_logging(cfg: &Config) -> Result<bool> {
    let Some(path) = cfg.log_file.as_ref() else {
        return Ok(false);
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create log dir {}", parent.display()))?;
        }
    }
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(cfg))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(true)
}

pub fn init_stderr_logging(cfg: &Config) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(cfg))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
