//! File logging, enabled by the `STARFALL_LOG` environment variable.
//!
//! The terminal belongs to the animation, so log lines go to
//! `<data dir>/starfall.log` instead of stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use color_eyre::eyre::eyre;
use directories::ProjectDirs;
use env_logger::{Builder, Target};

/// Environment variable holding the log filter, e.g. `debug` or
/// `starfall_background=trace`.
pub const LOG_ENV: &str = "STARFALL_LOG";

/// Start logging if `STARFALL_LOG` is set. Returns the log file path.
pub fn init() -> color_eyre::Result<Option<PathBuf>> {
    let Ok(filter) = std::env::var(LOG_ENV) else {
        return Ok(None);
    };

    let dirs = ProjectDirs::from("", "", "starfall")
        .ok_or_else(|| eyre!("could not resolve a data directory for the log file"))?;
    let dir = dirs.data_local_dir();
    fs::create_dir_all(dir)?;
    let path = dir.join("starfall.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Builder::new()
        .parse_filters(&filter)
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;

    log::info!("starfall {} starting", env!("CARGO_PKG_VERSION"));
    Ok(Some(path))
}
