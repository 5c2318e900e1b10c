//! Runtime configuration from flags and environment.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DENTAL_DB_PATH` | `<temp>/dental.sqlite3` | SQLite database file |
//! | `DENTAL_LOG_LEVEL` | `debug` (debug builds) / `info` | Log level |
//! | `DENTAL_LOG_DIR` | unset | Absolute log directory; logging is off when unset |

use crate::commands::Command;
use clap::Parser;
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "dental.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "dental")]
#[command(about = "Dental clinic records: patients and treatments")]
#[command(version)]
pub struct CliConfig {
    /// SQLite database file.
    #[arg(long, env = "DENTAL_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "DENTAL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, env = "DENTAL_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }

    pub fn resolved_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| dental_core::default_log_level())
    }

    /// Starts file logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<(), String> {
        let Some(log_dir) = self.log_dir.as_ref() else {
            return Ok(());
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log dir `{}` is not valid UTF-8", log_dir.display()))?;
        dental_core::init_logging(self.resolved_log_level(), log_dir)
    }
}
