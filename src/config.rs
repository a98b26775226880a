//! Command line configuration and logger setup.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use clap::Parser;
use color_eyre::eyre::Result;
use env_logger::{Builder, Env, Target};

use crate::parser::FormatVersion;

/// Command line arguments of the game.
///
/// Without arguments the game opens on the main menu.
#[derive(Debug, Default, PartialEq, Eq, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Map file to load and play right away, skipping the main menu.
    #[arg(short, long, value_name = "PATH")]
    pub map_file: Option<PathBuf>,
    /// Map format version to assume instead of detecting it from the map header.
    #[arg(short = 'f', long, value_enum, value_name = "VERSION")]
    pub format_version: Option<FormatVersion>,
    /// File that receives log output.
    ///
    /// Logging is off unless this is set or `RUST_LOG` asks for it, since log lines written to
    /// the terminal would tear up the game screen.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Installs the global logger.
///
/// `RUST_LOG` always takes precedence. Otherwise logging is off, or at `info` level when
/// `log_file` is given.
///
/// # Errors
///
/// This function may return errors if:
/// - The log file cannot be created
/// - A global logger is already installed
pub fn init_logger(log_file: Option<&Path>) -> Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));

    if let Some(path) = log_file {
        let _ = builder.target(Target::Pipe(Box::new(File::create(path)?)));
    }

    builder.try_init()?;

    Ok(())
}
