//! CLI for the toolbox utilities.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::{Path, PathBuf};
use std::time::Duration;
use toolbox_core::config::{self, ToolboxConfig};
use toolbox_core::playlist::MissingKeyPolicy;

use commands::{run_completions, run_dup_keys, run_man, run_playlist, run_wrap};

/// Top-level CLI for the toolbox utilities.
#[derive(Debug, Parser)]
#[command(name = "toolbox", version)]
#[command(about = "Small operator utilities: playlist commands, duplicate JSON keys, line wrapping", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print one download command per playlist item of a saved HTML page.
    Playlist {
        /// HTML file. Omit (or pass "-") to read the page from stdin.
        path: Option<PathBuf>,
        /// Command prefix placed before each item key (default from config).
        #[arg(long)]
        prefix: Option<String>,
        /// Seconds to wait after the page has loaded before extracting (default from config).
        #[arg(long, value_name = "SECS")]
        delay_secs: Option<u64>,
        /// Leave out items without a key instead of printing an "N/A" line.
        #[arg(long)]
        skip_missing: bool,
    },

    /// Report object keys that occur at more than one path in a JSON document.
    DupKeys {
        /// JSON file. Omit (or pass "-") to read from stdin.
        path: Option<PathBuf>,
        /// Maximum nesting of arrays/objects before giving up (default from config).
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
        /// Print the result on a single line.
        #[arg(long)]
        compact: bool,
    },

    /// Re-wrap stdin to a column width without splitting words.
    Wrap {
        /// Maximum line width in characters (default from config).
        #[arg(long, value_name = "N")]
        width: Option<usize>,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

/// `-` means stdin, same as no path.
fn input_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| p.as_path() != Path::new("-"))
}

impl CliCommand {
    fn needs_config(&self) -> bool {
        !matches!(self, CliCommand::Completions { .. } | CliCommand::Man)
    }

    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = if cli.command.needs_config() {
            config::load_or_init()?
        } else {
            ToolboxConfig::default()
        };
        tracing::debug!("loaded config: {:?}", cfg);
        cli.command.dispatch(&cfg).await
    }

    async fn dispatch(self, cfg: &ToolboxConfig) -> Result<()> {
        match self {
            CliCommand::Playlist {
                path,
                prefix,
                delay_secs,
                skip_missing,
            } => {
                let mut opts = cfg.playlist.to_options();
                if let Some(prefix) = prefix {
                    opts.prefix = prefix;
                }
                if skip_missing {
                    opts.missing_key = MissingKeyPolicy::Skip;
                }
                let settle =
                    Duration::from_secs(delay_secs.unwrap_or(cfg.playlist.settle_delay_secs));
                run_playlist(input_path(path), opts, settle).await?;
            }
            CliCommand::DupKeys {
                path,
                max_depth,
                compact,
            } => {
                let max_depth = max_depth.unwrap_or(cfg.dup_keys.max_depth);
                run_dup_keys(input_path(path), max_depth, compact)?;
            }
            CliCommand::Wrap { width } => run_wrap(width.unwrap_or(cfg.wrap.width))?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
