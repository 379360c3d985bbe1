//! CLI for lodge.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lodge_core::config::{self, LodgeConfig};
use std::path::PathBuf;

use commands::{run_ext, run_formats, run_save, SaveArgs};

/// Top-level CLI for lodge.
#[derive(Debug, Parser)]
#[command(name = "lodge")]
#[command(about = "lodge: save data to files, choosing the format from the extension", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/lodge/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Save JSON data from a file (or `-` for stdin) to a destination.
    Save {
        /// JSON input file, or `-` for stdin.
        input: String,

        /// Destination path or file:// URL; its extension picks the format.
        destination: String,

        /// Treat the input as a rectangular numeric array (float64).
        #[arg(long)]
        array: bool,

        /// JSON indentation width.
        #[arg(long, value_name = "N")]
        indent: Option<usize>,

        /// Write single-line JSON.
        #[arg(long)]
        compact: bool,

        /// JPEG quality (1-100).
        #[arg(long, value_name = "Q", value_parser = clap::value_parser!(u8).range(1..=100))]
        jpeg_quality: Option<u8>,
    },

    /// List supported extensions and their drivers.
    Formats,

    /// Show which driver a destination would use.
    Ext {
        /// Destination path or URL.
        destination: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        cli.command.run(&cfg)
    }

    fn run(self, cfg: &LodgeConfig) -> Result<()> {
        match self {
            CliCommand::Save {
                input,
                destination,
                array,
                indent,
                compact,
                jpeg_quality,
            } => {
                let mut options = cfg.save.clone();
                if let Some(indent) = indent {
                    options.json.indent = indent;
                }
                options.json.compact |= compact;
                if let Some(quality) = jpeg_quality {
                    options.image.jpeg_quality = quality;
                }
                run_save(&SaveArgs {
                    input,
                    destination,
                    array,
                    options,
                })?
            }
            CliCommand::Formats => run_formats()?,
            CliCommand::Ext { destination } => run_ext(&destination)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
