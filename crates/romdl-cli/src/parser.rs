//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::commands::Commands;

/// Browse platform catalogs and download their files with resumable transfers.
#[derive(Parser)]
#[command(name = "romdl")]
#[command(about = "Browse platform catalogs and queue resumable downloads")]
#[command(version)]
pub struct Cli {
    /// Catalog configuration file (defaults to conf/application.json)
    #[arg(long, global = true, env = "ROMDL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum concurrent transfers, overriding the configuration file
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub limit: Option<u16>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Default `EnvFilter` directive for the chosen verbosity.
    ///
    /// `RUST_LOG` takes precedence when set.
    pub const fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
