//! Available subcommands.

use clap::Subcommand;

/// Commands of the `romdl` tool.
#[derive(Subcommand)]
pub enum Commands {
    /// List configured platforms
    Platforms,

    /// Show the catalog of a platform
    List {
        /// Platform name from the configuration file
        platform: String,
        /// Case-insensitive regular expression matched against entry names
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Download the catalog entries matching a filter
    Get {
        /// Platform name from the configuration file
        platform: String,
        /// Case-insensitive regular expression matched against entry names
        #[arg(short, long)]
        filter: String,
        /// Only download the first match
        #[arg(long)]
        first: bool,
    },

    /// Continue the downloads left unfinished by a previous run
    Resume,

    /// Show the saved download queue without running it
    Queue,
}
