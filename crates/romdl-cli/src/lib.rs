//! Command-line adapter for romdl.
//!
//! Parses arguments, composes the catalog and download crates, and renders
//! download progress on the terminal.

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod session;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
pub use session::{DownloadSession, SessionSummary};
