//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub [async] fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that validate CLI input, call the catalog or the download
//!   session, and format output for the terminal

pub mod get;
pub mod list;
pub mod platforms;
pub mod queue;
pub mod resume;
