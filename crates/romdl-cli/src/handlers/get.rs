//! Get command handler.
//!
//! Queues the catalog entries matching a filter. Items saved by a previous
//! run are restored first so the queue file keeps them.

use anyhow::Result;
use romdl_catalog::filter_entries;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::session::{DownloadSession, print_summary};

/// Arguments of the get command.
pub struct GetArgs<'a> {
    pub platform: &'a str,
    pub filter: &'a str,
    pub first: bool,
}

/// Execute the get command.
pub async fn execute(ctx: &CliContext, args: GetArgs<'_>) -> Result<()> {
    let session = ctx.start_downloads()?;
    if queue_matches(ctx, &session, &args).await? == 0 {
        println!("No entries match '{}' on {}.", args.filter, args.platform);
        return Ok(());
    }

    let summary = session.run().await?;
    print_summary(&summary);
    Ok(())
}

/// Restore the saved queue and add the matching entries to `session`.
///
/// Returns how many catalog entries matched. Nothing is restored when the
/// filter matches no entry.
pub async fn queue_matches(
    ctx: &CliContext,
    session: &DownloadSession,
    args: &GetArgs<'_>,
) -> Result<usize, CliError> {
    let entries = ctx.catalog.list(args.platform).await?;
    let mut selected = filter_entries(&entries, args.filter);
    if args.first {
        selected.truncate(1);
    }
    if selected.is_empty() {
        return Ok(0);
    }

    session.restore().await?;
    let matched = selected.len();
    for entry in selected {
        match session.enqueue(entry).await {
            Ok(handle) => {
                tracing::debug!(%handle, name = %entry.name, "Queued catalog entry");
            }
            Err(e) if e.is_rejection() => {
                println!("Skipping {}: {}", entry.name, e.user_message());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(matched)
}
