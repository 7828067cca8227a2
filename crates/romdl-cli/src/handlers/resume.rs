//! Resume command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::session::print_summary;

/// Re-run the saved queue until it settles.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let session = ctx.start_downloads()?;
    if session.restore().await? == 0 {
        println!("Nothing to resume.");
    }

    let summary = session.run().await?;
    print_summary(&summary);
    Ok(())
}
