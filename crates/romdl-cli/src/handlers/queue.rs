//! Queue command handler.

use anyhow::Result;
use romdl_core::ports::QueueStateStore;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{print_separator, queue_header, queue_row};

/// Show the saved queue as the next run would see it.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let records = ctx.queue_store.load().await.map_err(CliError::from)?;

    if records.is_empty() {
        println!("The download queue is empty.");
        return Ok(());
    }

    println!("{}", queue_header());
    print_separator(100);
    for record in &records {
        println!("{}", queue_row(record));
    }
    println!(
        "\n{} saved item(s) in {}",
        records.len(),
        ctx.queue_store.path().display()
    );
    Ok(())
}
