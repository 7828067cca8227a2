//! List command handler.
//!
//! Fetches a platform catalog and prints it as a table.

use anyhow::Result;
use romdl_catalog::filter_entries;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{catalog_header, catalog_row, print_separator};

/// Execute the list command.
pub async fn execute(ctx: &CliContext, platform: &str, filter: Option<&str>) -> Result<()> {
    let entries = ctx.catalog.list(platform).await.map_err(CliError::from)?;
    let shown = filter_entries(&entries, filter.unwrap_or_default());

    if shown.is_empty() {
        println!("No entries found for {platform}.");
        return Ok(());
    }

    println!("{}", catalog_header());
    print_separator(73);
    for entry in &shown {
        println!("{}", catalog_row(entry));
    }
    println!("\n{} of {} entries", shown.len(), entries.len());
    Ok(())
}
