//! Platforms command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Print configured platforms in configuration order.
pub fn execute(ctx: &CliContext) -> Result<()> {
    if ctx.settings.platforms.is_empty() {
        println!("No platforms configured.");
        return Ok(());
    }

    for platform in &ctx.settings.platforms {
        println!(
            "{:<16} .{:<6} {}",
            platform.name,
            platform.ext,
            platform.directory.display()
        );
    }
    Ok(())
}
