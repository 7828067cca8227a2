//! Table formatting utilities for CLI output.

use romdl_core::{CatalogEntry, PersistedQueueRecord};

const NAME_WIDTH: usize = 60;

/// Truncates a string to at most `max_len` characters, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use romdl_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Header line for catalog tables.
pub fn catalog_header() -> String {
    format!("{:<NAME_WIDTH$} {:>12}", "Name", "Size")
}

/// One catalog table row.
pub fn catalog_row(entry: &CatalogEntry) -> String {
    format!(
        "{:<NAME_WIDTH$} {:>12}",
        truncate_string(&entry.name, NAME_WIDTH),
        entry.size
    )
}

/// Header line for queue tables.
pub fn queue_header() -> String {
    format!("{:<NAME_WIDTH$} {:>12} {:<10} Platform", "Name", "Size", "Status")
}

/// One queue table row.
pub fn queue_row(record: &PersistedQueueRecord) -> String {
    format!(
        "{:<NAME_WIDTH$} {:>12} {:<10} {}",
        truncate_string(&record.name, NAME_WIDTH),
        record.size,
        record.status.label(),
        record.platform
    )
}

#[cfg(test)]
mod tests {
    use romdl_core::DownloadStatus;

    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_string("Pokémon Édition", 10), "Pokémon...");
        assert_eq!(truncate_string("abc", 3), "abc");
    }

    #[test]
    fn test_catalog_row_layout() {
        let row = catalog_row(&CatalogEntry {
            name: "Game".to_string(),
            url: "https://host/Game.zip".to_string(),
            size: "1.5 MiB".to_string(),
            platform: "snes".to_string(),
        });
        assert!(row.starts_with("Game "));
        assert!(row.ends_with("1.5 MiB"));
        assert_eq!(row.chars().count(), catalog_header().chars().count());
    }

    #[test]
    fn test_queue_row_shows_status() {
        let row = queue_row(&PersistedQueueRecord {
            name: "game.zip".to_string(),
            size: "1 MiB".to_string(),
            url: "https://host/game.zip".to_string(),
            platform: "snes".to_string(),
            status: DownloadStatus::Resuming,
        });
        assert!(row.contains("Resuming"));
        assert!(row.ends_with("snes"));
    }
}
