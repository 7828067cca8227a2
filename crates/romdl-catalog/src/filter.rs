//! Name filtering for catalog listings.

use regex::RegexBuilder;

use romdl_core::CatalogEntry;

/// Entries whose name matches `pattern` anywhere, ignoring case.
///
/// An empty or invalid pattern selects every entry.
pub fn filter_entries<'a>(entries: &'a [CatalogEntry], pattern: &str) -> Vec<&'a CatalogEntry> {
    if pattern.is_empty() {
        return entries.iter().collect();
    }

    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(regex) => entries.iter().filter(|e| regex.is_match(&e.name)).collect(),
        Err(e) => {
            tracing::debug!(target: "romdl.catalog", %pattern, error = %e, "Invalid filter, showing all entries");
            entries.iter().collect()
        }
    }
}
