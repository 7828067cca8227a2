//! Directory-listing parser.
//!
//! Listing pages are HTML tables where each file is a `<tr>` holding a
//! `<td class="link">` cell with an anchor and a `<td class="size">` cell:
//!
//! ```html
//! <tr>
//!   <td class="link"><a href="Game%20(USA).zip">Game (USA).zip</a></td>
//!   <td class="size">1.2 MiB</td>
//! </tr>
//! ```
//!
//! Rows without a link cell (headers, parent-directory rows) are skipped, as
//! are links whose text does not end in the platform extension.

use regex::{Regex, RegexBuilder};

use romdl_core::CatalogEntry;

/// One platform's listing rules.
#[derive(Debug, Clone, Copy)]
pub struct ListingContext<'a> {
    /// Listing page URL; hrefs are appended to it verbatim.
    pub base_url: &'a str,
    /// Platform key stored on every entry.
    pub platform: &'a str,
    /// Extension without the dot.
    pub ext: &'a str,
}

/// Compiled patterns for listing pages.
#[derive(Debug, Clone)]
pub struct ListingParser {
    row: Regex,
    link_cell: Regex,
    size_cell: Regex,
    anchor: Regex,
    tag: Regex,
    entity: Regex,
}

fn html_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
}

impl ListingParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            row: html_pattern(r"<tr\b[^>]*>(.*?)</tr>")?,
            link_cell: html_pattern(r#"<td\b[^>]*\bclass\s*=\s*["'][^"']*\blink\b[^"']*["'][^>]*>(.*?)</td>"#)?,
            size_cell: html_pattern(r#"<td\b[^>]*\bclass\s*=\s*["'][^"']*\bsize\b[^"']*["'][^>]*>(.*?)</td>"#)?,
            anchor: html_pattern(r#"<a\b[^>]*\bhref\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#)?,
            tag: html_pattern(r"<[^>]*>")?,
            entity: Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);")?,
        })
    }

    /// Extract the entries of `html` that match `context.ext`, in page order.
    pub fn parse(&self, html: &str, context: ListingContext<'_>) -> Vec<CatalogEntry> {
        let suffix = format!(".{}", context.ext);

        self.row
            .captures_iter(html)
            .filter_map(|row| {
                let row = row.get(1)?.as_str();
                let link = self.link_cell.captures(row)?;
                let anchor = self.anchor.captures(link.get(1)?.as_str())?;

                let href = self.decode_entities(anchor.get(1)?.as_str());
                let text = self.text_of(anchor.get(2)?.as_str());
                let name = text.strip_suffix(&suffix)?;

                let size = self
                    .size_cell
                    .captures(row)
                    .and_then(|cell| cell.get(1))
                    .map(|cell| self.text_of(cell.as_str()))
                    .unwrap_or_default();

                Some(CatalogEntry {
                    name: name.to_string(),
                    url: format!("{}{href}", context.base_url),
                    size,
                    platform: context.platform.to_string(),
                })
            })
            .collect()
    }

    /// Visible text of an HTML fragment, trimmed.
    fn text_of(&self, fragment: &str) -> String {
        self.decode_entities(self.tag.replace_all(fragment, "").trim())
    }

    /// Decode numeric character references and the named entities listing
    /// pages use. Anything else is kept verbatim.
    fn decode_entities(&self, text: &str) -> String {
        self.entity
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let reference = &caps[1];
                decode_reference(reference).map_or_else(|| caps[0].to_string(), String::from)
            })
            .into_owned()
    }
}

fn decode_reference(reference: &str) -> Option<char> {
    if let Some(hex) = reference
        .strip_prefix("#x")
        .or_else(|| reference.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(decimal) = reference.strip_prefix('#') {
        return decimal.parse().ok().and_then(char::from_u32);
    }
    match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    }
}
