//! Link normalization.
//!
//! Turns one note's raw link records, as produced by a [`LinkCache`], into
//! resolved references to attachments.
//!
//! # Record shapes handled
//!
//! | `original` | Destination used |
//! |------------|------------------|
//! | `[[img.png]]`, `![[img.png\|300]]` | `img.png` |
//! | `[[Note#Heading\|alias]]` | `Note` (dropped later if it resolves to a note) |
//! | `[[#Heading]]` | dropped |
//! | `[text](#anchor)`, any other `[text](target)` | dropped |
//! | `assets/My File.pdf` (markdown link, already unwrapped by the cache) | `assets/My File.pdf` |
//! | `img.png` (frontmatter value) | `img.png` |
//!
//! [`LinkCache`]: crate::link_cache::LinkCache

use std::iter::Chain;
use std::slice::Iter;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::resolver::LinkResolver;
use crate::vault::is_note_path;

/// One raw link, embed or frontmatter-link record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLink {
    /// The link exactly as written, e.g. `![[img.png|300]]`
    pub original: String,
    /// Shorthand link text, e.g. `img.png`
    pub link: String,
}

impl RawLink {
    /// Create a record from its original text and shorthand.
    pub fn new(original: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            link: link.into(),
        }
    }
}

/// Everything a link cache knows about one note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedLinks {
    /// Links in the note body
    pub links: Vec<RawLink>,
    /// Embeds in the note body
    pub embeds: Vec<RawLink>,
    /// Links found in frontmatter values
    pub frontmatter_links: Vec<RawLink>,
}

impl CachedLinks {
    /// True when the note has no links, embeds or frontmatter links at all.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.embeds.is_empty() && self.frontmatter_links.is_empty()
    }

    /// All records: links, then frontmatter links, then embeds.
    pub fn records(&self) -> RawRecords<'_> {
        self.links
            .iter()
            .chain(self.frontmatter_links.iter())
            .chain(self.embeds.iter())
    }
}

/// Iterator over every record of a [`CachedLinks`].
pub type RawRecords<'a> = Chain<Chain<Iter<'a, RawLink>, Iter<'a, RawLink>>, Iter<'a, RawLink>>;

/// A note's reference to an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Link {
    /// Shorthand display text of the record
    pub text: String,
    /// The record's original text
    pub dest: String,
    /// Store path of the attachment it resolved to
    pub resolved: String,
}

/// Reduce a record's original text to the destination to resolve.
///
/// Returns `None` for records that can never point at an attachment:
/// empty records, same-note heading links and still-wrapped markdown links
/// such as `[x](#anchor)`. Link caches hand markdown-link destinations over
/// unwrapped, so a wrapped one is always an in-document anchor.
///
/// # Examples
///
/// ```
/// use resort_core::links::clean_destination;
///
/// assert_eq!(clean_destination("![[img.png|300]]").as_deref(), Some("img.png"));
/// assert_eq!(clean_destination("[[Doc#Part|see]]").as_deref(), Some("Doc"));
/// assert_eq!(clean_destination("[[#Heading]]"), None);
/// assert_eq!(clean_destination("[components](#components)"), None);
/// assert_eq!(clean_destination("assets/a b.png").as_deref(), Some("assets/a b.png"));
/// ```
pub fn clean_destination(original: &str) -> Option<String> {
    if original.is_empty() || original.starts_with("[[#") {
        return None;
    }

    let mut dest = original;
    if let Some(inner) = dest.strip_prefix("[[").and_then(|d| d.strip_suffix("]]")) {
        dest = inner;
    } else if let Some(inner) = dest.strip_prefix("![[").and_then(|d| d.strip_suffix("]]")) {
        dest = inner;
    }

    if is_markdown_link(dest) {
        return None;
    }

    let dest = strip_subpath(dest);
    if dest.is_empty() {
        None
    } else {
        Some(dest.to_string())
    }
}

/// Whether `value` is exactly `[text](target)` with non-empty text and target.
fn is_markdown_link(value: &str) -> bool {
    let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(')')) else {
        return false;
    };

    inner
        .match_indices("](")
        .any(|(idx, _)| idx > 0 && idx + 2 < inner.len())
}

/// Drop `|alias`, `#heading`, `#heading|alias` and their escaped forms.
///
/// A marker only counts when at least one character follows it.
fn strip_subpath(dest: &str) -> &str {
    let bytes = dest.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        let escaped = b == b'\\' && matches!(bytes.get(i + 1), Some(b'|') | Some(b'#'));
        if escaped && i + 2 < bytes.len() {
            return &dest[..i];
        }
        if (b == b'|' || b == b'#') && i + 1 < bytes.len() {
            return &dest[..i];
        }
    }
    dest
}

/// Lazily normalize the records of one note.
///
/// The iterator is finite and restartable (clone it before consuming to scan
/// twice). Order follows [`CachedLinks::records`]; a note referencing the same
/// attachment twice yields it twice.
pub fn normalize_links<'a, R: LinkResolver + ?Sized>(
    note: &'a str,
    cached: &'a CachedLinks,
    resolver: &'a R,
) -> NormalizedLinks<'a, R> {
    NormalizedLinks {
        note,
        records: cached.records(),
        resolver,
    }
}

/// Iterator returned by [`normalize_links`].
pub struct NormalizedLinks<'a, R: ?Sized> {
    note: &'a str,
    records: RawRecords<'a>,
    resolver: &'a R,
}

impl<R: ?Sized> Clone for NormalizedLinks<'_, R> {
    fn clone(&self) -> Self {
        Self {
            note: self.note,
            records: self.records.clone(),
            resolver: self.resolver,
        }
    }
}

impl<R: LinkResolver + ?Sized> Iterator for NormalizedLinks<'_, R> {
    type Item = Link;

    fn next(&mut self) -> Option<Link> {
        for record in self.records.by_ref() {
            let Some(dest) = clean_destination(&record.original) else {
                continue;
            };

            let Some(resolved) = self.resolver.resolve(&dest, self.note) else {
                log::debug!(
                    "Could not resolve link {:?} in {} (parsed as {:?})",
                    record.original,
                    self.note,
                    dest
                );
                continue;
            };

            // Note-to-note links say nothing about attachment placement
            if is_note_path(&resolved) {
                continue;
            }

            return Some(Link {
                text: record.link.clone(),
                dest: record.original.clone(),
                resolved,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(dest: &str, _source: &str) -> Option<String> {
        match dest {
            "img.png" => Some("Docs/A/assets/img.png".to_string()),
            "Doc" => Some("Docs/Doc.md".to_string()),
            "a b.png" => Some("a b.png".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_clean_strips_wikilink_markers() {
        assert_eq!(clean_destination("[[img.png]]").as_deref(), Some("img.png"));
        assert_eq!(clean_destination("![[img.png]]").as_deref(), Some("img.png"));
        assert_eq!(clean_destination("img.png").as_deref(), Some("img.png"));
    }

    #[test]
    fn test_clean_strips_alias_and_heading() {
        assert_eq!(clean_destination("[[img.png|alt]]").as_deref(), Some("img.png"));
        assert_eq!(clean_destination("[[Doc#Part]]").as_deref(), Some("Doc"));
        assert_eq!(clean_destination("[[Doc#Part|alt]]").as_deref(), Some("Doc"));
        assert_eq!(clean_destination("[[img.png\\|alt]]").as_deref(), Some("img.png"));
        assert_eq!(clean_destination("[[Doc\\#Part]]").as_deref(), Some("Doc"));
    }

    #[test]
    fn test_clean_keeps_trailing_marker_without_suffix() {
        assert_eq!(clean_destination("[[odd#]]").as_deref(), Some("odd#"));
    }

    #[test]
    fn test_clean_drops_headings_and_empty() {
        assert_eq!(clean_destination(""), None);
        assert_eq!(clean_destination("[[#Heading]]"), None);
        assert_eq!(clean_destination("[see](#anchor)"), None);
        assert_eq!(clean_destination("[[|alias]]"), None);
    }

    #[test]
    fn test_clean_drops_wrapped_markdown_links() {
        assert_eq!(clean_destination("[file](assets/img.png)"), None);
        assert_eq!(clean_destination("[](img.png)").as_deref(), Some("[](img.png)"));
    }

    #[test]
    fn test_clean_unwrapped_markdown_destination() {
        assert_eq!(
            clean_destination("assets/My File.pdf").as_deref(),
            Some("assets/My File.pdf")
        );
        assert_eq!(clean_destination("Doc.md#part").as_deref(), Some("Doc.md"));
    }

    #[test]
    fn test_normalize_drops_unresolved_and_note_targets() {
        let cached = CachedLinks {
            links: vec![
                RawLink::new("[[Doc]]", "Doc"),
                RawLink::new("[[missing.png]]", "missing.png"),
            ],
            embeds: vec![RawLink::new("![[img.png]]", "img.png")],
            frontmatter_links: vec![],
        };

        let links: Vec<Link> = normalize_links("Docs/B.md", &cached, &resolver).collect();
        assert_eq!(
            links,
            vec![Link {
                text: "img.png".to_string(),
                dest: "![[img.png]]".to_string(),
                resolved: "Docs/A/assets/img.png".to_string(),
            }]
        );
    }

    #[test]
    fn test_normalize_keeps_duplicates_in_order() {
        let cached = CachedLinks {
            links: vec![RawLink::new("[[img.png|small]]", "img.png")],
            embeds: vec![RawLink::new("![[img.png]]", "img.png")],
            frontmatter_links: vec![RawLink::new("a b.png", "a b.png")],
        };

        let dests: Vec<String> = normalize_links("Docs/B.md", &cached, &resolver)
            .map(|l| l.dest)
            .collect();
        assert_eq!(dests, ["[[img.png|small]]", "a b.png", "![[img.png]]"]);
    }

    #[test]
    fn test_normalize_is_restartable() {
        let cached = CachedLinks {
            embeds: vec![RawLink::new("![[img.png]]", "img.png")],
            ..Default::default()
        };

        let iter = normalize_links("Docs/B.md", &cached, &resolver);
        assert_eq!(iter.clone().count(), 1);
        assert_eq!(iter.count(), 1);
    }

    #[test]
    fn test_cached_links_is_empty() {
        assert!(CachedLinks::default().is_empty());
        let cached = CachedLinks {
            frontmatter_links: vec![RawLink::new("img.png", "img.png")],
            ..Default::default()
        };
        assert!(!cached.is_empty());
    }
}
