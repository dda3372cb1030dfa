//! Raw link records per note.
//!
//! [`LinkCache`] is what the graph builder reads notes through. The native
//! [`MarkdownLinkCache`] reads every note of a [`VaultIndex`] and extracts
//! records the way Obsidian's metadata cache reports them:
//!
//! - `[[target]]` in the body → `links`
//! - `![[target]]`, `![alt](target)` and canvas file nodes → `embeds`
//! - `[text](target)` in the body → `links`
//! - wikilinks and markdown links inside frontmatter values → `frontmatter_links`
//!
//! For markdown-style links the record's `original` is the unwrapped,
//! percent-decoded target. Content inside fenced or inline code is ignored,
//! as are external URLs and pure `#anchor` targets.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::Result;
use crate::fs::AsyncFileSystem;
use crate::links::{CachedLinks, RawLink};
use crate::path_utils::extension_lowercase;
use crate::vault::VaultIndex;

/// Source of each note's raw link records.
pub trait LinkCache {
    /// Bring the cache fully up to date before a scan.
    fn force_resolve(&mut self);

    /// Records for `note`, or `None` when the cache knows nothing about it.
    fn cached_links(&self, note: &str) -> Option<&CachedLinks>;
}

/// [`LinkCache`] built from note contents.
///
/// Notes are added unparsed; [`force_resolve`](LinkCache::force_resolve)
/// parses whatever is still pending.
#[derive(Debug, Clone, Default)]
pub struct MarkdownLinkCache {
    parsed: IndexMap<String, CachedLinks>,
    pending: Vec<(String, String)>,
}

impl MarkdownLinkCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every note in `index` through `fs`.
    ///
    /// Notes that cannot be read are logged and left out.
    pub async fn load<FS: AsyncFileSystem + ?Sized>(fs: &FS, index: &VaultIndex) -> Self {
        let mut cache = Self::new();
        for note in index.notes() {
            match fs.read_to_string(&index.absolute(note)).await {
                Ok(content) => cache.insert(note, content),
                Err(e) => log::warn!("Skipping unreadable note {}: {}", note, e),
            }
        }
        cache
    }

    /// Queue a note's content for parsing, replacing any earlier version.
    pub fn insert(&mut self, note: impl Into<String>, content: impl Into<String>) {
        let note = note.into();
        self.parsed.shift_remove(&note);
        self.pending.retain(|(pending, _)| *pending != note);
        self.pending.push((note, content.into()));
    }

    /// Number of notes the cache has been given.
    pub fn len(&self) -> usize {
        self.parsed.len() + self.pending.len()
    }

    /// Whether the cache holds no notes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LinkCache for MarkdownLinkCache {
    fn force_resolve(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        log::debug!("Parsing links of {} notes", self.pending.len());
        for (note, content) in std::mem::take(&mut self.pending) {
            let links = parse_note(&note, &content);
            self.parsed.insert(note, links);
        }
    }

    fn cached_links(&self, note: &str) -> Option<&CachedLinks> {
        self.parsed.get(note)
    }
}

/// Extract the link records of one note, picking the parser by extension.
pub fn parse_note(note: &str, content: &str) -> CachedLinks {
    match extension_lowercase(note).as_deref() {
        Some("canvas") => parse_canvas(note, content),
        _ => parse_markdown(note, content),
    }
}

/// Extract link records from a markdown note.
pub fn parse_markdown(note: &str, content: &str) -> CachedLinks {
    let mut cached = CachedLinks::default();
    let (frontmatter, body) = split_frontmatter(content);

    if let Some(yaml) = frontmatter {
        match parse_frontmatter(yaml) {
            Ok(value) => collect_frontmatter_links(&value, &mut cached.frontmatter_links),
            Err(e) => log::warn!("Ignoring frontmatter of {}: {}", note, e),
        }
    }

    let mut in_fence: Option<&str> = None;
    for line in body.lines() {
        let trimmed = line.trim_start();
        let marker = if trimmed.starts_with("```") {
            Some("```")
        } else if trimmed.starts_with("~~~") {
            Some("~~~")
        } else {
            None
        };

        match (in_fence, marker) {
            (None, Some(m)) => in_fence = Some(m),
            (Some(open), Some(m)) if open == m => in_fence = None,
            (Some(_), _) => {}
            (None, None) => scan_line(line, &mut cached),
        }
    }

    cached
}

#[derive(Deserialize)]
struct CanvasFile {
    #[serde(default)]
    nodes: Vec<CanvasNode>,
}

#[derive(Deserialize)]
struct CanvasNode {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    file: Option<String>,
}

/// Extract file-node embeds from a canvas document.
pub fn parse_canvas(note: &str, content: &str) -> CachedLinks {
    let canvas: CanvasFile = match serde_json::from_str(content) {
        Ok(canvas) => canvas,
        Err(e) => {
            log::warn!("Invalid canvas {}: {}", note, e);
            return CachedLinks::default();
        }
    };

    let embeds = canvas
        .nodes
        .into_iter()
        .filter(|node| node.kind == "file")
        .filter_map(|node| node.file)
        .filter(|file| !file.is_empty())
        .map(|file| RawLink::new(file.clone(), file))
        .collect();

    CachedLinks {
        embeds,
        ..Default::default()
    }
}

/// Split `---` delimited YAML frontmatter from the body.
fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let rest = match content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    {
        Some(rest) => rest,
        None => return (None, content),
    };

    if let Some(body) = rest.strip_prefix("---\n").or_else(|| rest.strip_prefix("---\r\n")) {
        return (Some(""), body);
    }

    for closing in ["\n---\n", "\n---\r\n"] {
        if let Some(idx) = rest.find(closing) {
            return (Some(&rest[..idx]), &rest[idx + closing.len()..]);
        }
    }
    for closing in ["\n---", "\n---\r"] {
        if let Some(yaml) = rest.strip_suffix(closing) {
            return (Some(yaml), "");
        }
    }

    // Unterminated: treat the whole note as body
    (None, content)
}

/// Parse frontmatter YAML into a generic value.
fn parse_frontmatter(yaml: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(yaml)?)
}

fn collect_frontmatter_links(value: &Value, out: &mut Vec<RawLink>) {
    match value {
        Value::String(s) => {
            let mut found = CachedLinks::default();
            scan_line(s, &mut found);
            // Frontmatter has no embed semantics
            out.extend(found.links);
            out.extend(found.embeds);
        }
        Value::Sequence(items) => {
            for item in items {
                collect_frontmatter_links(item, out);
            }
        }
        Value::Mapping(map) => {
            for (_, item) in map {
                collect_frontmatter_links(item, out);
            }
        }
        Value::Tagged(tagged) => collect_frontmatter_links(&tagged.value, out),
        _ => {}
    }
}

/// Scan one line of markdown outside fenced code.
fn scan_line(line: &str, cached: &mut CachedLinks) {
    let mut rest = line;
    while let Some(idx) = rest.find(['`', '[', '!']) {
        let tail = &rest[idx..];

        if tail.starts_with('`') {
            let run = tail.bytes().take_while(|&b| b == b'`').count();
            let ticks = &tail[..run];
            rest = match tail[run..].find(ticks) {
                Some(end) => &tail[run + end + run..],
                // Unmatched backticks are literal
                None => &tail[run..],
            };
            continue;
        }

        let (embed, candidate) = match tail.strip_prefix('!') {
            Some(after) => (true, after),
            None => (false, tail),
        };

        if let Some((inner, consumed)) = parse_wikilink(candidate) {
            let link = inner.split('|').next().unwrap_or(inner).to_string();
            if embed {
                cached.embeds.push(RawLink::new(format!("![[{}]]", inner), link));
            } else {
                cached.links.push(RawLink::new(format!("[[{}]]", inner), link));
            }
            rest = &candidate[consumed..];
            continue;
        }

        if let Some((target, consumed)) = parse_markdown_link(candidate) {
            if let Some(dest) = markdown_destination(target) {
                let record = RawLink::new(dest.clone(), dest);
                if embed {
                    cached.embeds.push(record);
                } else {
                    cached.links.push(record);
                }
            }
            rest = &candidate[consumed..];
            continue;
        }

        rest = &tail[1..];
    }
}

/// `[[inner]]` at the start of `s` → (inner, bytes consumed).
fn parse_wikilink(s: &str) -> Option<(&str, usize)> {
    let after = s.strip_prefix("[[")?;
    let end = after.find("]]")?;
    let inner = &after[..end];
    if inner.trim().is_empty() || inner.contains('[') {
        return None;
    }
    Some((inner, end + 4))
}

/// `[text](target)` at the start of `s` → (raw target, bytes consumed).
fn parse_markdown_link(s: &str) -> Option<(&str, usize)> {
    let after_open = s.strip_prefix('[')?;
    let close = after_open.find(']')?;
    let after_text = &after_open[close + 1..];
    let target_start = after_text.strip_prefix('(')?;
    let prefix = 1 + close + 2;

    if let Some(angled) = target_start.strip_prefix('<') {
        let gt = angled.find('>')?;
        let paren = angled[gt..].find(')')?;
        return Some((&target_start[..gt + 2], prefix + gt + 1 + paren + 1));
    }

    let paren = closing_paren(target_start)?;
    Some((&target_start[..paren], prefix + paren + 1))
}

/// Index of the `)` closing a link destination. Nested parentheses must
/// balance, so `img (1).png)` closes after `.png`.
fn closing_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Unwrap a raw markdown target into a vault destination.
///
/// `None` for external URLs, pure anchors and empty targets.
fn markdown_destination(target: &str) -> Option<String> {
    let target = target.trim();
    let target = match target.strip_prefix('<') {
        Some(angled) => angled.split('>').next().unwrap_or(angled),
        // Without angle brackets the destination ends at the first space
        None => target.split_whitespace().next().unwrap_or(""),
    };

    if target.is_empty() || target.starts_with('#') || is_external(target) {
        return None;
    }

    let decoded = urlencoding::decode(target)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| target.to_string());
    Some(decoded)
}

fn is_external(target: &str) -> bool {
    if target.starts_with("//") {
        return true;
    }
    match target.split_once(':') {
        // Single letters are Windows drive prefixes, not schemes
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
