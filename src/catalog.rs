//! Translation catalog: per-language phrase tables and tag matching.
//!
//! The catalog is built once at startup and read-only afterwards, so any
//! number of concurrent requests can consult it without synchronisation.
//! Each source is a flat JSON object of phrase key → template string:
//!
//! ```json
//! { "greeting": "Bonjour", "inbox": "Vous avez {count} messages" }
//! ```
//!
//! Selection never fails: [`Catalog::translator`] tries the requested tag,
//! then each entry of the `Accept-Language` list by descending quality, then
//! the default language, which construction guarantees is present.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::Error;

type Phrases = Arc<HashMap<String, String>>;

/// Phrase tables for every loaded language, keyed by normalized tag.
pub struct Catalog {
    languages: HashMap<String, Phrases>,
}

impl Catalog {
    pub(crate) fn new() -> Self {
        Self { languages: HashMap::new() }
    }

    /// Loads one translation file. The language tag is the leading
    /// dot-separated component of the file name: `en.json` and
    /// `en.all.json` both load into `en`.
    pub(crate) fn load_file(&mut self, path: &Path) -> Result<(), Error> {
        let tag = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.split('.').next())
            .unwrap_or("");
        if tag.is_empty() {
            return Err(Error::Source {
                name: path.display().to_string(),
                reason: "file name does not start with a language tag".to_owned(),
            });
        }
        let bytes = fs::read(path).map_err(|e| Error::Source {
            name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        self.parse_bytes(tag, &bytes)
    }

    /// Parses one embedded translation source. Multiple sources for the
    /// same tag merge, later keys winning.
    pub(crate) fn parse_bytes(&mut self, tag: &str, bytes: &[u8]) -> Result<(), Error> {
        let normalized = normalize(tag);
        if normalized.is_empty() {
            return Err(Error::Source {
                name: tag.to_owned(),
                reason: "empty language tag".to_owned(),
            });
        }
        let tag = normalized;
        let phrases: HashMap<String, String> =
            serde_json::from_slice(bytes).map_err(|e| Error::Source {
                name: tag.clone(),
                reason: e.to_string(),
            })?;
        debug!(tag = %tag, phrases = phrases.len(), "parsed translation source");
        match self.languages.get_mut(&tag) {
            Some(existing) => Arc::make_mut(existing).extend(phrases),
            None => {
                self.languages.insert(tag, Arc::new(phrases));
            }
        }
        Ok(())
    }

    /// The loaded language tags, unordered.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Whether `tag` would resolve to some phrase table.
    pub fn contains(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    /// Binds a translator for one request.
    ///
    /// Precedence: `requested` first, then `header_fallback` parsed as an
    /// `Accept-Language` list, then `default`. Total — with a validated
    /// default this always lands on a real phrase table, and even without
    /// one it degrades to a translator that echoes phrase keys.
    pub fn translator(&self, requested: &str, header_fallback: &str, default: &str) -> Translator {
        if let Some((tag, phrases)) = self.lookup(requested) {
            return Translator { tag, phrases };
        }
        for candidate in parse_accept_language(header_fallback) {
            if let Some((tag, phrases)) = self.lookup(&candidate) {
                return Translator { tag, phrases };
            }
        }
        let (tag, phrases) = self
            .lookup(default)
            .unwrap_or_else(|| (normalize(default), Arc::new(HashMap::new())));
        Translator { tag, phrases }
    }

    /// Exact tag, then its primary subtag (`fr-ca` → `fr`), then the first
    /// loaded tag sharing the primary subtag (`fr` → `fr-ca`), in sorted
    /// order so the pick is deterministic.
    fn lookup(&self, tag: &str) -> Option<(String, Phrases)> {
        let tag = normalize(tag);
        if tag.is_empty() {
            return None;
        }
        if let Some(phrases) = self.languages.get(&tag) {
            return Some((tag, Arc::clone(phrases)));
        }
        let primary = tag.split('-').next().unwrap_or(&tag);
        if let Some(phrases) = self.languages.get(primary) {
            return Some((primary.to_owned(), Arc::clone(phrases)));
        }
        let mut related: Vec<&String> = self
            .languages
            .keys()
            .filter(|k| k.split('-').next() == Some(primary))
            .collect();
        related.sort();
        related
            .first()
            .map(|k| ((*k).clone(), Arc::clone(&self.languages[*k])))
    }
}

// ── Translator ────────────────────────────────────────────────────────────────

/// A translate function bound to one resolved language.
///
/// Cheap to clone (the phrase table is shared, immutable) and never touches
/// catalog state. A key with no translation comes back verbatim, so a gap in
/// a catalog degrades visibly instead of erroring.
#[derive(Clone)]
pub struct Translator {
    tag: String,
    phrases: Phrases,
}

impl Translator {
    /// The catalog tag this translator was bound to.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Translates a phrase key.
    pub fn t(&self, key: &str) -> String {
        self.phrases.get(key).cloned().unwrap_or_else(|| key.to_owned())
    }

    /// Translates a phrase key, substituting `{name}` placeholders.
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut out = self.t(key);
        for (name, value) in args {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

// ── Tag handling ──────────────────────────────────────────────────────────────

fn normalize(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

/// Parses an `Accept-Language` value into tags ordered by descending
/// quality. Wildcards and malformed entries are dropped; ties keep header
/// order. Tolerates any input, including the empty string.
fn parse_accept_language(header: &str) -> Vec<String> {
    let mut entries: Vec<(String, f32)> = Vec::new();
    for item in header.split(',') {
        let mut parts = item.split(';');
        let tag = normalize(parts.next().unwrap_or(""));
        if tag.is_empty() || tag == "*" {
            continue;
        }
        let mut q = 1.0_f32;
        for param in parts {
            if let Some((name, value)) = param.split_once('=') {
                if name.trim().eq_ignore_ascii_case("q") {
                    q = value.trim().parse().unwrap_or(0.0);
                }
            }
        }
        if q > 0.0 {
            entries.push((tag, q));
        }
    }
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries.into_iter().map(|(tag, _)| tag).collect()
}
