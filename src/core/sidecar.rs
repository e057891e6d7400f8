//! Sidecar document codec.
//!
//! The sidecar is an ordered key/value YAML document living next to the
//! front-end file: single-quoted keys, `|2` block literals, two-space
//! indented content. Placeholder delimiters inside stored fragments are
//! escaped (`{{` -> `\{\{`) so the document can coexist with placeholder
//! syntax. Encoding appends formatted entries to a text buffer; decoding
//! goes through serde_yaml into an insertion-ordered map.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::core::error::WeftError;

/// Optional per-file backend directory override key.
pub const DIR_KEY: &str = "src_dir";

/// Optional per-file backend extension override key.
pub const EXT_KEY: &str = "src_ext";

/// Characters escaped inside quoted keys so keys stay pattern-safe for
/// downstream lookups by content.
const KEY_RESERVED: &[char] = &['(', ')', '*', '?', '[', ']', '^', '|'];

/// An in-progress sidecar document, built by appending formatted entries.
#[derive(Debug, Clone, Default)]
pub struct SidecarDoc {
    text: String,
}

impl SidecarDoc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Append a `'key': |2` block entry holding `raw` with placeholder
    /// delimiters escaped and every line indented by two spaces.
    pub fn push(&mut self, key: &str, raw: &str) {
        self.text.push_str(&quote_key(key));
        self.text.push_str(": |2\n");

        for line in escape_braces(raw).split('\n') {
            self.text.push_str("  ");
            self.text.push_str(line);
            self.text.push('\n');
        }
    }

    /// Append only if the formatted key is not already present in the
    /// document. Returns whether the entry was appended.
    pub fn push_unique(&mut self, key: &str, raw: &str) -> bool {
        let mut needle = quote_key(key);
        needle.push(':');

        if self.text.contains(&needle) {
            return false;
        }

        self.push(key, raw);
        true
    }
}

/// Single-quote a key, doubling embedded quotes and backslash-escaping
/// pattern-significant characters.
pub fn quote_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    out.push('\'');

    for ch in key.chars() {
        if KEY_RESERVED.contains(&ch) {
            out.push('\\');
        }
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }

    out.push('\'');
    out
}

/// Undo the reserved-character escaping applied by [`quote_key`]. The
/// surrounding quotes and doubled quotes are already undone by the YAML
/// parser.
pub fn unescape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.peek() {
                if KEY_RESERVED.contains(next) {
                    continue;
                }
            }
        }
        out.push(ch);
    }

    out
}

/// Escape placeholder delimiters so a fragment can be stored as a block
/// literal without reading as placeholder syntax.
pub fn escape_braces(s: &str) -> String {
    s.replace("{{", r"\{\{").replace("}}", r"\}\}")
}

/// Inverse of [`escape_braces`].
pub fn unescape_braces(s: &str) -> String {
    s.replace(r"\{\{", "{{").replace(r"\}\}", "}}")
}

/// Decode a sidecar document into an ordered key -> value map.
///
/// Block scalars clip to a single trailing newline that is not part of
/// the stored fragment (fragments always end at a closing delimiter), so
/// one trailing newline is trimmed from every value.
pub fn parse(text: &str) -> Result<IndexMap<String, String>> {
    if text.trim().is_empty() {
        return Ok(IndexMap::new());
    }

    let mut map: IndexMap<String, String> =
        serde_yaml::from_str(text).context("sidecar document is not valid YAML")?;

    for value in map.values_mut() {
        if value.ends_with('\n') {
            value.pop();
        }
    }

    Ok(map)
}

/// Read and decode the sidecar at `path`; an absent file decodes as an
/// empty document. Read or parse failures abort the current file.
pub fn load(path: &Path) -> std::result::Result<IndexMap<String, String>, WeftError> {
    if !path.exists() {
        return Ok(IndexMap::new());
    }

    let text = std::fs::read_to_string(path).map_err(|e| WeftError::Sidecar {
        path: path.to_path_buf(),
        source: anyhow::Error::new(e),
    })?;

    parse(&text).map_err(|e| WeftError::Sidecar { path: path.to_path_buf(), source: e })
}
