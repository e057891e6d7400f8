//! Regex-driven fragment scanner.
//!
//! Locates delimiter-bounded spans in a template body, left to right and
//! non-overlapping. Matching is non-greedy across newlines: the end
//! boundary is the nearest subsequent occurrence of the end pattern.

use anyhow::{Context, Result};
use regex::Regex;

use crate::core::engine::Pass;

/// A fragment located by a scan pass, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    /// The matched substring
    pub text: String,

    /// Byte offset of the match start in the scanned text
    pub offset: usize,
}

/// Find all non-overlapping fragments for `pass`, in encounter order.
///
/// When the pass carries a guard, a match whose immediately preceding
/// bytes equal the guard string is consumed without being reported, so
/// its interior cannot seed an overlapping partial match. A match too
/// close to the start of the text for the guard to fit is always
/// reported.
pub fn scan(text: &str, pass: &Pass) -> Result<Vec<Found>> {
    let re = Regex::new(&format!("(?s){}.*?{}", pass.start, pass.end))
        .with_context(|| format!("invalid delimiter pair for `{}`", pass.stem))?;

    let mut out = Vec::new();
    let mut at = 0;

    while let Some(m) = re.find_at(text, at) {
        at = m.end();

        if let Some(guard) = pass.guard {
            if m.start() >= guard.len() && text[..m.start()].ends_with(guard) {
                continue;
            }
        }

        out.push(Found { text: m.as_str().to_string(), offset: m.start() });
    }

    Ok(out)
}
