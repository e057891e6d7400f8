//! Comment-wrapped literal handler.
//!
//! Front-end structural directives (sections, partials) ride through the
//! backend disguised as native HTML comments, e.g. `<!--{{# nav}}-->`,
//! so backend engines ignore them. On import each wrapper is unwrapped
//! in place back to live placeholder syntax, and the original commented
//! span is recorded in the sidecar keyed by the literal's trimmed inner
//! text. Keying by content makes repeated wrappers idempotent and lets
//! export re-wrap every occurrence.
//!
//! An HBS backend uses a triple-braced wrapper (`<!--{{{# nav}}}-->`) so
//! the wrapper itself cannot collide with the generic brace scan.

use crate::core::engine::EngineKind;

/// A literal recovered from a comment wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    /// Trimmed inner text; becomes the sidecar key (before quoting)
    pub key: String,

    /// The full original commented span, e.g. `<!--{{# nav}}-->`
    pub wrapped: String,
}

/// Unwrap all comment-wrapped literals in `text`, left to right.
///
/// Returns the rewritten text (each wrapper replaced by its bare
/// `{{inner}}` form) plus the literals in encounter order.
pub fn extract_literals(text: &str, engine: EngineKind) -> (String, Vec<Literal>) {
    let (open, close) = if engine == EngineKind::Hbs {
        ("<!--{{{", "}}}-->")
    } else {
        ("<!--{{", "}}-->")
    };

    let mut out = String::with_capacity(text.len());
    let mut found = Vec::new();
    let mut rest = text;

    while let Some(i) = rest.find(open) {
        let tail = &rest[i + open.len()..];

        let Some(j) = tail.find(close) else {
            // Unterminated wrapper; leave the remainder untouched
            break;
        };

        let inner = tail[..j].trim();

        out.push_str(&rest[..i]);
        out.push_str("{{");
        out.push_str(inner);
        out.push_str("}}");

        found.push(Literal {
            key: inner.to_string(),
            wrapped: rest[i..i + open.len() + j + close.len()].to_string(),
        });

        rest = &tail[j + close.len()..];
    }

    out.push_str(rest);
    (out, found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_section_directives() {
        let input = "<!--{{# nav}}--><li>x</li><!--{{/ nav}}-->";
        let (text, found) = extract_literals(input, EngineKind::Erb);

        assert_eq!(text, "{{# nav}}<li>x</li>{{/ nav}}");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].key, "# nav");
        assert_eq!(found[0].wrapped, "<!--{{# nav}}-->");
        assert_eq!(found[1].key, "/ nav");
    }

    #[test]
    fn trims_directive_whitespace_for_key_and_body() {
        let (text, found) = extract_literals("<!--{{ > header }}-->", EngineKind::Twig);

        assert_eq!(text, "{{> header}}");
        assert_eq!(found[0].key, "> header");
    }

    #[test]
    fn hbs_uses_triple_braced_wrapper() {
        let input = "<!--{{{# nav}}}-->{{ title }}";
        let (text, found) = extract_literals(input, EngineKind::Hbs);

        // Unwrapped to the live double-braced form
        assert_eq!(text, "{{# nav}}{{ title }}");
        assert_eq!(found[0].key, "# nav");
        assert_eq!(found[0].wrapped, "<!--{{{# nav}}}-->");
    }

    #[test]
    fn generic_wrapper_ignores_plain_comments() {
        let input = "<!-- plain comment --><!--{{> p}}-->";
        let (text, found) = extract_literals(input, EngineKind::Php);

        assert_eq!(text, "<!-- plain comment -->{{> p}}");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn unterminated_wrapper_is_left_alone() {
        let input = "<!--{{# nav}}";
        let (text, found) = extract_literals(input, EngineKind::Erb);

        assert_eq!(text, input);
        assert!(found.is_empty());
    }
}
