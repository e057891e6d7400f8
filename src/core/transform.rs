//! Pure text transforms for the import and export directions.
//!
//! No filesystem access here: import takes the raw backend text and an
//! in-progress sidecar document and returns the front-end text; export
//! takes the front-end text and a decoded sidecar map and returns the
//! reconstituted backend text. The orchestrators own all I/O.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::Regex;

use crate::core::engine::EngineKind;
use crate::core::literal::extract_literals;
use crate::core::scanner::{Found, scan};
use crate::core::sidecar::{self, SidecarDoc};

/// Triple-braced placeholder token for a sidecar key.
fn placeholder(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 6);
    out.push_str("{{{");
    out.push_str(key);
    out.push_str("}}}");
    out
}

/// Replace the scanned span of `frag` with the placeholder for `key`.
/// Anchoring at the recorded offset keeps a guard-suppressed span with
/// identical text from stealing the substitution.
pub fn substitute(text: &mut String, frag: &Found, key: &str) {
    text.replace_range(frag.offset..frag.offset + frag.text.len(), &placeholder(key));
}

/// Run all extraction passes for `engine` over a raw backend template.
///
/// Fragment entries are appended to `doc` in discovery order; the
/// comment-wrapped literal pass runs last, keyed by content with
/// duplicate suppression. Returns the front-end template text.
pub fn import_template(raw: &str, engine: EngineKind, doc: &mut SidecarDoc) -> Result<String> {
    let mut text = raw.to_string();

    // Engine passes in fixed order; later passes see earlier fragments
    // already replaced by placeholders and cannot re-match them.
    for pass in engine.passes() {
        let found = scan(&text, pass)?;

        let mut keyed = Vec::with_capacity(found.len());
        for (n, frag) in found.into_iter().enumerate() {
            let key = if n == 0 { pass.stem.to_string() } else { format!("{}_{n}", pass.stem) };

            doc.push(&key, &frag.text);
            keyed.push((key, frag));
        }

        // Splice right to left so earlier offsets stay valid
        for (key, frag) in keyed.iter().rev() {
            substitute(&mut text, frag, key);
        }
    }

    // Unwrap comment-disguised front-end directives so they come out as
    // live syntax instead of inert comments.
    let (text, literals) = extract_literals(&text, engine);

    for lit in &literals {
        doc.push_unique(&lit.key, &lit.wrapped);
    }

    Ok(text)
}

/// Splice stored fragments back into a front-end template.
///
/// Literal keys are handled first: their bare `{{inner}}` occurrences are
/// matched against the template as written, before generated splices can
/// introduce identical text. Generated keys then anchor at their
/// `{{{key}}}` placeholder (inner whitespace tolerated). Override keys
/// carry no template text and are skipped.
pub fn export_template(front: &str, doc: &IndexMap<String, String>) -> Result<String> {
    let mut text = front.to_string();
    let mut generated = Vec::new();

    for (key, value) in doc {
        if key == sidecar::DIR_KEY || key == sidecar::EXT_KEY {
            continue;
        }

        let raw = sidecar::unescape_braces(value);
        let bare_key = sidecar::unescape_key(key);

        let ph = Regex::new(&format!(r"\{{\{{\{{\s*{}\s*\}}\}}\}}", regex::escape(&bare_key)))
            .with_context(|| format!("cannot build placeholder pattern for `{bare_key}`"))?;

        if ph.is_match(&text) {
            generated.push((ph, raw));
            continue;
        }

        text = rewrap_literal(&text, &bare_key, &raw);
    }

    for (ph, raw) in &generated {
        if let Some(m) = ph.find(&text) {
            text.replace_range(m.range(), raw);
        }
    }

    Ok(text)
}

/// Re-wrap every bare occurrence of a literal directive into its stored
/// commented span. An occurrence sitting inside a `{{{key}}}` placeholder
/// (an extra brace on either side) is left alone.
fn rewrap_literal(text: &str, inner: &str, wrapped: &str) -> String {
    let bare = format!("{{{{{inner}}}}}");

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut hit = false;

    while let Some(i) = rest.find(&bare) {
        let end = i + bare.len();
        let in_placeholder = rest[..i].ends_with('{') || rest[end..].starts_with('}');

        out.push_str(&rest[..i]);
        out.push_str(if in_placeholder { bare.as_str() } else { wrapped });
        hit = hit || !in_placeholder;
        rest = &rest[end..];
    }
    out.push_str(rest);

    if !hit {
        tracing::warn!(key = %inner, "sidecar key has no anchor in front-end template");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(raw: &str, engine: EngineKind) -> Result<String> {
        let mut doc = SidecarDoc::new();
        let front = import_template(raw, engine, &mut doc)?;
        let map = sidecar::parse(doc.as_str())?;
        export_template(&front, &map)
    }

    #[test]
    fn substitute_anchors_at_the_scanned_offset() {
        let mut text = "<% a %> mid <% a %>".to_string();
        let frag = Found { text: "<% a %>".to_string(), offset: 12 };

        substitute(&mut text, &frag, "erb");

        assert_eq!(text, "<% a %> mid {{{erb}}}");
    }

    #[test]
    fn generic_keys_increment_in_discovery_order() -> Result<()> {
        let mut doc = SidecarDoc::new();
        let front = import_template("<% a %>-<% b %>-<% c %>", EngineKind::Erb, &mut doc)?;

        assert_eq!(front, "{{{erb}}}-{{{erb_1}}}-{{{erb_2}}}");

        let map = sidecar::parse(doc.as_str())?;
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["erb", "erb_1", "erb_2"]);
        assert_eq!(map["erb_1"], "<% b %>");
        Ok(())
    }

    #[test]
    fn jsp_multipass_produces_three_distinct_placeholders() -> Result<()> {
        let raw = "<%-- note --%>\n<%@ taglib uri=\"x\" %>\n<% out.print(1); %>";
        let mut doc = SidecarDoc::new();
        let front = import_template(raw, EngineKind::Jsp, &mut doc)?;

        assert_eq!(front, "{{{jcomment}}}\n{{{jstl}}}\n{{{jsp}}}");

        let map = sidecar::parse(doc.as_str())?;
        assert_eq!(map.len(), 3);
        assert_eq!(map["jcomment"], "<%-- note --%>");
        assert_eq!(map["jstl"], "<%@ taglib uri=\"x\" %>");
        assert_eq!(map["jsp"], "<% out.print(1); %>");
        Ok(())
    }

    #[test]
    fn comment_wrapped_sections_come_out_live() -> Result<()> {
        let raw = "<!--{{# nav}}--><li><% item %></li><!--{{/ nav}}-->";
        let mut doc = SidecarDoc::new();
        let front = import_template(raw, EngineKind::Erb, &mut doc)?;

        assert_eq!(front, "{{# nav}}<li>{{{erb}}}</li>{{/ nav}}");

        let map = sidecar::parse(doc.as_str())?;
        assert_eq!(map["# nav"], "<!--\\{\\{# nav\\}\\}-->");
        assert_eq!(map["/ nav"], "<!--\\{\\{/ nav\\}\\}-->");
        Ok(())
    }

    #[test]
    fn repeated_literal_yields_one_entry() -> Result<()> {
        let raw = "<!--{{> part}}-->mid<!--{{> part}}-->";
        let mut doc = SidecarDoc::new();
        let front = import_template(raw, EngineKind::Erb, &mut doc)?;

        assert_eq!(front, "{{> part}}mid{{> part}}");
        assert_eq!(doc.as_str().matches("'> part'").count(), 1);
        Ok(())
    }

    #[test]
    fn guard_skipped_twin_does_not_steal_the_substitution() -> Result<()> {
        // The commented span and the live fragment carry identical text;
        // the substitution must land on the live one.
        let raw = "<!--{{ x }}-->{{ x }}";
        let mut doc = SidecarDoc::new();
        let front = import_template(raw, EngineKind::Hbs, &mut doc)?;

        assert_eq!(front, "<!--{{ x }}-->{{{hbs}}}");

        let map = sidecar::parse(doc.as_str())?;
        assert_eq!(export_template(&front, &map)?, raw);
        Ok(())
    }

    #[test]
    fn roundtrip_erb() -> Result<()> {
        let raw = "<html><% render 'nav' %>\n<p><% user.name %></p></html>";
        assert_eq!(roundtrip(raw, EngineKind::Erb)?, raw);
        Ok(())
    }

    #[test]
    fn roundtrip_jsp_multipass() -> Result<()> {
        let raw = "<%-- c --%><%@ taglib %><% a %><% b %>";
        assert_eq!(roundtrip(raw, EngineKind::Jsp)?, raw);
        Ok(())
    }

    #[test]
    fn roundtrip_hbs_with_wrapped_directives() -> Result<()> {
        let raw = "<!--{{{# s}}}-->{{ title }}<!--{{{/ s}}}-->";
        assert_eq!(roundtrip(raw, EngineKind::Hbs)?, raw);
        Ok(())
    }

    #[test]
    fn roundtrip_live_and_wrapped_twin_directives() -> Result<()> {
        // The same directive text appears live (extracted as a generic
        // fragment) and comment-wrapped; the live copy must stay live.
        let raw = "{{# nav}}<!--{{{# nav}}}-->";
        assert_eq!(roundtrip(raw, EngineKind::Hbs)?, raw);
        Ok(())
    }

    #[test]
    fn roundtrip_twig_and_php() -> Result<()> {
        let twig = "{% for x in xs %}<i>{% endfor %}";
        assert_eq!(roundtrip(twig, EngineKind::Twig)?, twig);

        let php = "<?php echo $a; ?>\n<? print($b) ?>";
        assert_eq!(roundtrip(php, EngineKind::Php)?, php);
        Ok(())
    }

    #[test]
    fn roundtrip_repeated_literal_rewraps_all_occurrences() -> Result<()> {
        let raw = "<!--{{> p}}-->x<!--{{> p}}-->";
        assert_eq!(roundtrip(raw, EngineKind::Erb)?, raw);
        Ok(())
    }

    #[test]
    fn export_tolerates_spaced_placeholders() -> Result<()> {
        let mut map = IndexMap::new();
        map.insert("erb".to_string(), "<% x %>".to_string());

        assert_eq!(export_template("a {{{ erb }}} b", &map)?, "a <% x %> b");
        Ok(())
    }
}
