//! Delimiter table: supported backend engines and their ordered scan passes.
//!
//! Each engine is a closed enum variant carrying its delimiter pairs as
//! data, so there is no string-keyed lookup that can miss at runtime.
//! Multi-pass engines (JSP) list auxiliary pairs before the generic pair;
//! the scanner runs them in order against progressively substituted text,
//! so spans consumed by an earlier pass are invisible to later ones.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Backend template engines supported by the extractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Embedded Ruby (`<% ... %>`)
    Erb,
    /// JavaServer Pages (`<% ... %>` plus comment and taglib passes)
    Jsp,
    /// Handlebars used server-side (`{{ ... }}`)
    Hbs,
    /// PHP (`<? ... ?>`)
    Php,
    /// Twig statements (`{% ... %}`)
    Twig,
}

/// One scan pass over a template body.
///
/// `start` and `end` are regex fragments, not literal strings. `guard` is
/// a fixed-width literal that must not immediately precede a match; a
/// guarded span is consumed without being reported.
#[derive(Clone, Copy, Debug)]
pub struct Pass {
    /// Opening delimiter pattern
    pub start: &'static str,

    /// Closing delimiter pattern
    pub end: &'static str,

    /// Stem for generated keys: `stem`, `stem_1`, `stem_2`, ...
    pub stem: &'static str,

    /// Literal that suppresses a match when it directly precedes it
    pub guard: Option<&'static str>,
}

const ERB_PASSES: &[Pass] = &[Pass { start: "<%", end: "%>", stem: "erb", guard: None }];

// Comments and taglib directives are consumed first so the generic
// scriptlet pair cannot re-match their interiors.
const JSP_PASSES: &[Pass] = &[
    Pass { start: "<%--", end: "--%>", stem: "jcomment", guard: None },
    Pass { start: "<%@", end: "%>", stem: "jstl", guard: None },
    Pass { start: "<%", end: "%>", stem: "jsp", guard: None },
];

// The guard keeps comment-wrapped front-end directives (`<!--{{{...}}}-->`)
// out of the brace scan; the literal pass unwraps them afterwards.
const HBS_PASSES: &[Pass] =
    &[Pass { start: r"\{\{", end: r"\}\}", stem: "hbs", guard: Some("<!--") }];

const PHP_PASSES: &[Pass] = &[Pass { start: r"<\?", end: r"\?>", stem: "php", guard: None }];

const TWIG_PASSES: &[Pass] = &[Pass { start: r"\{%", end: r"%\}", stem: "twig", guard: None }];

impl EngineKind {
    /// Ordered scan passes for this engine.
    pub fn passes(self) -> &'static [Pass] {
        match self {
            EngineKind::Erb => ERB_PASSES,
            EngineKind::Jsp => JSP_PASSES,
            EngineKind::Hbs => HBS_PASSES,
            EngineKind::Php => PHP_PASSES,
            EngineKind::Twig => TWIG_PASSES,
        }
    }

    /// Lowercase engine name as used in config files and log lines.
    pub fn name(self) -> &'static str {
        match self {
            EngineKind::Erb => "erb",
            EngineKind::Jsp => "jsp",
            EngineKind::Hbs => "hbs",
            EngineKind::Php => "php",
            EngineKind::Twig => "twig",
        }
    }
}
