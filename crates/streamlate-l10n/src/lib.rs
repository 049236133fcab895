//! # streamlate-l10n
//!
//! Localized message catalog with per-style template resolution and the
//! gender-select template mini-language.
//!
//! Resolution order for a `(language, style, key)` request:
//! `{key}_{style}` → `{key}_normal` → `{key}`, first in the requested
//! language, then identically in "en". A key that resolves nowhere
//! renders as a visible `[missing template: …]` placeholder — lookups
//! never fail.

pub mod ast;
pub mod parser;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use streamlate_core::error::StreamlateError;
use streamlate_core::message::Gender;

use ast::Node;

/// Arguments for template rendering.
///
/// The mentioned user is an explicit, named field rather than a
/// positional convention: `{0}` always renders the mention, `{1}`
/// onwards render `rest`.
#[derive(Debug, Clone, Default)]
pub struct MessageArgs {
    pub mention: String,
    pub rest: Vec<String>,
}

impl MessageArgs {
    pub fn new(mention: impl Into<String>) -> Self {
        Self {
            mention: mention.into(),
            rest: Vec::new(),
        }
    }

    pub fn with(mention: impl Into<String>, rest: &[&str]) -> Self {
        Self {
            mention: mention.into(),
            rest: rest.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn get(&self, index: usize) -> Option<&str> {
        if index == 0 {
            Some(&self.mention)
        } else {
            self.rest.get(index - 1).map(String::as_str)
        }
    }

    fn len(&self) -> usize {
        1 + self.rest.len()
    }
}

/// Language code → message key → template string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    languages: HashMap<String, HashMap<String, String>>,
}

impl TemplateCatalog {
    /// Catalog bundled with the binary, seeded into the store on first run.
    pub fn embedded_defaults() -> Result<Self, StreamlateError> {
        let mut languages = HashMap::new();
        for (lang, raw) in [
            ("en", include_str!("../assets/en.json")),
            ("es", include_str!("../assets/es.json")),
            ("pt", include_str!("../assets/pt.json")),
        ] {
            let templates: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| StreamlateError::Config(format!("bundled catalog {lang}: {e}")))?;
            languages.insert(lang.to_string(), templates);
        }
        Ok(Self { languages })
    }

    /// Raw template for an exact key in an exact language.
    pub fn get(&self, lang: &str, key: &str) -> Option<&str> {
        self.languages
            .get(lang)
            .and_then(|t| t.get(key))
            .map(String::as_str)
    }

    /// Resolve a base key through the style and language fallback chain.
    pub fn resolve(&self, lang: &str, style: &str, key: &str) -> Option<&str> {
        let styled = format!("{key}_{style}");
        let normal = format!("{key}_normal");
        for language in [lang, "en"] {
            for candidate in [styled.as_str(), normal.as_str(), key] {
                if let Some(t) = self.get(language, candidate) {
                    return Some(t);
                }
            }
        }
        None
    }

    /// Resolve and render a message; missing keys produce a visible
    /// placeholder instead of an error.
    pub fn localize(
        &self,
        lang: &str,
        style: &str,
        key: &str,
        gender: Gender,
        args: &MessageArgs,
    ) -> String {
        match self.resolve(lang, style, key) {
            Some(template) => render(template, gender, args),
            None => format!("[missing template: {key}]"),
        }
    }
}

/// Render a template: substitute the select block for `gender`, then
/// apply positional substitution.
///
/// Malformed positional syntax or an argument-count mismatch returns the
/// select-substituted text with positional substitution skipped, so one
/// bad template never takes the whole command down.
pub fn render(template: &str, gender: Gender, args: &MessageArgs) -> String {
    let mut selected = String::new();
    for node in parser::parse(template) {
        match node {
            Node::Literal(text) => selected.push_str(&text),
            Node::Select(block) => {
                if let Some(body) = block.branch(gender.select_key()) {
                    selected.push_str(body);
                }
            }
        }
    }

    match substitute_positional(&selected, args) {
        Some(done) => done,
        None => selected,
    }
}

/// Substitute `{0}`, `{1}`, … against `args`.
/// Returns `None` when the text is malformed or references an argument
/// that was not supplied.
fn substitute_positional(text: &str, args: &MessageArgs) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '{' {
            let close = chars[i + 1..].iter().position(|&c| c == '}')?;
            let inner: String = chars[i + 1..i + 1 + close].iter().collect();
            if inner.is_empty() || !inner.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let index: usize = inner.parse().ok()?;
            if index >= args.len() {
                return None;
            }
            out.push_str(args.get(index)?);
            i += close + 2;
        } else if chars[i] == '}' {
            return None;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    Some(out)
}
