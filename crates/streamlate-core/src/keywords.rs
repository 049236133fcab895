//! Cross-language keyword resolution, pronoun classification, and
//! language inference for `key:value` command arguments.
//!
//! All tables share one shape (language → lowercase keyword → canonical
//! token) and one lookup rule: try the requested language, then "en".

use crate::config::{KeywordTable, RuntimeConfig};
use crate::message::Gender;

/// Resolve `keyword` under `language`, falling back to "en".
/// Returns `None` for "no match" — callers treat that as data, not an error.
pub fn resolve<'a>(table: &'a KeywordTable, language: &str, keyword: &str) -> Option<&'a str> {
    let kw = keyword.to_lowercase();
    table
        .get(language)
        .and_then(|m| m.get(&kw))
        .or_else(|| table.get("en").and_then(|m| m.get(&kw)))
        .map(String::as_str)
}

/// Resolve without the "en" fallback. Used for inference scoring, where
/// the fallback would make every language tie on English input.
fn resolve_strict<'a>(table: &'a KeywordTable, language: &str, keyword: &str) -> Option<&'a str> {
    let kw = keyword.to_lowercase();
    table.get(language).and_then(|m| m.get(&kw)).map(String::as_str)
}

/// Classify a free-text pronoun phrase into a canonical gender.
///
/// Every keyword of the pronoun table, across every language, is tested
/// as a whole-word match against the phrase. Unmatched phrases are
/// neutral. Languages and keywords are scanned in sorted order so the
/// result is deterministic when a phrase mixes languages.
pub fn classify_pronoun(table: &KeywordTable, phrase: &str) -> Gender {
    let lowered = phrase.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut langs: Vec<&String> = table.keys().collect();
    langs.sort();
    for lang in langs {
        let mut keywords: Vec<(&String, &String)> = table[lang].iter().collect();
        keywords.sort();
        for (keyword, token) in keywords {
            if words.iter().any(|w| *w == keyword.as_str()) {
                if let Some(gender) = Gender::from_token(token) {
                    return gender;
                }
            }
        }
    }
    Gender::Neutral
}

/// Whether one `key:value` pair validates under `language`.
///
/// `strict` controls whether the "en" fallback applies: the caller's own
/// language is checked with the fallback (English keywords always work),
/// candidate scoring is checked without it.
pub fn validate_pair(
    cfg: &RuntimeConfig,
    language: &str,
    key: &str,
    value: &str,
    strict: bool,
) -> bool {
    let lookup = if strict { resolve_strict } else { resolve };
    let Some(setting) = lookup(&cfg.command_keywords, language, key) else {
        return false;
    };
    match setting {
        "target" | "speaking" => cfg.is_language(value),
        "style" => lookup(&cfg.style_keywords, language, value).is_some(),
        "pronouns" => !value.trim().is_empty(),
        _ => false,
    }
}

/// Infer the language a set of `key:value` arguments was typed in.
///
/// Called when the pairs do not all validate under `speaking`. Every
/// other configured language under which ALL pairs validate is a
/// candidate; a single candidate wins outright, ties go to the first
/// entry of the configured priority list, and no resolvable candidate
/// leaves the language unchanged (`None`).
pub fn infer_language(
    cfg: &RuntimeConfig,
    speaking: &str,
    pairs: &[(String, String)],
) -> Option<String> {
    if pairs.is_empty() {
        return None;
    }

    let mut candidates: Vec<String> = cfg
        .command_keywords
        .keys()
        .filter(|lang| lang.as_str() != speaking)
        .filter(|lang| {
            pairs
                .iter()
                .all(|(k, v)| validate_pair(cfg, lang, k, v, true))
        })
        .cloned()
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => None,
        1 => Some(candidates.remove(0)),
        _ => cfg
            .priority
            .iter()
            .find(|lang| candidates.contains(lang))
            .cloned(),
    }
}
