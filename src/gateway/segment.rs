//! Command segmenter: language/style prefix, tone and model tags,
//! protected proper nouns, and pronoun placeholders.

use streamlate_core::config::RuntimeConfig;
use streamlate_core::keywords;
use streamlate_core::message::{Gender, TextSegment};
use streamlate_core::profile::UserProfile;

/// Sentinels protecting escaped delimiter characters until reply assembly.
pub(crate) const ESC_STAR: char = '\u{e000}';
pub(crate) const ESC_PERCENT: char = '\u{e001}';
pub(crate) const ESC_AMP: char = '\u{e002}';

pub(crate) const NEUTRAL_TONE: &str = "neutral";

/// Everything the segmenter extracts from one command invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCommand {
    /// Explicit target language code from the leading prefix.
    pub lang_prefix: Option<String>,
    /// Style id from the combined `lang-style` prefix.
    pub style_prefix: Option<String>,
    /// Message-level tone; the last resolved tone tag wins.
    pub tone: String,
    pub explicit_tone: bool,
    pub force_strong: bool,
    pub force_fast: bool,
    pub segments: Vec<TextSegment>,
}

/// Parse the command body into a prefix, tags, and text segments.
/// Pure function: no network or storage side effects.
pub fn segment_command(
    body: &str,
    invocation_forces_strong: bool,
    profile: &UserProfile,
    cfg: &RuntimeConfig,
) -> ParsedCommand {
    let mut parsed = ParsedCommand {
        tone: NEUTRAL_TONE.to_string(),
        force_strong: invocation_forces_strong,
        ..Default::default()
    };

    let speaker_pronoun = profile
        .pronouns
        .as_deref()
        .map(|p| keywords::classify_pronoun(&cfg.pronouns, p));

    let body = body.trim();

    // A leading escape marker disables all prefix and tag parsing.
    if let Some(literal) = body.strip_prefix('\\') {
        let text = collapse_whitespace(literal);
        if !text.is_empty() {
            parsed.segments.push(TextSegment {
                text,
                tone: parsed.tone.clone(),
                proper_nouns: Vec::new(),
                placeholders: Vec::new(),
                speaker_pronoun,
            });
        }
        return parsed;
    }

    let body = protect_escapes(body);
    let rest = parse_prefix(&body, &profile.speaking_lang, cfg, &mut parsed);

    // Split on tone-tag delimiters into alternating literal/tag pieces,
    // collecting tags first so the final tone applies to every segment.
    let parts: Vec<&str> = rest.split('&').collect();
    let mut literals: Vec<String> = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let is_tag = i % 2 == 1 && i < parts.len() - 1;
        if is_tag {
            resolve_tag(part, profile, cfg, &mut parsed);
        } else if i % 2 == 1 {
            // Unterminated trailing tag marker: literal text after all.
            literals.push(format!("&{part}"));
        } else {
            literals.push(part.to_string());
        }
    }

    for literal in literals {
        if literal.trim().is_empty() {
            continue;
        }
        if let Some(segment) = build_segment(&literal, &parsed.tone, speaker_pronoun, cfg) {
            parsed.segments.push(segment);
        }
    }

    parsed
}

/// Consume the leading token if it is a language code or `lang-style` pair.
fn parse_prefix<'a>(
    body: &'a str,
    speaking: &str,
    cfg: &RuntimeConfig,
    parsed: &mut ParsedCommand,
) -> &'a str {
    let Some(token) = body.split_whitespace().next() else {
        return body;
    };
    let lowered = token.to_lowercase();

    if lowered.contains('-') {
        let mut lang = None;
        let mut style = None;
        for sub in lowered.split('-') {
            if lang.is_none() && cfg.is_language(sub) {
                lang = Some(sub.to_string());
            } else if style.is_none() {
                if let Some(s) = keywords::resolve(&cfg.style_keywords, speaking, sub) {
                    style = Some(s.to_string());
                }
            }
        }
        if lang.is_some() || style.is_some() {
            parsed.lang_prefix = lang;
            parsed.style_prefix = style;
            return consume_token(body, token);
        }
    } else if cfg.is_language(&lowered) {
        parsed.lang_prefix = Some(lowered);
        return consume_token(body, token);
    }

    body
}

fn consume_token<'a>(body: &'a str, token: &str) -> &'a str {
    body[token.len()..].trim_start()
}

/// Resolve one `&tag&` against the model-tag table, then the tone table.
fn resolve_tag(tag: &str, profile: &UserProfile, cfg: &RuntimeConfig, parsed: &mut ParsedCommand) {
    let tag = tag.trim();
    if tag.is_empty() {
        return;
    }
    if let Some(tier) = keywords::resolve(&cfg.model_tags, &profile.speaking_lang, tag) {
        match tier {
            "strong" => parsed.force_strong = true,
            "fast" => parsed.force_fast = true,
            _ => {}
        }
        return;
    }
    if let Some(tone) = keywords::resolve(&cfg.tone_tags, &profile.speaking_lang, tag) {
        parsed.tone = tone.to_string();
        parsed.explicit_tone = true;
    }
}

/// Build one segment from a literal piece: extract protected nouns and
/// pronoun placeholders, then collapse whitespace.
fn build_segment(
    literal: &str,
    tone: &str,
    speaker_pronoun: Option<Gender>,
    cfg: &RuntimeConfig,
) -> Option<TextSegment> {
    let mut proper_nouns = Vec::new();
    let with_nouns = replace_delimited(literal, '*', |inner| {
        if !inner.trim().is_empty() {
            proper_nouns.push(inner.trim().to_string());
        }
        inner.to_string()
    });

    let mut placeholders: Vec<(String, Gender)> = Vec::new();
    let with_placeholders = replace_delimited(&with_nouns, '%', |inner| {
        let token = format!("[P{}]", placeholders.len() + 1);
        placeholders.push((token.clone(), keywords::classify_pronoun(&cfg.pronouns, inner)));
        token
    });

    let text = collapse_whitespace(&with_placeholders);
    if text.is_empty() {
        return None;
    }

    Some(TextSegment {
        text,
        tone: tone.to_string(),
        proper_nouns,
        placeholders,
        speaker_pronoun,
    })
}

/// Replace every `<delim>inner<delim>` pair via `f`; an unpaired
/// trailing delimiter stays literal.
fn replace_delimited(text: &str, delim: char, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(delim) {
        let after = &rest[open + delim.len_utf8()..];
        match after.find(delim) {
            Some(close) => {
                out.push_str(&rest[..open]);
                out.push_str(&f(&after[..close]));
                rest = &after[close + delim.len_utf8()..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Protect `\*`, `\%`, `\&` as sentinel characters so the delimiters
/// survive parsing; the assembler restores them.
fn protect_escapes(text: &str) -> String {
    text.replace("\\*", &ESC_STAR.to_string())
        .replace("\\%", &ESC_PERCENT.to_string())
        .replace("\\&", &ESC_AMP.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
