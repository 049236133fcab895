//! Prompt construction for the detection and per-segment translation calls.

use streamlate_core::config::RuntimeConfig;
use streamlate_core::message::TextSegment;

use super::segment::NEUTRAL_TONE;

/// Backend sentinel meaning "this text is not translatable language".
pub(crate) const UNDEF_SENTINEL: &str = "UNDEF";

/// Detection sentinel for an undetermined language.
pub(crate) const UNKNOWN_LANG: &str = "und";

/// Prompt asking the backend for an ISO 639-1 code only.
pub fn detection_prompt(text: &str) -> String {
    format!(
        "Identify the language of the following text. Respond with only the \
         ISO 639-1 two-letter code, or \"und\" if the language cannot be \
         determined.\n\nText: {text}"
    )
}

/// Sanitize a detection reply to a 2-3 letter lowercase code, forcing
/// "und" for anything malformed.
pub fn sanitize_detection(reply: &str) -> String {
    let code: String = reply
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if (2..=3).contains(&code.len()) {
        code
    } else {
        UNKNOWN_LANG.to_string()
    }
}

/// Build the translation prompt for one segment.
pub fn segment_prompt(
    segment: &TextSegment,
    detected: &str,
    target_code: &str,
    style_override: Option<&str>,
    cfg: &RuntimeConfig,
) -> String {
    let target = cfg.display_name("en", target_code);

    let mut prompt = if detected == UNKNOWN_LANG {
        format!(
            "Determine whether the following text is a real language or \
             gibberish. If it is gibberish, respond with exactly {UNDEF_SENTINEL}. \
             Otherwise translate it into {target}."
        )
    } else {
        format!("Translate the following text into {target}.")
    };
    prompt.push_str(
        " Produce a single grammatically complete rendering and output only the translation.",
    );

    if !segment.placeholders.is_empty() {
        let listed = segment
            .placeholders
            .iter()
            .map(|(token, gender)| format!("{token} = {} pronoun", gender.describe()))
            .collect::<Vec<_>>()
            .join(", ");
        prompt.push_str(&format!(
            " The text contains pronoun placeholders ({listed}). Keep each \
             placeholder token exactly as written in your output and apply the \
             indicated grammatical gender around it."
        ));
    } else if let Some(gender) = segment.speaker_pronoun {
        prompt.push_str(&format!(
            " The speaker uses {} pronouns; gender any first-person references accordingly.",
            gender.describe()
        ));
        if let Some(hint) = cfg
            .grammar_hints
            .get(target_code)
            .and_then(|hints| hints.get(gender.canonical()))
        {
            prompt.push(' ');
            prompt.push_str(hint);
        }
    } else {
        prompt.push_str(" Use gender-neutral phrasing.");
    }

    if !segment.proper_nouns.is_empty() {
        prompt.push_str(&format!(
            " Do not translate these proper nouns; keep them exactly as \
             written: {}.",
            segment.proper_nouns.join(", ")
        ));
    }

    if segment.tone != NEUTRAL_TONE {
        prompt.push_str(&format!(" Write the translation in a {} tone.", segment.tone));
    }

    if let Some(style) = style_override {
        if style != "normal" {
            prompt.push_str(&format!(" Render the translation in {style} style."));
        }
    }

    prompt.push_str("\n\nText: ");
    prompt.push_str(&segment.text);
    prompt
}
