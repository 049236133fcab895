//! Settings command handlers: help, preference updates, and clearing.

use super::CommandContext;
use streamlate_core::error::StreamlateError;
use streamlate_core::keywords;

/// Handle the help command — link to the full guide.
pub(super) fn handle_help(ctx: &CommandContext<'_>) -> String {
    match ctx.cfg.help_url.as_deref() {
        Some(url) => ctx.say("helpGuide", &[url]),
        None => ctx.say("helpLinkNotFound", &[]),
    }
}

/// Handle the clear command — reset preferences to the persona default.
pub(super) async fn handle_clear(ctx: &mut CommandContext<'_>) -> Result<String, StreamlateError> {
    if ctx.profile.clear_preferences(&ctx.cfg.persona) {
        ctx.store.save_profile(&ctx.profile).await?;
        ctx.gender = streamlate_core::message::Gender::Neutral;
        Ok(ctx.say("clearConfirm", &[]))
    } else {
        Ok(ctx.say("clearNone", &[]))
    }
}

/// Which profile field a confirmed pair touched, for reply assembly.
enum Applied {
    Target(String),
    Speaking(String),
    Style(String),
    Pronouns(String),
}

/// Handle the settings command: parse `key:value` pairs, infer the
/// language they were typed in when they don't validate as-is, apply
/// each valid pair, and report each invalid token without aborting the
/// rest.
pub(super) async fn handle_set(
    ctx: &mut CommandContext<'_>,
    body: &str,
) -> Result<String, StreamlateError> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut loose: Vec<String> = Vec::new();
    for token in body.split_whitespace() {
        match token.split_once(':') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                pairs.push((key.to_lowercase(), value.to_string()));
            }
            _ => loose.push(token.to_string()),
        }
    }

    if pairs.is_empty() {
        return Ok(ctx.say("helpTranslate", &[]));
    }

    // The command may have been typed in another configured language.
    let speaking = ctx.profile.speaking_lang.clone();
    let all_valid = pairs
        .iter()
        .all(|(k, v)| keywords::validate_pair(ctx.cfg, &speaking, k, v, false));
    let lang = if all_valid {
        speaking
    } else {
        keywords::infer_language(ctx.cfg, &speaking, &pairs).unwrap_or(speaking)
    };

    let mut applied: Vec<Applied> = Vec::new();
    let mut failures: Vec<String> = Vec::new();

    for (key, value) in &pairs {
        match keywords::resolve(&ctx.cfg.command_keywords, &lang, key) {
            Some("target") => {
                let code = value.to_lowercase();
                if ctx.cfg.is_language(&code) {
                    ctx.profile.target_lang = code.clone();
                    applied.push(Applied::Target(code));
                } else {
                    failures.push(ctx.say("invalidCode", &[value]));
                }
            }
            Some("speaking") => {
                let code = value.to_lowercase();
                if ctx.cfg.is_language(&code) {
                    ctx.profile.speaking_lang = code.clone();
                    applied.push(Applied::Speaking(code));
                } else {
                    failures.push(ctx.say("invalidCode", &[value]));
                }
            }
            Some("style") => match keywords::resolve(&ctx.cfg.style_keywords, &lang, value) {
                Some(style) => {
                    ctx.profile.style = style.to_string();
                    applied.push(Applied::Style(style.to_string()));
                }
                None => failures.push(ctx.say("invalidSetting", &[value])),
            },
            Some("pronouns") => {
                ctx.profile.pronouns = Some(value.clone());
                ctx.gender = keywords::classify_pronoun(&ctx.cfg.pronouns, value);
                applied.push(Applied::Pronouns(value.clone()));
            }
            _ => failures.push(ctx.say("invalidSetting", &[key])),
        }
    }
    for token in &loose {
        failures.push(ctx.say("invalidSetting", &[token]));
    }

    if applied.is_empty() {
        return Ok(failures.join(" "));
    }

    ctx.store.save_profile(&ctx.profile).await?;

    // Render confirmations in the (possibly just-changed) speaking language.
    let parts: Vec<String> = applied
        .iter()
        .map(|change| match change {
            Applied::Target(code) => {
                let name = ctx.cfg.display_name(&ctx.profile.speaking_lang, code);
                ctx.say("confirmPartTarget", &[&name])
            }
            Applied::Speaking(code) => {
                let name = ctx.cfg.display_name(&ctx.profile.speaking_lang, code);
                ctx.say("confirmPartSpeaking", &[&name])
            }
            Applied::Style(style) => ctx.say("confirmPartStyle", &[style]),
            Applied::Pronouns(value) => ctx.say("confirmPartPronouns", &[value]),
        })
        .collect();

    let mut reply = ctx.say("settingsConfirm", &[&parts.join(", ")]);
    if !failures.is_empty() {
        reply.push(' ');
        reply.push_str(&failures.join(" "));
    }
    Ok(reply)
}
