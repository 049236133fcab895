//! Reply assembly: localized header, quote wrapping, escape
//! restoration, placeholder cleanup, and chunked delivery.

use std::time::Duration;
use streamlate_core::config::RuntimeConfig;
use streamlate_core::error::StreamlateError;
use streamlate_core::message::Gender;
use streamlate_core::profile::UserProfile;
use streamlate_core::traits::Channel;
use streamlate_l10n::{MessageArgs, TemplateCatalog};

use super::segment::{ESC_AMP, ESC_PERCENT, ESC_STAR};
use streamlate_channels::utils::split_chunks;

/// Pause between consecutive chunks of one reply.
const CHUNK_DELAY: Duration = Duration::from_millis(350);

/// Fallback quote pair when no catalog supplies one.
const FALLBACK_QUOTES: (&str, &str) = ("\u{201c}", "\u{201d}");

/// Wrap translated segments in the localized header and quote pair.
pub fn assemble_reply(
    catalog: &TemplateCatalog,
    cfg: &RuntimeConfig,
    profile: &UserProfile,
    style: &str,
    mention: &str,
    target_code: &str,
    gender: Gender,
    pieces: &[String],
) -> String {
    let display = cfg.display_name(&profile.speaking_lang, target_code);
    let header = catalog.localize(
        &profile.speaking_lang,
        style,
        "translationHeader",
        gender,
        &MessageArgs::with(mention, &[&display]),
    );
    let open = catalog
        .resolve(&profile.speaking_lang, style, "quoteOpen")
        .unwrap_or(FALLBACK_QUOTES.0);
    let close = catalog
        .resolve(&profile.speaking_lang, style, "quoteClose")
        .unwrap_or(FALLBACK_QUOTES.1);

    let body = pieces.join(" ");
    restore_escapes(&format!("{header} {open}{body}{close}"))
}

/// Restore escaped-delimiter sentinels to their literal characters.
pub fn restore_escapes(text: &str) -> String {
    text.replace(ESC_STAR, "*")
        .replace(ESC_PERCENT, "%")
        .replace(ESC_AMP, "&")
}

/// Strip any `[Pn]` placeholder tokens the backend left behind and
/// collapse the whitespace around them.
pub fn strip_placeholder_tokens(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("[P") {
        let after = &rest[open + 2..];
        match after.find(']') {
            Some(close) if after[..close].chars().all(|c| c.is_ascii_digit()) && close > 0 => {
                out.push_str(&rest[..open]);
                rest = &after[close + 1..];
            }
            _ => {
                out.push_str(&rest[..open + 2]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Send a reply through a channel, splitting to the platform limit with
/// a short pause between chunks.
pub async fn send_chunked(channel: &dyn Channel, text: &str) -> Result<(), StreamlateError> {
    for (i, chunk) in split_chunks(text, channel.max_message_len()).iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(CHUNK_DELAY).await;
        }
        channel.send(chunk).await?;
    }
    Ok(())
}
