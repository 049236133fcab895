//! Translation orchestrator: blocklists → quota pre-check → segmentation
//! → language detection → tier and target resolution → committing quota
//! check → per-segment translation → reply assembly.

use super::quota::{QuotaDecision, QuotaReason, QuotaTracker};
use super::segment::{self, ParsedCommand};
use super::{prompt, respond, Gateway};
use streamlate_core::config::{ModelTier, RuntimeConfig};
use streamlate_core::error::StreamlateError;
use streamlate_core::keywords;
use streamlate_core::message::{ChatCommand, Gender};
use streamlate_core::profile::UserProfile;
use streamlate_l10n::{MessageArgs, TemplateCatalog};
use tracing::{info, warn};

impl Gateway {
    /// Run the full translation pipeline for one command invocation.
    /// Returns the reply text, or `None` for a silent no-op.
    pub(crate) async fn run_translation(
        &self,
        cmd: &ChatCommand,
        body: &str,
        force_strong: bool,
    ) -> Result<Option<String>, StreamlateError> {
        let cfg = self.store.load_runtime().await?;
        let catalog = self.store.load_templates().await?;

        // Blocked users are ignored outright.
        if cfg.user_blocklist.contains_key(&cmd.sender_id) {
            info!("ignoring command from blocked user {}", cmd.sender_id);
            return Ok(None);
        }

        let profile = self
            .store
            .ensure_profile(&cmd.sender_id, &cmd.sender_name, &cfg.persona)
            .await?;
        let mention = format!("@{}", profile.username);
        let gender = profile
            .pronouns
            .as_deref()
            .map(|p| keywords::classify_pronoun(&cfg.pronouns, p))
            .unwrap_or(Gender::Neutral);
        let quota = QuotaTracker::new(self.store.clone(), &cfg);

        // Cheap pre-check before any backend work.
        let pre = quota
            .check_and_reserve(&cfg, ModelTier::Fast, 1, false)
            .await?;
        if !pre.allowed {
            info!(
                "quota pre-check rejected: sender={} day={} minute={}",
                cmd.sender_id, pre.day_total, pre.minute_total
            );
            return Ok(Some(quota_message(
                &catalog,
                &profile,
                &profile.style,
                gender,
                &mention,
                &pre,
            )));
        }

        if body.trim().is_empty() {
            return Ok(Some(say(
                &catalog,
                &profile,
                &profile.style,
                gender,
                &mention,
                "helpTranslate",
                &[],
            )));
        }

        // Blocked-word scan: case-insensitive substring.
        let lowered = body.to_lowercase();
        if cfg.word_blocklist.iter().any(|w| lowered.contains(w)) {
            return Ok(Some(say(
                &catalog,
                &profile,
                &profile.style,
                gender,
                &mention,
                "blocked",
                &[],
            )));
        }

        let parsed = segment::segment_command(body, force_strong, &profile, &cfg);
        let reply_style = parsed
            .style_prefix
            .clone()
            .unwrap_or_else(|| profile.style.clone());

        // A command with no translatable segments is echoed, not errored.
        if parsed.segments.is_empty() {
            return Ok(Some(respond::restore_escapes(body.trim())));
        }

        // Language detection.
        let joined = parsed
            .segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let detected = match self
            .provider
            .complete(&cfg.models.fast.model, &prompt::detection_prompt(&joined))
            .await
        {
            Ok(reply) if !reply.trim().is_empty() => prompt::sanitize_detection(&reply),
            Ok(_) => {
                warn!("detection returned empty reply for '{joined}'");
                return Ok(Some(say(
                    &catalog,
                    &profile,
                    &reply_style,
                    gender,
                    &mention,
                    "apiError",
                    &[],
                )));
            }
            Err(e) => {
                warn!("detection call failed: {e}");
                return Ok(Some(say(
                    &catalog,
                    &profile,
                    &reply_style,
                    gender,
                    &mention,
                    "apiError",
                    &[],
                )));
            }
        };

        let tier = decide_tier(&parsed, &detected);
        let target = resolve_target(&parsed, &profile, &cfg, &detected);
        info!(
            "pipeline: sender={} detected={detected} target={target} tier={}",
            cmd.sender_id,
            tier.as_str()
        );

        // Nothing to do when the text is already in the target language.
        if detected == target && parsed.style_prefix.is_none() {
            return Ok(Some(say(
                &catalog,
                &profile,
                &reply_style,
                gender,
                &mention,
                "alreadyTranslated",
                &[],
            )));
        }

        // Committing quota check right before the costly calls.
        let reserved = quota
            .check_and_reserve(&cfg, tier, parsed.segments.len() as i64, true)
            .await?;
        if !reserved.allowed {
            info!(
                "quota commit rejected: sender={} day={} minute={}",
                cmd.sender_id, reserved.day_total, reserved.minute_total
            );
            return Ok(Some(quota_message(
                &catalog,
                &profile,
                &reply_style,
                gender,
                &mention,
                &reserved,
            )));
        }

        // Translate segments one at a time, in order; the first failure
        // aborts the rest.
        let model = &cfg.models.tier(tier).model;
        let mut outputs = Vec::with_capacity(parsed.segments.len());
        for seg in &parsed.segments {
            let seg_prompt = prompt::segment_prompt(
                seg,
                &detected,
                &target,
                parsed.style_prefix.as_deref(),
                &cfg,
            );
            let translated = match self.provider.complete(model, &seg_prompt).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(
                        "translation call failed: sender={} detected={detected} \
                         target={target} tier={} err={e}",
                        cmd.sender_id,
                        tier.as_str()
                    );
                    return Ok(Some(say(
                        &catalog,
                        &profile,
                        &reply_style,
                        gender,
                        &mention,
                        "apiError",
                        &[],
                    )));
                }
            };
            let translated = translated.trim().to_string();
            if translated.is_empty() {
                warn!(
                    "translation returned empty: sender={} detected={detected} target={target}",
                    cmd.sender_id
                );
                return Ok(Some(say(
                    &catalog,
                    &profile,
                    &reply_style,
                    gender,
                    &mention,
                    "apiError",
                    &[],
                )));
            }
            if translated == prompt::UNDEF_SENTINEL {
                return Ok(Some(say(
                    &catalog,
                    &profile,
                    &reply_style,
                    gender,
                    &mention,
                    "untranslatable",
                    &[],
                )));
            }
            outputs.push(respond::strip_placeholder_tokens(&translated));
        }

        let reply = respond::assemble_reply(
            &catalog,
            &cfg,
            &profile,
            &reply_style,
            &mention,
            &target,
            gender,
            &outputs,
        );
        Ok(Some(reply))
    }
}

/// Pick the model tier: forced flags win, then "und"/complex content
/// escalates, otherwise the cheap tier.
pub(crate) fn decide_tier(parsed: &ParsedCommand, detected: &str) -> ModelTier {
    if parsed.force_strong {
        return ModelTier::Strong;
    }
    if parsed.force_fast {
        return ModelTier::Fast;
    }
    let complex = parsed.explicit_tone
        || parsed.style_prefix.is_some()
        || parsed.segments.iter().any(|s| s.is_complex());
    if detected == prompt::UNKNOWN_LANG || complex {
        ModelTier::Strong
    } else {
        ModelTier::Fast
    }
}

/// Resolve the target language, in order: explicit prefix, anti-ping-pong
/// swap, profile target, then the default auto-translate pair.
pub(crate) fn resolve_target(
    parsed: &ParsedCommand,
    profile: &UserProfile,
    cfg: &RuntimeConfig,
    detected: &str,
) -> String {
    if let Some(code) = &parsed.lang_prefix {
        return code.clone();
    }
    if profile.has_custom_target() {
        // Anti-ping-pong: input already in the user's target flips back
        // to their speaking language.
        if detected == profile.target_lang {
            return profile.speaking_lang.clone();
        }
        return profile.target_lang.clone();
    }
    if detected == cfg.default_source {
        cfg.default_target.clone()
    } else {
        cfg.default_source.clone()
    }
}

fn say(
    catalog: &TemplateCatalog,
    profile: &UserProfile,
    style: &str,
    gender: Gender,
    mention: &str,
    key: &str,
    rest: &[&str],
) -> String {
    catalog.localize(
        &profile.speaking_lang,
        style,
        key,
        gender,
        &MessageArgs::with(mention, rest),
    )
}

fn quota_message(
    catalog: &TemplateCatalog,
    profile: &UserProfile,
    style: &str,
    gender: Gender,
    mention: &str,
    decision: &QuotaDecision,
) -> String {
    let key = match decision.reason {
        Some(QuotaReason::DailyLimit) => "dailyLimit",
        _ => "rateLimit",
    };
    say(catalog, profile, style, gender, mention, key, &[])
}
