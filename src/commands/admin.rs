//! Moderator command handlers: user and word blocklist toggles.
//!
//! These are thin set-membership toggles; all the interesting work is
//! the idempotent outcome reporting and the username → id resolution,
//! which tries the local reverse index before the platform directory.

use super::CommandContext;
use streamlate_core::error::StreamlateError;
use streamlate_store::ToggleOutcome;

/// Resolve a typed username to (id, display name).
async fn resolve_user(
    ctx: &CommandContext<'_>,
    name: &str,
) -> Result<Option<(String, String)>, StreamlateError> {
    if let Some(profile) = ctx.store.find_profile_by_name(name).await? {
        return Ok(Some((profile.user_id, profile.username)));
    }
    if let Some(directory) = ctx.directory {
        if let Some(user) = directory.lookup(&name.to_lowercase()).await? {
            return Ok(Some((user.id, user.display_name)));
        }
    }
    Ok(None)
}

pub(super) async fn handle_block_user(
    ctx: &CommandContext<'_>,
    name: &str,
) -> Result<String, StreamlateError> {
    let name = name.trim().trim_start_matches('@');
    if name.is_empty() {
        return Ok(ctx.say("adminBlockNoUser", &[]));
    }
    let Some((id, display)) = resolve_user(ctx, name).await? else {
        return Ok(ctx.say("adminUserNotFound", &[name]));
    };
    match ctx.store.block_user(&id, &display).await? {
        ToggleOutcome::Changed => Ok(ctx.say("adminBlockConfirm", &[&display])),
        ToggleOutcome::Unchanged => Ok(ctx.say("adminBlockAlreadyExists", &[&display])),
    }
}

pub(super) async fn handle_unblock_user(
    ctx: &CommandContext<'_>,
    name: &str,
) -> Result<String, StreamlateError> {
    let name = name.trim().trim_start_matches('@');
    if name.is_empty() {
        return Ok(ctx.say("adminUnblockNoUser", &[]));
    }

    // The blocked id may predate any local profile: fall back to the
    // display names recorded at block time.
    let mut target_id = ctx
        .store
        .find_profile_by_name(name)
        .await?
        .map(|p| p.user_id);
    if target_id
        .as_ref()
        .map(|id| !ctx.cfg.user_blocklist.contains_key(id))
        .unwrap_or(true)
    {
        target_id = ctx
            .cfg
            .user_blocklist
            .iter()
            .find(|(_, display)| display.eq_ignore_ascii_case(name))
            .map(|(id, _)| id.clone());
    }

    let Some(id) = target_id else {
        return Ok(ctx.say("adminUnblockNotFound", &[name]));
    };
    match ctx.store.unblock_user(&id).await? {
        ToggleOutcome::Changed => Ok(ctx.say("adminUnblockConfirm", &[name])),
        ToggleOutcome::Unchanged => Ok(ctx.say("adminUnblockNotFound", &[name])),
    }
}

pub(super) async fn handle_block_word(
    ctx: &CommandContext<'_>,
    word: &str,
) -> Result<String, StreamlateError> {
    let word = word.trim();
    if word.is_empty() {
        return Ok(ctx.say("blocklistNoWord", &[]));
    }
    match ctx.store.block_word(word).await? {
        ToggleOutcome::Changed => Ok(ctx.say("blocklistAddConfirm", &[word])),
        ToggleOutcome::Unchanged => Ok(ctx.say("blocklistAlreadyExists", &[word])),
    }
}

pub(super) async fn handle_unblock_word(
    ctx: &CommandContext<'_>,
    word: &str,
) -> Result<String, StreamlateError> {
    let word = word.trim();
    if word.is_empty() {
        return Ok(ctx.say("blocklistNoWord", &[]));
    }
    match ctx.store.unblock_word(word).await? {
        ToggleOutcome::Changed => Ok(ctx.say("blocklistRemoveConfirm", &[word])),
        ToggleOutcome::Unchanged => Ok(ctx.say("blocklistNotFound", &[word])),
    }
}

pub(super) fn handle_list_users(ctx: &CommandContext<'_>) -> String {
    if ctx.cfg.user_blocklist.is_empty() {
        return ctx.say("blockListUsersEmpty", &[]);
    }
    let names = ctx
        .cfg
        .user_blocklist
        .values()
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    ctx.say("blockListUsers", &[&names])
}

pub(super) fn handle_list_words(ctx: &CommandContext<'_>) -> String {
    if ctx.cfg.word_blocklist.is_empty() {
        return ctx.say("blockListWordsEmpty", &[]);
    }
    let words = ctx
        .cfg
        .word_blocklist
        .iter()
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    ctx.say("blockListWords", &[&words])
}
