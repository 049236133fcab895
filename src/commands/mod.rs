//! Chat command surface: the translate command plus settings and
//! moderator-only blocklist toggles.

pub(crate) mod admin;
pub(crate) mod settings;

#[cfg(test)]
mod tests;

use crate::gateway::Gateway;
use streamlate_core::config::RuntimeConfig;
use streamlate_core::error::StreamlateError;
use streamlate_core::keywords;
use streamlate_core::message::{ChatCommand, Gender};
use streamlate_core::profile::UserProfile;
use streamlate_core::traits::UserDirectory;
use streamlate_l10n::{MessageArgs, TemplateCatalog};
use streamlate_store::Store;

/// Known chat commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Translate { force_strong: bool, body: String },
    Help,
    Set { body: String },
    Clear,
    BlockUser { name: String },
    UnblockUser { name: String },
    BlockWord { word: String },
    UnblockWord { word: String },
    ListBlockedUsers,
    ListBlockedWords,
}

impl Command {
    /// Parse a command from message text. Returns `None` for anything
    /// that is not one of ours.
    pub fn parse(text: &str, base_command: &str) -> Option<Self> {
        let trimmed = text.trim();
        let (first, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest.trim()),
            None => (trimmed, ""),
        };
        let lowered = first.to_lowercase();
        let suffix = lowered.strip_prefix(&base_command.to_lowercase())?;
        let arg1 = rest.split_whitespace().next().unwrap_or("").to_string();

        match suffix {
            "" => Some(Self::Translate {
                force_strong: false,
                body: rest.to_string(),
            }),
            "!" => Some(Self::Translate {
                force_strong: true,
                body: rest.to_string(),
            }),
            "help" => Some(Self::Help),
            "set" => Some(Self::Set {
                body: rest.to_string(),
            }),
            "clear" => Some(Self::Clear),
            "block" => Some(Self::BlockUser { name: arg1 }),
            "unblock" => Some(Self::UnblockUser { name: arg1 }),
            "blockword" => Some(Self::BlockWord { word: arg1 }),
            "unblockword" => Some(Self::UnblockWord { word: arg1 }),
            "listblocked" => Some(Self::ListBlockedUsers),
            "listwords" => Some(Self::ListBlockedWords),
            _ => None,
        }
    }

    /// Whether this command is restricted to moderators.
    pub fn requires_moderator(&self) -> bool {
        matches!(
            self,
            Self::BlockUser { .. }
                | Self::UnblockUser { .. }
                | Self::BlockWord { .. }
                | Self::UnblockWord { .. }
                | Self::ListBlockedUsers
                | Self::ListBlockedWords
        )
    }
}

/// Grouped context for command execution.
pub(crate) struct CommandContext<'a> {
    pub store: &'a Store,
    pub directory: Option<&'a dyn UserDirectory>,
    pub cfg: &'a RuntimeConfig,
    pub catalog: &'a TemplateCatalog,
    pub profile: UserProfile,
    pub mention: String,
    pub gender: Gender,
}

impl CommandContext<'_> {
    /// Localize a reply in the caller's language and style.
    pub(crate) fn say(&self, key: &str, rest: &[&str]) -> String {
        self.catalog.localize(
            &self.profile.speaking_lang,
            &self.profile.style,
            key,
            self.gender,
            &MessageArgs::with(&self.mention, rest),
        )
    }
}

/// Handle a non-translate command and return the reply text.
pub async fn handle(
    command: Command,
    gw: &Gateway,
    cmd: &ChatCommand,
) -> Result<Option<String>, StreamlateError> {
    let cfg = gw.store.load_runtime().await?;
    let catalog = gw.store.load_templates().await?;
    let profile = gw
        .store
        .ensure_profile(&cmd.sender_id, &cmd.sender_name, &cfg.persona)
        .await?;
    let mention = format!("@{}", profile.username);
    let gender = profile
        .pronouns
        .as_deref()
        .map(|p| keywords::classify_pronoun(&cfg.pronouns, p))
        .unwrap_or(Gender::Neutral);

    let mut ctx = CommandContext {
        store: &gw.store,
        directory: gw.directory.as_deref(),
        cfg: &cfg,
        catalog: &catalog,
        profile,
        mention,
        gender,
    };

    let reply = match command {
        // Routed straight to the pipeline by the gateway.
        Command::Translate { .. } => return Ok(None),
        Command::Help => settings::handle_help(&ctx),
        Command::Set { body } => settings::handle_set(&mut ctx, &body).await?,
        Command::Clear => settings::handle_clear(&mut ctx).await?,
        Command::BlockUser { name } => admin::handle_block_user(&ctx, &name).await?,
        Command::UnblockUser { name } => admin::handle_unblock_user(&ctx, &name).await?,
        Command::BlockWord { word } => admin::handle_block_word(&ctx, &word).await?,
        Command::UnblockWord { word } => admin::handle_unblock_word(&ctx, &word).await?,
        Command::ListBlockedUsers => admin::handle_list_users(&ctx),
        Command::ListBlockedWords => admin::handle_list_words(&ctx),
    };
    Ok(Some(reply))
}
