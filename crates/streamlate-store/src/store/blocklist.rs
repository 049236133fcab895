//! Blocklist toggles over the runtime configuration document.
//!
//! Blocklists live inside the configuration record, so toggles follow
//! the document contract: load whole, mutate in memory, save whole.
//! Every toggle is idempotent and reports whether it changed anything.

use super::Store;
use streamlate_core::error::StreamlateError;

/// Outcome of a set-membership toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Changed,
    /// Already present on add, or absent on remove.
    Unchanged,
}

impl Store {
    /// Add a word to the translation blocklist.
    pub async fn block_word(&self, word: &str) -> Result<ToggleOutcome, StreamlateError> {
        let mut config = self.load_runtime().await?;
        if !config.word_blocklist.insert(word.to_lowercase()) {
            return Ok(ToggleOutcome::Unchanged);
        }
        self.save_runtime(&config).await?;
        Ok(ToggleOutcome::Changed)
    }

    /// Remove a word from the translation blocklist.
    pub async fn unblock_word(&self, word: &str) -> Result<ToggleOutcome, StreamlateError> {
        let mut config = self.load_runtime().await?;
        if !config.word_blocklist.remove(&word.to_lowercase()) {
            return Ok(ToggleOutcome::Unchanged);
        }
        self.save_runtime(&config).await?;
        Ok(ToggleOutcome::Changed)
    }

    /// Block a user id, remembering the display name at block time.
    pub async fn block_user(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> Result<ToggleOutcome, StreamlateError> {
        let mut config = self.load_runtime().await?;
        if config.user_blocklist.contains_key(user_id) {
            return Ok(ToggleOutcome::Unchanged);
        }
        config
            .user_blocklist
            .insert(user_id.to_string(), display_name.to_string());
        self.save_runtime(&config).await?;
        Ok(ToggleOutcome::Changed)
    }

    /// Unblock a user id.
    pub async fn unblock_user(&self, user_id: &str) -> Result<ToggleOutcome, StreamlateError> {
        let mut config = self.load_runtime().await?;
        if config.user_blocklist.remove(user_id).is_none() {
            return Ok(ToggleOutcome::Unchanged);
        }
        self.save_runtime(&config).await?;
        Ok(ToggleOutcome::Changed)
    }
}
