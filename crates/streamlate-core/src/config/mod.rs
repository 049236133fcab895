mod defaults;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::StreamlateError;
use defaults::*;

/// Top-level bootstrap configuration, read once from `config.toml`.
///
/// Holds only what is needed to reach the collaborators: credentials,
/// endpoints, and the database path. Everything the pipeline itself
/// consumes lives in [`RuntimeConfig`], persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Chat token that invokes the pipeline (e.g. "!translate").
    #[serde(default = "default_base_command")]
    pub base_command: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            base_command: default_base_command(),
            log_level: default_log_level(),
        }
    }
}

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    pub twitch: Option<TwitchConfig>,
    pub overlay: Option<OverlayConfig>,
}

/// Twitch chat config (IRC for chat, Helix for user lookup).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitchConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Bot account login name.
    #[serde(default)]
    pub nick: String,
    /// OAuth token for IRC (with or without the "oauth:" prefix).
    #[serde(default)]
    pub oauth_token: String,
    /// Channel to join, without the leading '#'.
    #[serde(default)]
    pub channel: String,
    /// Application client id for Helix user lookups.
    #[serde(default)]
    pub client_id: String,
    /// Bearer token for Helix user lookups.
    #[serde(default)]
    pub helix_token: String,
}

/// Overlay webhook config — a secondary, shorter-form reply surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: String,
}

/// Completion backend config (OpenAI-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            api_key: String::new(),
        }
    }
}

/// Store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Load bootstrap configuration from a TOML file.
pub fn load(path: &str) -> Result<Config, StreamlateError> {
    let raw = std::fs::read_to_string(shellexpand(path))
        .map_err(|e| StreamlateError::Config(format!("failed to read {path}: {e}")))?;
    toml::from_str(&raw).map_err(|e| StreamlateError::Config(format!("failed to parse {path}: {e}")))
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Keyword tables: language code → lowercase keyword → canonical token.
pub type KeywordTable = HashMap<String, HashMap<String, String>>;

/// The default persona new profiles inherit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub language: String,
    pub style: String,
}

/// Model tier — a named class of backend invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Cheap and quick; the default for plain text.
    Fast,
    /// Stronger and slower; used for gendered, toned, or styled requests.
    Strong,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Strong => "strong",
        }
    }
}

/// Per-tier model name and quota limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierLimits {
    pub model: String,
    pub per_minute: i64,
    pub per_day: i64,
}

/// Both tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub fast: TierLimits,
    pub strong: TierLimits,
}

impl ModelsConfig {
    pub fn tier(&self, tier: ModelTier) -> &TierLimits {
        match tier {
            ModelTier::Fast => &self.fast,
            ModelTier::Strong => &self.strong,
        }
    }
}

/// Runtime configuration document.
///
/// Persisted whole in the store, loaded fresh at the start of every
/// command invocation, and mutated only by admin toggles that save it
/// straight back. Every nested table is keyed first by language code,
/// then by lowercase keyword; resolution tries the requested language
/// and falls back to "en".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// "Auto-from" side of the default translate pair.
    pub default_source: String,
    /// "Auto-to" side of the default translate pair.
    pub default_target: String,
    pub persona: Persona,
    pub models: ModelsConfig,
    #[serde(default)]
    pub word_blocklist: BTreeSet<String>,
    /// Blocked user id → display name at block time.
    #[serde(default)]
    pub user_blocklist: BTreeMap<String, String>,
    /// Tie-break order for ambiguous language inference.
    #[serde(default)]
    pub priority: Vec<String>,
    /// Candidate quota timezones, tried in order; UTC if none resolve.
    #[serde(default)]
    pub timezones: Vec<String>,
    #[serde(default)]
    pub help_url: Option<String>,
    /// Languages whose display names are lowercased mid-sentence.
    #[serde(default)]
    pub lowercase_names: BTreeSet<String>,
    pub language_names: KeywordTable,
    pub command_keywords: KeywordTable,
    pub style_keywords: KeywordTable,
    pub model_tags: KeywordTable,
    pub tone_tags: KeywordTable,
    pub pronouns: KeywordTable,
    /// (language, canonical pronoun token) → free-text grammar hint.
    #[serde(default)]
    pub grammar_hints: HashMap<String, HashMap<String, String>>,
}

impl RuntimeConfig {
    /// Built-in seed document, written to the store on first run.
    pub fn seed() -> Self {
        defaults::seed_runtime()
    }

    /// Whether `code` is a configured language code.
    pub fn is_language(&self, code: &str) -> bool {
        self.language_names
            .get("en")
            .map(|names| names.contains_key(code))
            .unwrap_or(false)
    }

    /// Display name for `code` in `in_lang`, with "en" then identity fallback,
    /// lowercased when `in_lang` is configured to lowercase language names.
    pub fn display_name(&self, in_lang: &str, code: &str) -> String {
        let name = crate::keywords::resolve(&self.language_names, in_lang, code)
            .unwrap_or(code)
            .to_string();
        if self.lowercase_names.contains(in_lang) {
            name.to_lowercase()
        } else {
            name
        }
    }
}
