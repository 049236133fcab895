use crate::config::Persona;
use serde::{Deserialize, Serialize};

/// Sentinel target language meaning "no explicit preference".
pub const DEFAULT_TARGET: &str = "default";

/// Per-user translation preferences, keyed by platform user id.
///
/// The username doubles as the only reverse index (name → id) and is
/// refreshed whenever the platform reports a different display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    /// Target language code, or [`DEFAULT_TARGET`].
    pub target_lang: String,
    /// Language this user speaks; replies are localized in it.
    pub speaking_lang: String,
    /// Speaking style id (e.g. "normal", "pirate").
    pub style: String,
    /// Free-text pronoun phrase (e.g. "she/her"), if the user set one.
    pub pronouns: Option<String>,
}

impl UserProfile {
    /// Default profile for a user seen for the first time.
    pub fn from_persona(user_id: &str, username: &str, persona: &Persona) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: username.to_string(),
            target_lang: DEFAULT_TARGET.to_string(),
            speaking_lang: persona.language.clone(),
            style: persona.style.clone(),
            pronouns: None,
        }
    }

    /// Whether the user picked an explicit target language.
    pub fn has_custom_target(&self) -> bool {
        self.target_lang != DEFAULT_TARGET
    }

    /// Reset language, style, and pronoun preferences to the persona
    /// defaults. Returns `false` if nothing differed from the defaults.
    pub fn clear_preferences(&mut self, persona: &Persona) -> bool {
        let fresh = Self::from_persona(&self.user_id, &self.username, persona);
        if *self == fresh {
            return false;
        }
        self.target_lang = fresh.target_lang;
        self.speaking_lang = fresh.speaking_lang;
        self.style = fresh.style;
        self.pronouns = None;
        true
    }
}
