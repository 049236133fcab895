use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming chat command from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCommand {
    pub id: Uuid,
    /// Channel name (e.g. "twitch").
    pub channel: String,
    /// Platform-specific stable user ID.
    pub sender_id: String,
    /// Platform-reported display name, as seen on this message.
    pub sender_name: String,
    /// Full message text, including the command token.
    pub text: String,
    /// Whether the platform flags this sender as a moderator/broadcaster.
    #[serde(default)]
    pub is_moderator: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatCommand {
    /// Build a command with a fresh id and the current timestamp.
    pub fn new(channel: &str, sender_id: &str, sender_name: &str, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.to_string(),
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            text: text.to_string(),
            is_moderator: false,
            timestamp: Utc::now(),
        }
    }
}

/// Canonical grammatical gender, normalized from a free-text pronoun phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculine,
    Feminine,
    Neutral,
}

impl Gender {
    /// The branch key this gender selects inside a gender-select block.
    pub fn select_key(&self) -> &'static str {
        match self {
            Self::Masculine => "male",
            Self::Feminine => "female",
            Self::Neutral => "other",
        }
    }

    /// Parse a canonical table token ("male" / "female" / "neutral").
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "male" => Some(Self::Masculine),
            "female" => Some(Self::Feminine),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// The canonical table token for this gender.
    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Masculine => "male",
            Self::Feminine => "female",
            Self::Neutral => "neutral",
        }
    }

    /// Human-readable word used when describing the pronoun to the backend.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Masculine => "masculine",
            Self::Feminine => "feminine",
            Self::Neutral => "neutral",
        }
    }
}

/// One independently translated unit of a command's input text.
///
/// Produced by the command segmenter; carries everything the prompt
/// builder needs to translate this piece in isolation.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSegment {
    /// Cleaned text with placeholder tokens in place of pronoun phrases.
    pub text: String,
    /// Tone id for this segment ("neutral" unless a tag said otherwise).
    pub tone: String,
    /// Literal substrings that must survive translation untouched.
    pub proper_nouns: Vec<String>,
    /// Placeholder token → normalized pronoun, in encounter order.
    pub placeholders: Vec<(String, Gender)>,
    /// The caller's own normalized pronoun, if their profile has one.
    pub speaker_pronoun: Option<Gender>,
}

impl TextSegment {
    /// Whether this segment carries gender or tone instructions that
    /// warrant the stronger model tier.
    pub fn is_complex(&self) -> bool {
        !self.placeholders.is_empty() || self.speaker_pronoun.is_some()
    }
}
