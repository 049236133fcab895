//! Default values for serde and the built-in runtime seed document.

use super::{KeywordTable, ModelsConfig, Persona, RuntimeConfig, TierLimits};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub(super) fn default_name() -> String {
    "streamlate".to_string()
}

pub(super) fn default_base_command() -> String {
    "!translate".to_string()
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_provider_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub(super) fn default_db_path() -> String {
    "~/.streamlate/data/streamlate.db".to_string()
}

fn table(entries: &[(&str, &[(&str, &str)])]) -> KeywordTable {
    entries
        .iter()
        .map(|(lang, kws)| {
            (
                lang.to_string(),
                kws.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        })
        .collect()
}

/// Built-in runtime configuration, seeded into the store on first run.
pub(super) fn seed_runtime() -> RuntimeConfig {
    let language_names = table(&[
        (
            "en",
            &[
                ("en", "English"),
                ("es", "Spanish"),
                ("pt", "Portuguese"),
                ("fr", "French"),
                ("de", "German"),
            ],
        ),
        (
            "es",
            &[
                ("en", "Inglés"),
                ("es", "Español"),
                ("pt", "Portugués"),
                ("fr", "Francés"),
                ("de", "Alemán"),
            ],
        ),
        (
            "pt",
            &[
                ("en", "Inglês"),
                ("es", "Espanhol"),
                ("pt", "Português"),
                ("fr", "Francês"),
                ("de", "Alemão"),
            ],
        ),
        (
            "fr",
            &[
                ("en", "Anglais"),
                ("es", "Espagnol"),
                ("pt", "Portugais"),
                ("fr", "Français"),
                ("de", "Allemand"),
            ],
        ),
        (
            "de",
            &[
                ("en", "Englisch"),
                ("es", "Spanisch"),
                ("pt", "Portugiesisch"),
                ("fr", "Französisch"),
                ("de", "Deutsch"),
            ],
        ),
    ]);

    let command_keywords = table(&[
        (
            "en",
            &[
                ("target", "target"),
                ("to", "target"),
                ("speaking", "speaking"),
                ("speak", "speaking"),
                ("style", "style"),
                ("pronouns", "pronouns"),
            ],
        ),
        (
            "es",
            &[
                ("idioma", "target"),
                ("destino", "target"),
                ("hablo", "speaking"),
                ("estilo", "style"),
                ("pronombres", "pronouns"),
            ],
        ),
        (
            "pt",
            &[
                ("idioma", "target"),
                ("destino", "target"),
                ("falo", "speaking"),
                ("estilo", "style"),
                ("pronomes", "pronouns"),
            ],
        ),
        (
            "fr",
            &[
                ("langue", "target"),
                ("cible", "target"),
                ("parle", "speaking"),
                ("style", "style"),
                ("pronoms", "pronouns"),
            ],
        ),
        (
            "de",
            &[
                ("sprache", "target"),
                ("ziel", "target"),
                ("spreche", "speaking"),
                ("stil", "style"),
                ("pronomen", "pronouns"),
            ],
        ),
    ]);

    let style_keywords = table(&[
        (
            "en",
            &[
                ("normal", "normal"),
                ("pirate", "pirate"),
                ("yoda", "yoda"),
                ("shakes", "shakes"),
                ("archaic", "shakes"),
                ("old", "shakes"),
                ("dk", "dk"),
                ("donkeykong", "dk"),
                ("baby", "baby"),
            ],
        ),
        (
            "es",
            &[
                ("normal", "normal"),
                ("pirata", "pirate"),
                ("yoda", "yoda"),
                ("antiguo", "shakes"),
                ("arcaico", "shakes"),
                ("dk", "dk"),
                ("bebe", "baby"),
            ],
        ),
        (
            "pt",
            &[
                ("normal", "normal"),
                ("pirata", "pirate"),
                ("yoda", "yoda"),
                ("arcaico", "shakes"),
                ("antigo", "shakes"),
                ("dk", "dk"),
                ("bebe", "baby"),
            ],
        ),
        (
            "fr",
            &[
                ("normal", "normal"),
                ("pirate", "pirate"),
                ("yoda", "yoda"),
                ("ancien", "shakes"),
                ("classique", "shakes"),
                ("dk", "dk"),
                ("bebe", "baby"),
            ],
        ),
        (
            "de",
            &[
                ("normal", "normal"),
                ("pirat", "pirate"),
                ("yoda", "yoda"),
                ("altdeutsch", "shakes"),
                ("archaisch", "shakes"),
                ("dk", "dk"),
                ("baby", "baby"),
            ],
        ),
    ]);

    let model_tags = table(&[
        (
            "en",
            &[
                ("smart", "strong"),
                ("max", "strong"),
                ("fast", "fast"),
                ("lite", "fast"),
            ],
        ),
        ("es", &[("listo", "strong"), ("rapido", "fast")]),
        ("pt", &[("esperto", "strong"), ("rapido", "fast")]),
        ("fr", &[("malin", "strong"), ("rapide", "fast")]),
        ("de", &[("schlau", "strong"), ("schnell", "fast")]),
    ]);

    let tone_tags = table(&[
        (
            "en",
            &[
                ("whisper", "whisper"),
                ("shout", "shout"),
                ("happy", "happy"),
                ("sad", "sad"),
                ("angry", "angry"),
                ("formal", "formal"),
                ("casual", "casual"),
            ],
        ),
        (
            "es",
            &[
                ("susurro", "whisper"),
                ("grito", "shout"),
                ("feliz", "happy"),
                ("triste", "sad"),
                ("formal", "formal"),
            ],
        ),
        (
            "pt",
            &[
                ("sussurro", "whisper"),
                ("grito", "shout"),
                ("feliz", "happy"),
                ("triste", "sad"),
                ("formal", "formal"),
            ],
        ),
        (
            "fr",
            &[
                ("chuchote", "whisper"),
                ("crie", "shout"),
                ("joyeux", "happy"),
                ("triste", "sad"),
                ("formel", "formal"),
            ],
        ),
        (
            "de",
            &[
                ("fluestern", "whisper"),
                ("schrei", "shout"),
                ("froh", "happy"),
                ("traurig", "sad"),
                ("formell", "formal"),
            ],
        ),
    ]);

    let pronouns = table(&[
        (
            "en",
            &[
                ("he", "male"),
                ("him", "male"),
                ("his", "male"),
                ("she", "female"),
                ("her", "female"),
                ("hers", "female"),
                ("they", "neutral"),
                ("them", "neutral"),
            ],
        ),
        (
            "es",
            &[
                ("el", "male"),
                ("él", "male"),
                ("ella", "female"),
                ("elle", "neutral"),
            ],
        ),
        (
            "pt",
            &[("ele", "male"), ("ela", "female"), ("elu", "neutral")],
        ),
        (
            "fr",
            &[("il", "male"), ("elle", "female"), ("iel", "neutral")],
        ),
        (
            "de",
            &[("er", "male"), ("sie", "female"), ("dey", "neutral")],
        ),
    ]);

    let mut grammar_hints: HashMap<String, HashMap<String, String>> = HashMap::new();
    grammar_hints.insert(
        "es".to_string(),
        [
            (
                "male".to_string(),
                "Use masculine adjective and participle agreement for the speaker.".to_string(),
            ),
            (
                "female".to_string(),
                "Use feminine adjective and participle agreement for the speaker.".to_string(),
            ),
        ]
        .into_iter()
        .collect(),
    );
    grammar_hints.insert(
        "pt".to_string(),
        [
            (
                "male".to_string(),
                "Use masculine agreement for first-person adjectives.".to_string(),
            ),
            (
                "female".to_string(),
                "Use feminine agreement for first-person adjectives.".to_string(),
            ),
        ]
        .into_iter()
        .collect(),
    );

    RuntimeConfig {
        default_source: "en".to_string(),
        default_target: "pt".to_string(),
        persona: Persona {
            language: "en".to_string(),
            style: "normal".to_string(),
        },
        models: ModelsConfig {
            fast: TierLimits {
                model: "gpt-4o-mini".to_string(),
                per_minute: 20,
                per_day: 400,
            },
            strong: TierLimits {
                model: "gpt-4o".to_string(),
                per_minute: 10,
                per_day: 200,
            },
        },
        word_blocklist: BTreeSet::new(),
        user_blocklist: BTreeMap::new(),
        priority: vec![
            "en".to_string(),
            "es".to_string(),
            "pt".to_string(),
            "fr".to_string(),
            "de".to_string(),
        ],
        timezones: vec![
            "America/Sao_Paulo".to_string(),
            "America/New_York".to_string(),
            "Etc/UTC".to_string(),
        ],
        help_url: Some("https://streamlate.dev/guide".to_string()),
        lowercase_names: ["es", "pt", "fr"].iter().map(|s| s.to_string()).collect(),
        language_names,
        command_keywords,
        style_keywords,
        model_tags,
        tone_tags,
        pronouns,
        grammar_hints,
    }
}
