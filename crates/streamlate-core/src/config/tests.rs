use super::*;

#[test]
fn test_bot_defaults() {
    let cfg: Config = toml::from_str("").unwrap();
    assert_eq!(cfg.bot.name, "streamlate");
    assert_eq!(cfg.bot.base_command, "!translate");
    assert_eq!(cfg.bot.log_level, "info");
    assert!(cfg.channel.twitch.is_none());
}

#[test]
fn test_parse_minimal_twitch_config() {
    let cfg: Config = toml::from_str(
        r#"
        [channel.twitch]
        enabled = true
        nick = "streamlate_bot"
        oauth_token = "oauth:abc"
        channel = "somestreamer"
        "#,
    )
    .unwrap();
    let tw = cfg.channel.twitch.unwrap();
    assert!(tw.enabled);
    assert_eq!(tw.channel, "somestreamer");
    assert!(tw.client_id.is_empty());
}

#[test]
fn test_seed_tables_are_language_keyed() {
    let rt = RuntimeConfig::seed();
    for table in [
        &rt.language_names,
        &rt.command_keywords,
        &rt.style_keywords,
        &rt.model_tags,
        &rt.tone_tags,
        &rt.pronouns,
    ] {
        assert!(table.contains_key("en"), "every table needs an en row");
        for keywords in table.values() {
            for keyword in keywords.keys() {
                assert_eq!(
                    keyword,
                    &keyword.to_lowercase(),
                    "table keywords must be stored lowercase"
                );
            }
        }
    }
}

#[test]
fn test_seed_round_trips_through_json() {
    let rt = RuntimeConfig::seed();
    let json = serde_json::to_string(&rt).unwrap();
    let back: RuntimeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.default_source, rt.default_source);
    assert_eq!(back.models.fast.per_minute, rt.models.fast.per_minute);
    assert_eq!(back.style_keywords["es"]["pirata"], "pirate");
}

#[test]
fn test_display_name_lowercases_configured_languages() {
    let rt = RuntimeConfig::seed();
    assert_eq!(rt.display_name("en", "es"), "Spanish");
    // es lowercases language names mid-sentence.
    assert_eq!(rt.display_name("es", "en"), "inglés");
    // Unknown display language falls back to the en row.
    assert_eq!(rt.display_name("zz", "es"), "Spanish");
    // Unknown code falls back to the code itself.
    assert_eq!(rt.display_name("en", "xx"), "xx");
}

#[test]
fn test_tier_lookup() {
    let rt = RuntimeConfig::seed();
    assert_eq!(rt.models.tier(ModelTier::Fast).model, "gpt-4o-mini");
    assert_eq!(rt.models.tier(ModelTier::Strong).model, "gpt-4o");
    assert_eq!(ModelTier::Strong.as_str(), "strong");
}
