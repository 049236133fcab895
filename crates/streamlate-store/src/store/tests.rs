use super::*;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use streamlate_core::config::{Persona, RuntimeConfig};
use streamlate_core::profile::DEFAULT_TARGET;
use streamlate_l10n::TemplateCatalog;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

async fn seeded_store() -> Store {
    let store = test_store().await;
    store
        .seed_defaults(
            &RuntimeConfig::seed(),
            &TemplateCatalog::embedded_defaults().unwrap(),
        )
        .await
        .unwrap();
    store
}

fn persona() -> Persona {
    Persona {
        language: "en".to_string(),
        style: "normal".to_string(),
    }
}

#[tokio::test]
async fn test_seed_and_load_documents() {
    let store = seeded_store().await;

    let config = store.load_runtime().await.unwrap();
    assert_eq!(config.default_source, "en");
    assert_eq!(config.style_keywords["es"]["pirata"], "pirate");

    let catalog = store.load_templates().await.unwrap();
    assert!(catalog.get("en", "apiError_normal").is_some());
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let store = seeded_store().await;

    // Mutate the stored config, then seed again; the mutation must survive.
    let mut config = store.load_runtime().await.unwrap();
    config.default_target = "fr".to_string();
    store.save_runtime(&config).await.unwrap();

    let wrote = store
        .seed_defaults(
            &RuntimeConfig::seed(),
            &TemplateCatalog::embedded_defaults().unwrap(),
        )
        .await
        .unwrap();
    assert!(!wrote);
    assert_eq!(store.load_runtime().await.unwrap().default_target, "fr");
}

#[tokio::test]
async fn test_load_runtime_missing_is_config_error() {
    let store = test_store().await;
    let err = store.load_runtime().await.unwrap_err();
    assert!(matches!(
        err,
        streamlate_core::error::StreamlateError::Config(_)
    ));
}

#[tokio::test]
async fn test_first_sighting_creates_persona_default() {
    let store = test_store().await;
    let profile = store
        .ensure_profile("42", "Ana", &persona())
        .await
        .unwrap();
    assert_eq!(profile.user_id, "42");
    assert_eq!(profile.username, "Ana");
    assert_eq!(profile.target_lang, DEFAULT_TARGET);
    assert_eq!(profile.speaking_lang, "en");
    assert_eq!(profile.style, "normal");
    assert!(profile.pronouns.is_none());
}

#[tokio::test]
async fn test_sighting_refreshes_username() {
    let store = test_store().await;
    store.ensure_profile("42", "Ana", &persona()).await.unwrap();
    let renamed = store
        .ensure_profile("42", "AnaLive", &persona())
        .await
        .unwrap();
    assert_eq!(renamed.username, "AnaLive");

    // The old name no longer resolves, the new one does, case-insensitively.
    assert!(store.find_profile_by_name("Ana").await.unwrap().is_none());
    let found = store.find_profile_by_name("analive").await.unwrap().unwrap();
    assert_eq!(found.user_id, "42");
}

#[tokio::test]
async fn test_profile_preferences_survive_resighting() {
    let store = test_store().await;
    let mut profile = store.ensure_profile("42", "Ana", &persona()).await.unwrap();
    profile.target_lang = "es".to_string();
    profile.pronouns = Some("she/her".to_string());
    store.save_profile(&profile).await.unwrap();

    let again = store.ensure_profile("42", "Ana", &persona()).await.unwrap();
    assert_eq!(again.target_lang, "es");
    assert_eq!(again.pronouns.as_deref(), Some("she/her"));
}

#[tokio::test]
async fn test_block_word_toggle_is_idempotent() {
    let store = seeded_store().await;

    assert_eq!(
        store.block_word("Spoiler").await.unwrap(),
        ToggleOutcome::Changed
    );
    assert_eq!(
        store.block_word("spoiler").await.unwrap(),
        ToggleOutcome::Unchanged
    );

    let config = store.load_runtime().await.unwrap();
    assert_eq!(config.word_blocklist.len(), 1);
    assert!(config.word_blocklist.contains("spoiler"));

    assert_eq!(
        store.unblock_word("SPOILER").await.unwrap(),
        ToggleOutcome::Changed
    );
    assert_eq!(
        store.unblock_word("spoiler").await.unwrap(),
        ToggleOutcome::Unchanged
    );
}

#[tokio::test]
async fn test_block_user_toggle_is_idempotent() {
    let store = seeded_store().await;

    assert_eq!(
        store.block_user("99", "Troll").await.unwrap(),
        ToggleOutcome::Changed
    );
    assert_eq!(
        store.block_user("99", "TrollRenamed").await.unwrap(),
        ToggleOutcome::Unchanged
    );

    let config = store.load_runtime().await.unwrap();
    assert_eq!(config.user_blocklist.len(), 1);
    // Second add must not overwrite the stored display name either.
    assert_eq!(config.user_blocklist["99"], "Troll");

    assert_eq!(
        store.unblock_user("99").await.unwrap(),
        ToggleOutcome::Changed
    );
    assert_eq!(
        store.unblock_user("99").await.unwrap(),
        ToggleOutcome::Unchanged
    );
}

#[tokio::test]
async fn test_quota_reserve_up_to_limit_then_reject() {
    let store = test_store().await;

    // Per-minute limit of 5: four reservations of 1 succeed.
    for expected in 1..=4 {
        let snap = store
            .quota_reserve("fast", "2026-08-06", 400, "2026-08-06T14:00", 5, 1)
            .await
            .unwrap()
            .expect("reservation within limit must succeed");
        assert_eq!(snap.minute, expected);
    }

    // A fifth reservation of size 2 must be rejected without mutating.
    let rejected = store
        .quota_reserve("fast", "2026-08-06", 400, "2026-08-06T14:00", 5, 2)
        .await
        .unwrap();
    assert!(rejected.is_none());

    let totals = store
        .quota_totals("fast", "2026-08-06", "2026-08-06T14:00")
        .await
        .unwrap();
    assert_eq!(totals.minute, 4);
    assert_eq!(totals.day, 4);
}

#[tokio::test]
async fn test_quota_rejection_rolls_back_day_window() {
    let store = test_store().await;

    // Day limit allows the add, minute limit does not: the day counter
    // must not keep the provisional increment.
    let rejected = store
        .quota_reserve("strong", "2026-08-06", 100, "2026-08-06T14:00", 1, 2)
        .await
        .unwrap();
    assert!(rejected.is_none());

    let totals = store
        .quota_totals("strong", "2026-08-06", "2026-08-06T14:00")
        .await
        .unwrap();
    assert_eq!(totals.day, 0);
    assert_eq!(totals.minute, 0);
}

#[tokio::test]
async fn test_quota_windows_are_per_tier() {
    let store = test_store().await;
    store
        .quota_reserve("fast", "2026-08-06", 400, "2026-08-06T14:00", 20, 3)
        .await
        .unwrap()
        .unwrap();

    let other = store
        .quota_totals("strong", "2026-08-06", "2026-08-06T14:00")
        .await
        .unwrap();
    assert_eq!(other.day, 0);
}

#[tokio::test]
async fn test_quota_purge_drops_stale_minutes_only() {
    let store = test_store().await;
    store
        .quota_reserve("fast", "2026-08-06", 400, "2026-08-06T13:59", 20, 2)
        .await
        .unwrap()
        .unwrap();
    store
        .quota_reserve("fast", "2026-08-06", 400, "2026-08-06T14:00", 20, 1)
        .await
        .unwrap()
        .unwrap();

    let purged = store.quota_purge_minutes("2026-08-06T14:00").await.unwrap();
    assert_eq!(purged, 1);

    let totals = store
        .quota_totals("fast", "2026-08-06", "2026-08-06T14:00")
        .await
        .unwrap();
    // The day window keeps both reservations; the stale minute is gone.
    assert_eq!(totals.day, 3);
    assert_eq!(totals.minute, 1);
}
