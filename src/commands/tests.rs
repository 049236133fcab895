use super::*;
use streamlate_core::config::StoreConfig;

#[test]
fn test_parse_translate_and_force_marker() {
    let cmd = Command::parse("!translate es hello there", "!translate").unwrap();
    assert_eq!(
        cmd,
        Command::Translate {
            force_strong: false,
            body: "es hello there".to_string()
        }
    );

    let forced = Command::parse("!translate! hello", "!translate").unwrap();
    assert_eq!(
        forced,
        Command::Translate {
            force_strong: true,
            body: "hello".to_string()
        }
    );
}

#[test]
fn test_parse_is_case_insensitive_but_preserves_body() {
    let cmd = Command::parse("!TRANSLATE Hola *Bob*", "!translate").unwrap();
    assert_eq!(
        cmd,
        Command::Translate {
            force_strong: false,
            body: "Hola *Bob*".to_string()
        }
    );
}

#[test]
fn test_parse_settings_and_admin_commands() {
    assert_eq!(
        Command::parse("!translatehelp", "!translate"),
        Some(Command::Help)
    );
    assert_eq!(
        Command::parse("!translateset idioma:es", "!translate"),
        Some(Command::Set {
            body: "idioma:es".to_string()
        })
    );
    assert_eq!(
        Command::parse("!translateclear", "!translate"),
        Some(Command::Clear)
    );
    assert_eq!(
        Command::parse("!translateblock @troll", "!translate"),
        Some(Command::BlockUser {
            name: "@troll".to_string()
        })
    );
    assert_eq!(
        Command::parse("!translateblockword spoiler", "!translate"),
        Some(Command::BlockWord {
            word: "spoiler".to_string()
        })
    );
    assert_eq!(
        Command::parse("!translatelistwords", "!translate"),
        Some(Command::ListBlockedWords)
    );
}

#[test]
fn test_parse_rejects_non_commands() {
    assert!(Command::parse("hello world", "!translate").is_none());
    assert!(Command::parse("!translatefoo x", "!translate").is_none());
    assert!(Command::parse("!trans hello", "!translate").is_none());
}

#[test]
fn test_moderator_gating_flags() {
    assert!(Command::parse("!translateblock x", "!translate")
        .unwrap()
        .requires_moderator());
    assert!(Command::parse("!translateunblockword x", "!translate")
        .unwrap()
        .requires_moderator());
    assert!(!Command::parse("!translate x", "!translate")
        .unwrap()
        .requires_moderator());
    assert!(!Command::parse("!translateset a:b", "!translate")
        .unwrap()
        .requires_moderator());
}

// --- Handler tests against an in-memory store ---

struct Fixture {
    store: Store,
    cfg: RuntimeConfig,
    catalog: TemplateCatalog,
}

impl Fixture {
    async fn new() -> Self {
        let store = Store::new(&StoreConfig {
            db_path: ":memory:".to_string(),
        })
        .await
        .unwrap();
        store
            .seed_defaults(
                &RuntimeConfig::seed(),
                &streamlate_l10n::TemplateCatalog::embedded_defaults().unwrap(),
            )
            .await
            .unwrap();
        let cfg = store.load_runtime().await.unwrap();
        let catalog = store.load_templates().await.unwrap();
        Self {
            store,
            cfg,
            catalog,
        }
    }

    async fn context(&self, user_id: &str, username: &str) -> CommandContext<'_> {
        let profile = self
            .store
            .ensure_profile(user_id, username, &self.cfg.persona)
            .await
            .unwrap();
        let mention = format!("@{}", profile.username);
        CommandContext {
            store: &self.store,
            directory: None,
            cfg: &self.cfg,
            catalog: &self.catalog,
            profile,
            mention,
            gender: Gender::Neutral,
        }
    }
}

#[tokio::test]
async fn test_set_applies_spanish_keyword_via_inference() {
    let fx = Fixture::new().await;
    let mut ctx = fx.context("1", "Ana").await;

    // "idioma" is not an English keyword; inference resolves it as Spanish
    // and the setting is applied with Spanish-language resolution.
    let reply = settings::handle_set(&mut ctx, "idioma:es").await.unwrap();
    assert!(reply.contains("@Ana"));

    let saved = fx.store.get_profile("1").await.unwrap().unwrap();
    assert_eq!(saved.target_lang, "es");
}

#[tokio::test]
async fn test_set_multiple_pairs_and_pronouns() {
    let fx = Fixture::new().await;
    let mut ctx = fx.context("2", "Lee").await;

    let reply = settings::handle_set(&mut ctx, "target:es style:pirate pronouns:she/her")
        .await
        .unwrap();
    assert!(reply.contains("she/her"));

    let saved = fx.store.get_profile("2").await.unwrap().unwrap();
    assert_eq!(saved.target_lang, "es");
    assert_eq!(saved.style, "pirate");
    assert_eq!(saved.pronouns.as_deref(), Some("she/her"));
}

#[tokio::test]
async fn test_set_invalid_pair_does_not_abort_valid_ones() {
    let fx = Fixture::new().await;
    let mut ctx = fx.context("3", "Kim").await;

    let reply = settings::handle_set(&mut ctx, "target:es bogus:zz")
        .await
        .unwrap();
    // The valid pair is confirmed, the bad token reported.
    assert!(reply.contains("Spanish"));
    assert!(reply.contains("bogus"));

    let saved = fx.store.get_profile("3").await.unwrap().unwrap();
    assert_eq!(saved.target_lang, "es");
}

#[tokio::test]
async fn test_set_invalid_language_code_reported() {
    let fx = Fixture::new().await;
    let mut ctx = fx.context("4", "Ash").await;

    let reply = settings::handle_set(&mut ctx, "target:zz").await.unwrap();
    assert!(reply.contains("zz"));

    let saved = fx.store.get_profile("4").await.unwrap().unwrap();
    assert_eq!(saved.target_lang, streamlate_core::profile::DEFAULT_TARGET);
}

#[tokio::test]
async fn test_set_speaking_changes_confirmation_language() {
    let fx = Fixture::new().await;
    let mut ctx = fx.context("5", "Rio").await;

    let reply = settings::handle_set(&mut ctx, "speaking:es").await.unwrap();
    // Confirmation renders in the just-set speaking language.
    assert!(reply.contains("actualicé"));

    let saved = fx.store.get_profile("5").await.unwrap().unwrap();
    assert_eq!(saved.speaking_lang, "es");
}

#[tokio::test]
async fn test_clear_resets_and_reports_none_when_fresh() {
    let fx = Fixture::new().await;
    let mut ctx = fx.context("6", "Max").await;

    let untouched = settings::handle_clear(&mut ctx).await.unwrap();
    assert_eq!(untouched, "You did not have a language preference to clear.");

    settings::handle_set(&mut ctx, "target:fr").await.unwrap();
    let cleared = settings::handle_clear(&mut ctx).await.unwrap();
    assert_eq!(cleared, "Your language preferences have been cleared.");

    let saved = fx.store.get_profile("6").await.unwrap().unwrap();
    assert_eq!(saved.target_lang, streamlate_core::profile::DEFAULT_TARGET);
}

#[tokio::test]
async fn test_help_links_to_guide() {
    let fx = Fixture::new().await;
    let ctx = fx.context("7", "Sam").await;
    let reply = settings::handle_help(&ctx);
    assert!(reply.contains("https://streamlate.dev/guide"));
}

#[tokio::test]
async fn test_block_word_reports_already_exists() {
    let fx = Fixture::new().await;
    let ctx = fx.context("8", "Moddy").await;

    let first = admin::handle_block_word(&ctx, "spoiler").await.unwrap();
    assert!(first.contains("has been added"));

    let second = admin::handle_block_word(&ctx, "spoiler").await.unwrap();
    assert!(second.contains("already"));
}

#[tokio::test]
async fn test_block_user_via_reverse_index() {
    let fx = Fixture::new().await;
    // The troll has chatted before, so the reverse index knows them.
    fx.store
        .ensure_profile("99", "Troll", &fx.cfg.persona)
        .await
        .unwrap();
    let ctx = fx.context("8", "Moddy").await;

    let blocked = admin::handle_block_user(&ctx, "@troll").await.unwrap();
    assert!(blocked.contains("Troll"));
    assert!(blocked.contains("blocked"));

    let runtime = fx.store.load_runtime().await.unwrap();
    assert_eq!(runtime.user_blocklist.get("99").map(String::as_str), Some("Troll"));

    let again = admin::handle_block_user(&ctx, "troll").await.unwrap();
    assert!(again.contains("already"));
}

#[tokio::test]
async fn test_unblock_user_falls_back_to_blocklist_names() {
    let fx = Fixture::new().await;
    // Blocked id with no profile row at all.
    fx.store.block_user("123", "Ghost").await.unwrap();

    let cfg = fx.store.load_runtime().await.unwrap();
    let catalog = fx.catalog.clone();
    let profile = fx
        .store
        .ensure_profile("8", "Moddy", &cfg.persona)
        .await
        .unwrap();
    let ctx = CommandContext {
        store: &fx.store,
        directory: None,
        cfg: &cfg,
        catalog: &catalog,
        mention: format!("@{}", profile.username),
        profile,
        gender: Gender::Neutral,
    };

    let reply = admin::handle_unblock_user(&ctx, "ghost").await.unwrap();
    assert!(reply.contains("unblocked"));
    let runtime = fx.store.load_runtime().await.unwrap();
    assert!(runtime.user_blocklist.is_empty());
}

#[tokio::test]
async fn test_unknown_user_reports_not_found() {
    let fx = Fixture::new().await;
    let ctx = fx.context("8", "Moddy").await;
    let reply = admin::handle_block_user(&ctx, "nobody").await.unwrap();
    assert!(reply.contains("nobody"));
}

#[tokio::test]
async fn test_list_words_empty_and_filled() {
    let fx = Fixture::new().await;
    let ctx = fx.context("8", "Moddy").await;

    let empty = admin::handle_list_words(&ctx);
    assert!(empty.contains("empty"));

    admin::handle_block_word(&ctx, "alpha").await.unwrap();
    admin::handle_block_word(&ctx, "beta").await.unwrap();

    // The context snapshot is stale by design (documents are read fresh
    // per invocation), so rebuild it to list.
    let cfg = fx.store.load_runtime().await.unwrap();
    let profile = fx
        .store
        .ensure_profile("8", "Moddy", &cfg.persona)
        .await
        .unwrap();
    let ctx2 = CommandContext {
        store: &fx.store,
        directory: None,
        cfg: &cfg,
        catalog: &fx.catalog,
        mention: format!("@{}", profile.username),
        profile,
        gender: Gender::Neutral,
    };
    let listed = admin::handle_list_words(&ctx2);
    assert!(listed.contains("alpha"));
    assert!(listed.contains("beta"));
}
