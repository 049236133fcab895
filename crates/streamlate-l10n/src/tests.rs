use super::*;
use streamlate_core::message::Gender;

fn catalog() -> TemplateCatalog {
    TemplateCatalog::embedded_defaults().unwrap()
}

fn catalog_from(pairs: &[(&str, &[(&str, &str)])]) -> TemplateCatalog {
    let json = serde_json::to_string(
        &pairs
            .iter()
            .map(|(lang, templates)| {
                (
                    lang.to_string(),
                    templates
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect::<std::collections::HashMap<_, _>>(),
                )
            })
            .collect::<std::collections::HashMap<_, _>>(),
    )
    .unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_embedded_catalogs_parse() {
    let cat = catalog();
    assert!(cat.get("en", "apiError_normal").is_some());
    assert!(cat.get("es", "apiError_normal").is_some());
    assert!(cat.get("pt", "apiError_normal").is_some());
}

#[test]
fn test_resolve_prefers_exact_style() {
    let cat = catalog();
    let t = cat.resolve("en", "pirate", "apiError").unwrap();
    assert!(t.contains("Shiver"));
}

#[test]
fn test_resolve_falls_back_to_normal_before_bare_key() {
    let cat = catalog_from(&[(
        "en",
        &[
            ("greeting_normal", "hello"),
            ("greeting", "bare"),
        ],
    )]);
    // No _yoda variant: _normal must win over the bare key.
    assert_eq!(cat.resolve("en", "yoda", "greeting"), Some("hello"));
}

#[test]
fn test_resolve_exhausts_own_language_before_english() {
    let cat = catalog_from(&[
        ("en", &[("greeting_pirate", "arr")]),
        ("es", &[("greeting_normal", "hola")]),
    ]);
    // es has no _pirate variant, but its _normal must beat the en _pirate.
    assert_eq!(cat.resolve("es", "pirate", "greeting"), Some("hola"));
}

#[test]
fn test_resolve_falls_back_to_english() {
    let cat = catalog();
    // pt has no quote keys; resolution lands on the en ones.
    assert_eq!(cat.resolve("pt", "normal", "quoteOpen"), Some("“"));
}

#[test]
fn test_localize_missing_key_is_visible_placeholder() {
    let cat = catalog();
    let out = cat.localize(
        "en",
        "normal",
        "noSuchKey",
        Gender::Neutral,
        &MessageArgs::new("@user"),
    );
    assert_eq!(out, "[missing template: noSuchKey]");
}

#[test]
fn test_render_gender_branches() {
    let template = "{gender, select, male {he} female {she} other {they}}";
    let args = MessageArgs::new("@user");
    assert_eq!(render(template, Gender::Feminine, &args), "she");
    assert_eq!(render(template, Gender::Masculine, &args), "he");
    assert_eq!(render(template, Gender::Neutral, &args), "they");
}

#[test]
fn test_render_missing_branch_uses_other() {
    let template = "{gender, select, male {he} other {they}}";
    let args = MessageArgs::new("@user");
    assert_eq!(render(template, Gender::Feminine, &args), "they");
}

#[test]
fn test_render_positional_after_select() {
    let template = "{gender, select, male {{0} likes {1}} other {{0} like {1}}}";
    let args = MessageArgs::with("@ana", &["apples"]);
    assert_eq!(
        render(template, Gender::Masculine, &args),
        "@ana likes apples"
    );
    assert_eq!(render(template, Gender::Neutral, &args), "@ana like apples");
}

#[test]
fn test_render_mention_is_argument_zero() {
    let args = MessageArgs::with("@mod", &["word"]);
    assert_eq!(render("{0}: removed {1}", Gender::Neutral, &args), "@mod: removed word");
}

#[test]
fn test_render_argument_count_mismatch_skips_positional() {
    let template = "{gender, select, other {done}} with {3}";
    let args = MessageArgs::new("@user");
    // Select substitution still happens; positional pass is skipped.
    assert_eq!(render(template, Gender::Neutral, &args), "done with {3}");
}

#[test]
fn test_render_malformed_positional_skips_substitution() {
    let args = MessageArgs::with("@user", &["x"]);
    assert_eq!(render("broken {abc} here", Gender::Neutral, &args), "broken {abc} here");
    assert_eq!(render("dangling {0", Gender::Neutral, &args), "dangling {0");
}
