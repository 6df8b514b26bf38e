// Content lookup and configuration overrides, exercised through the public API.

use birthday_journey::config::ContentConfig;
use birthday_journey::content::{BIRTHDAY_QUOTES, FALLBACK_THEME, StaticContent, Theme};
use birthday_journey::{ContentSource, GameKind, GreetingConfig, Stage, StageController};
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[test]
fn every_game_theme_has_builtin_text() {
    let content = StaticContent::new();
    for kind in [GameKind::Memory, GameKind::Balloons, GameKind::Hearts, GameKind::Simon] {
        let quote = content.quote(kind.theme().key());
        assert!(!quote.text.is_empty(), "{kind:?}");
    }
    assert_eq!(Theme::Strength.key(), "STRENGTH");
}

#[test]
fn unknown_theme_falls_back_to_joy() {
    let content = StaticContent::new();
    let joy = BIRTHDAY_QUOTES
        .iter()
        .find(|(k, _)| *k == FALLBACK_THEME)
        .map(|(_, t)| *t)
        .unwrap();
    assert_eq!(content.quote("unknown-key").text, joy);
    assert_eq!(content.quote("").text, joy);
    assert_eq!(
        content.quote("strength"),
        content.quote("STRENGTH"),
    );
}

#[test]
fn configured_quote_reaches_the_quote_screen() {
    let mut cfg = GreetingConfig::default();
    cfg.content
        .quotes
        .insert("memories".to_string(), "Remember the lake?".to_string());
    cfg.content.latency_ms = 0.0;
    cfg.transition_delay_ms = 0.0;
    let content = StaticContent::with_overrides(&cfg.content);
    let mut ctl = StageController::with_parts(cfg, Box::new(content), SmallRng::seed_from_u64(1));

    ctl.start(0.0);
    ctl.complete_game(GameKind::Memory, 0.0);
    ctl.tick(0.0);
    assert_eq!(ctl.stage(), Stage::Quote1);
    assert_eq!(ctl.quote().map(|q| q.text.as_str()), Some("Remember the lake?"));
}

#[test]
fn configured_final_note_and_latency() {
    let cfg = ContentConfig {
        latency_ms: 50.0,
        final_note: Some("See you soon".to_string()),
        ..ContentConfig::default()
    };
    let content = StaticContent::with_overrides(&cfg);
    assert_eq!(content.final_note(), "See you soon");
    assert_eq!(content.latency_ms(), 50.0);

    let blank = ContentConfig {
        final_note: Some("   ".to_string()),
        ..ContentConfig::default()
    };
    assert!(!StaticContent::with_overrides(&blank).final_note().trim().is_empty());
}

#[cfg(feature = "serde_json")]
#[test]
fn json_config_drives_the_controller() {
    let cfg = GreetingConfig::from_json(r#"{"balloons": {"target": 3}}"#).unwrap();
    assert_eq!(cfg.balloons.target, 3);
    assert_eq!(cfg.hearts, GreetingConfig::default().hearts);
}
