//! End-to-end scenarios for the playback session
//!
//! These tests drive the full session through the scripted media handle:
//! navigation across book and canon boundaries, natural listen-through,
//! error recovery, scrubbing over live playback, and custom catalogs.

use lectio::canon::Canon;
use lectio::media::MediaErrorKind;
use lectio::player::{
    AutoplayPolicy, PlaybackState, SessionCommands, SessionConfig, SessionView,
};
use lectio_integration_tests::SessionFixture;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_advancing_through_genesis_reaches_exodus() {
    let mut fixture = SessionFixture::new();
    fixture.session.start();
    fixture.pump();

    // Genesis has 50 chapters: 49 advances stay inside the book
    for _ in 0..49 {
        fixture.session.advance();
        fixture.pump();
    }
    assert_eq!(fixture.session.position().book, "Genesis");
    assert_eq!(fixture.session.position().chapter, 50);

    fixture.session.advance();
    fixture.pump();
    assert_eq!(fixture.session.position().book, "Exodus");
    assert_eq!(fixture.session.position().chapter, 1);
    assert_eq!(fixture.session.state(), PlaybackState::Playing);
}

#[test]
fn test_advance_crosses_testament_boundary() {
    let mut fixture = SessionFixture::new();
    fixture.session.go_to_position("Malachi", 4);
    fixture.pump();

    fixture.session.advance();
    fixture.pump();

    assert_eq!(fixture.session.position().book, "Matthew");
    assert_eq!(fixture.session.position().chapter, 1);
}

#[test]
fn test_advance_wraps_at_end_of_canon() {
    let mut fixture = SessionFixture::new();
    fixture.session.go_to_position("Revelation", 22);
    fixture.pump();

    fixture.session.advance();
    fixture.pump();

    assert_eq!(fixture.session.position().book, "Genesis");
    assert_eq!(fixture.session.position().chapter, 1);
}

#[test]
fn test_retreat_wraps_at_start_of_canon() {
    let mut fixture = SessionFixture::new();
    fixture.session.start();
    fixture.pump();

    fixture.session.retreat();
    fixture.pump();

    assert_eq!(fixture.session.position().book, "Revelation");
    assert_eq!(fixture.session.position().chapter, 22);
}

#[test]
fn test_natural_listen_through_advances_chapters() {
    let mut fixture = SessionFixture::with_config(SessionConfig::default(), 1.0);
    fixture.session.start();
    fixture.pump();
    assert_eq!(fixture.session.state(), PlaybackState::Playing);

    // One second of playback ends the chapter; the session advances and
    // reloads on its own
    fixture.run_seconds(1.0);
    assert_eq!(fixture.session.position().book, "Genesis");
    assert_eq!(fixture.session.position().chapter, 2);
    assert_eq!(fixture.session.state(), PlaybackState::Playing);
    assert_eq!(
        fixture.loads(),
        vec![
            "https://cdn.test/kjv/genesis/1".to_string(),
            "https://cdn.test/kjv/genesis/2".to_string(),
        ]
    );

    // And keeps going
    fixture.run_seconds(1.0);
    assert_eq!(fixture.session.position().chapter, 3);
}

#[test]
fn test_network_error_then_advance_recovers() {
    let mut fixture = SessionFixture::new();
    fixture
        .session
        .media_mut()
        .fail_locator("https://cdn.test/kjv/genesis/1", 2);

    fixture.session.start();
    fixture.pump();

    assert_eq!(fixture.session.state(), PlaybackState::Error);
    let error = fixture.session.last_error().unwrap();
    assert_eq!(error.kind, MediaErrorKind::NetworkFailure);
    assert_eq!(error.to_string(), "Network error. (Error code 2)");

    // No auto-retry, no auto-advance: the session stays put until a command
    fixture.run_seconds(2.0);
    assert_eq!(fixture.session.state(), PlaybackState::Error);

    fixture.session.advance();
    assert_eq!(fixture.session.last_error(), None);
    assert_eq!(fixture.session.state(), PlaybackState::Loading);
    fixture.pump();
    assert_eq!(fixture.session.position().chapter, 2);
    assert_eq!(fixture.session.state(), PlaybackState::Playing);
}

#[test]
fn test_fast_forward_and_rewind_cross_boundaries() {
    let mut fixture = SessionFixture::with_config(SessionConfig::default(), 300.0);
    fixture.session.go_to_position("Exodus", 1);
    fixture.pump();

    // 295 + 10 would pass the end of the chapter
    fixture.session.seek(295.0);
    fixture.pump();
    fixture.session.fast_forward();
    fixture.pump();
    assert_eq!(fixture.session.position().book, "Exodus");
    assert_eq!(fixture.session.position().chapter, 2);

    // Just started the new chapter: rewind retreats instead of seeking
    fixture.run_seconds(0.25);
    fixture.session.rewind();
    fixture.pump();
    assert_eq!(fixture.session.position().chapter, 1);
}

#[test]
fn test_scrub_over_live_playback_commits_once() {
    let mut fixture = SessionFixture::with_config(SessionConfig::default(), 300.0);
    fixture.session.start();
    fixture.pump();
    fixture.run_seconds(5.0);

    fixture.session.begin_scrub();
    fixture.session.scrub_to(120.0);

    // Playback keeps reporting underneath the drag; the displayed time
    // stays on the drag value
    fixture.run_seconds(2.0);
    assert_eq!(fixture.session.snapshot().metrics.current_time, 120.0);

    fixture.session.end_scrub(150.0);
    fixture.pump();
    assert_eq!(fixture.session.snapshot().metrics.current_time, 150.0);

    // Mirroring resumes from the committed position
    fixture.run_seconds(1.0);
    let now = fixture.session.snapshot().metrics.current_time;
    assert!(now > 150.0 && now < 152.0, "time was {}", now);
}

#[test]
fn test_rapid_navigation_is_last_write_wins() {
    let mut fixture = SessionFixture::new();
    fixture.session.start();

    // Supersede twice without letting any load finish
    fixture.session.go_to_book("Exodus");
    fixture.session.go_to_book("Psalms");
    fixture.pump();

    assert_eq!(fixture.session.position().book, "Psalms");
    assert_eq!(fixture.session.state(), PlaybackState::Playing);
    assert_eq!(fixture.loads().len(), 3);
    assert_eq!(
        fixture.loads().last().unwrap(),
        "https://cdn.test/kjv/psalms/1"
    );
}

#[test]
fn test_autoplay_never_waits_for_explicit_play() {
    let config = SessionConfig {
        autoplay: AutoplayPolicy::Never,
        ..SessionConfig::default()
    };
    let mut fixture = SessionFixture::with_config(config, 180.0);
    fixture.session.start();
    fixture.pump();
    assert_eq!(fixture.session.state(), PlaybackState::Ready);

    fixture.run_seconds(1.0);
    assert_eq!(fixture.session.snapshot().metrics.current_time, 0.0);

    fixture.session.play();
    fixture.pump();
    assert_eq!(fixture.session.state(), PlaybackState::Playing);
}

#[test]
fn test_custom_catalog_wraps_like_the_builtin() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"[
            { "name": "First Scroll", "testament": "Old Testament", "chapters": 2 },
            { "name": "Second Scroll", "testament": "New Testament", "chapters": 1 }
        ]"#,
    )
    .unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    let canon = Arc::new(Canon::from_json(&json).unwrap());
    let mut fixture =
        SessionFixture::with_canon(canon, SessionConfig::default(), 1.0);

    fixture.session.start();
    fixture.pump();
    assert_eq!(fixture.session.position().book, "First Scroll");

    // Listen straight through the whole catalog and back around
    fixture.run_seconds(3.0);
    assert_eq!(fixture.session.position().book, "First Scroll");
    assert_eq!(fixture.session.position().chapter, 1);
    assert_eq!(
        fixture.loads(),
        vec![
            "https://cdn.test/kjv/first-scroll/1".to_string(),
            "https://cdn.test/kjv/first-scroll/2".to_string(),
            "https://cdn.test/kjv/second-scroll/1".to_string(),
            "https://cdn.test/kjv/first-scroll/1".to_string(),
        ]
    );
}
