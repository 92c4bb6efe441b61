//! Integration test utilities for Lectio
//!
//! Provides a session harness wired to the scripted media handle, with
//! helpers to deliver handle events and advance simulated playback the way
//! the host event pump does.

use lectio::canon::Canon;
use lectio::media::{LocatorConfig, ScriptedCall, ScriptedMedia};
use lectio::player::{PlaybackSession, SessionConfig};
use std::sync::Arc;

/// A playback session driving a scripted media handle
pub struct SessionFixture {
    pub session: PlaybackSession<ScriptedMedia>,
}

impl SessionFixture {
    /// Session over the built-in canon with default configuration and
    /// three-minute chapters.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default(), 180.0)
    }

    pub fn with_config(config: SessionConfig, chapter_secs: f64) -> Self {
        Self::with_canon(Arc::new(Canon::builtin().clone()), config, chapter_secs)
    }

    pub fn with_canon(canon: Arc<Canon>, config: SessionConfig, chapter_secs: f64) -> Self {
        let media = ScriptedMedia::new(chapter_secs);
        let session = PlaybackSession::new(canon, media, Self::locator(), config);
        Self { session }
    }

    /// Locator configuration used by all fixtures.
    pub fn locator() -> LocatorConfig {
        LocatorConfig {
            base_url: "https://cdn.test".to_string(),
            ..LocatorConfig::default()
        }
    }

    /// Drain handle events into the session until quiescent.
    pub fn pump(&mut self) {
        loop {
            let events = self.session.media_mut().take_events();
            if events.is_empty() {
                return;
            }
            for (generation, event) in events {
                self.session.handle_media_event(generation, event);
            }
        }
    }

    /// Advance simulated playback in quarter-second ticks, delivering
    /// events as they appear.
    pub fn run_seconds(&mut self, seconds: f64) {
        let ticks = (seconds / 0.25).round() as u64;
        for _ in 0..ticks {
            self.session.media_mut().tick(0.25);
            self.pump();
        }
    }

    /// Locators loaded so far, oldest first.
    pub fn loads(&self) -> Vec<String> {
        self.session
            .media()
            .calls()
            .iter()
            .filter_map(|call| match call {
                ScriptedCall::Load(locator) => Some(locator.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Default for SessionFixture {
    fn default() -> Self {
        Self::new()
    }
}
