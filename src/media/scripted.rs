//! Deterministic scripted media handle
//!
//! A [`MediaHandle`] implementation that stands in for the platform's real
//! playable-media handle. Every load "buffers" instantly and reports a fixed
//! duration; playback advances only when the driver ticks it. Loads can be
//! scripted to fail with a specific error code and play requests to be
//! rejected, which is enough to exercise every transition of the session
//! state machine. Used by the interactive binary and by the test suites;
//! real decoding and networking are non-goals.

use super::{LoadGeneration, MediaEvent, MediaHandle, PlayAttempt};
use std::collections::{HashMap, VecDeque};

/// Commands the handle has received, recorded for assertions
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedCall {
    Load(String),
    Play,
    Pause,
    SetPosition(f64),
}

/// Scripted stand-in for the platform media handle
#[derive(Debug)]
pub struct ScriptedMedia {
    /// Duration reported for every successfully loaded resource.
    resource_duration: f64,

    /// Locators scripted to fail, with the error code they report.
    failing_locators: HashMap<String, u32>,

    /// If set, every play request is rejected with this reason.
    play_rejection: Option<String>,

    generation: LoadGeneration,
    loaded: Option<String>,
    playing: bool,
    position: f64,
    duration: Option<f64>,
    pending: VecDeque<(LoadGeneration, MediaEvent)>,
    calls: Vec<ScriptedCall>,
}

impl ScriptedMedia {
    /// Create a handle whose resources all have the given duration.
    pub fn new(resource_duration: f64) -> Self {
        Self {
            resource_duration,
            failing_locators: HashMap::new(),
            play_rejection: None,
            generation: LoadGeneration::initial(),
            loaded: None,
            playing: false,
            position: 0.0,
            duration: None,
            pending: VecDeque::new(),
            calls: Vec::new(),
        }
    }

    /// Script the given locator to fail with the given error code.
    pub fn fail_locator(&mut self, locator: impl Into<String>, code: u32) {
        self.failing_locators.insert(locator.into(), code);
    }

    /// Clear all scripted load failures.
    pub fn allow_all_loads(&mut self) {
        self.failing_locators.clear();
    }

    /// Reject all play requests with the given reason.
    pub fn reject_play(&mut self, reason: impl Into<String>) {
        self.play_rejection = Some(reason.into());
    }

    /// Accept play requests again.
    pub fn allow_play(&mut self) {
        self.play_rejection = None;
    }

    /// Generation of the most recent load.
    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    /// Advance simulated playback by `dt` seconds.
    ///
    /// While playing, emits a time report, and the ended signal when the
    /// end of the resource is reached.
    pub fn tick(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        let duration = match self.duration {
            Some(duration) => duration,
            None => return,
        };
        self.position = (self.position + dt).min(duration);
        self.emit(MediaEvent::TimeReported(self.position));
        if self.position >= duration {
            self.playing = false;
            self.emit(MediaEvent::Ended);
        }
    }

    /// Drain events emitted since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<(LoadGeneration, MediaEvent)> {
        self.pending.drain(..).collect()
    }

    /// Commands received so far, oldest first.
    pub fn calls(&self) -> &[ScriptedCall] {
        &self.calls
    }

    /// Locator of the currently loaded resource.
    pub fn loaded_locator(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    /// Inject an event tagged with the current generation.
    ///
    /// Lets tests script signals the normal command flow does not produce,
    /// e.g. an adapter-initiated pause or a mid-playback error.
    pub fn emit(&mut self, event: MediaEvent) {
        self.pending.push_back((self.generation, event));
    }
}

impl MediaHandle for ScriptedMedia {
    fn load(&mut self, locator: &str) {
        self.calls.push(ScriptedCall::Load(locator.to_string()));
        self.generation = self.generation.next();
        self.loaded = Some(locator.to_string());
        self.playing = false;
        self.position = 0.0;
        self.duration = None;

        self.emit(MediaEvent::LoadStarted);
        if let Some(&code) = self.failing_locators.get(locator) {
            self.emit(MediaEvent::ErrorReported(Some(code)));
            return;
        }
        self.duration = Some(self.resource_duration);
        self.emit(MediaEvent::DurationKnown(self.resource_duration));
        self.emit(MediaEvent::BufferedEnoughToPlay);
    }

    fn play(&mut self) -> PlayAttempt {
        self.calls.push(ScriptedCall::Play);
        if self.loaded.is_none() {
            return PlayAttempt::Rejected("no resource loaded".to_string());
        }
        if let Some(reason) = &self.play_rejection {
            return PlayAttempt::Rejected(reason.clone());
        }
        if !self.playing {
            self.playing = true;
            self.emit(MediaEvent::PlaybackStarted);
        }
        PlayAttempt::Started
    }

    fn pause(&mut self) {
        self.calls.push(ScriptedCall::Pause);
        if self.playing {
            self.playing = false;
            self.emit(MediaEvent::PlaybackPaused);
        }
    }

    fn set_position(&mut self, seconds: f64) {
        self.calls.push(ScriptedCall::SetPosition(seconds));
        let clamped = match self.duration {
            Some(duration) => seconds.clamp(0.0, duration),
            None => seconds.max(0.0),
        };
        self.position = clamped;
        self.emit(MediaEvent::TimeReported(clamped));
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }
}
