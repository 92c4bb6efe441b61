//! Playback session controller
//!
//! The session is the single owner of the reading position, the playback
//! state and the media handle. It is a reactive state machine: user
//! commands ([`SessionCommands`]) and media events arrive on one logical
//! thread of control, and every transition happens inside `&mut self` with
//! no locking. A position change always re-derives the resource locator and
//! reloads the handle before any play is attempted; a new load supersedes
//! the previous one, and events from superseded loads are dropped by
//! generation tag.

use crate::canon::{self, Canon};
use crate::media::{
    LoadGeneration, LocatorConfig, MediaError, MediaEvent, MediaHandle, PlayAttempt,
};
use crate::player::{
    AutoplayPolicy, PlaybackState, Position, SessionCommands, SessionConfig, SessionEvent,
    SessionObserver, SessionSnapshot, SessionView, SkipAction, Transport,
};
use log::{debug, error, info, warn};
use std::sync::Arc;

/// The position and playback session state machine
pub struct PlaybackSession<M: MediaHandle> {
    canon: Arc<Canon>,
    media: M,
    locator: LocatorConfig,
    config: SessionConfig,

    position: Position,
    state: PlaybackState,
    transport: Transport,
    generation: LoadGeneration,

    /// Whether playback is currently desired. Cleared by an explicit
    /// pause, set by an explicit play; consulted by the
    /// `WhenPlaybackIntended` autoplay policy.
    intend_playback: bool,

    last_error: Option<MediaError>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl<M: MediaHandle> PlaybackSession<M> {
    /// Create a session at the default position: first book, chapter 1,
    /// the locator's default version. Nothing is loaded until [`start`]
    /// or a navigation command is issued.
    ///
    /// [`start`]: PlaybackSession::start
    pub fn new(canon: Arc<Canon>, media: M, locator: LocatorConfig, config: SessionConfig) -> Self {
        let position = Position {
            version: locator.version.clone(),
            book: canon.first().name.clone(),
            chapter: 1,
        };
        let transport = Transport::new(config.scrub_mode);
        Self {
            canon,
            media,
            locator,
            config,
            position,
            state: PlaybackState::Idle,
            transport,
            generation: LoadGeneration::initial(),
            intend_playback: true,
            last_error: None,
            observers: Vec::new(),
        }
    }

    /// Issue the initial load for the starting position.
    pub fn start(&mut self) {
        self.reload();
    }

    /// Subscribe to change notifications.
    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current reading position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Last classified media error, if the session is in `Error`.
    pub fn last_error(&self) -> Option<MediaError> {
        self.last_error
    }

    /// Generation of the most recent load issued to the handle.
    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    /// The media handle, read-only.
    pub fn media(&self) -> &M {
        &self.media
    }

    /// Exclusive access to the media handle for the host's event pump.
    /// Views never touch the handle; they go through the command surface.
    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    /// Deliver one media event tagged with the generation in effect when
    /// the handle emitted it. Events from superseded loads are dropped.
    pub fn handle_media_event(&mut self, generation: LoadGeneration, event: MediaEvent) {
        if generation != self.generation {
            debug!(
                "Dropping {:?} from superseded load {} (current {})",
                event, generation, self.generation
            );
            return;
        }

        match event {
            MediaEvent::LoadStarted => {
                self.set_state(PlaybackState::Loading);
            }

            MediaEvent::DurationKnown(duration) => {
                self.transport.set_duration(duration);
                self.notify(SessionEvent::DurationChanged(duration));
            }

            MediaEvent::BufferedEnoughToPlay => {
                if self.state == PlaybackState::Loading {
                    self.set_state(PlaybackState::Ready);
                    if self.should_autoplay() {
                        self.attempt_play();
                    }
                }
            }

            MediaEvent::TimeReported(seconds) => {
                if self.transport.report_time(seconds) {
                    self.notify(SessionEvent::TimeChanged(seconds));
                }
            }

            // The handle is the source of truth for actual playback
            // status; the session mirrors it.
            MediaEvent::PlaybackStarted => {
                if matches!(self.state, PlaybackState::Ready | PlaybackState::Paused) {
                    self.set_state(PlaybackState::Playing);
                }
            }

            MediaEvent::PlaybackPaused => {
                if self.state == PlaybackState::Playing {
                    self.set_state(PlaybackState::Paused);
                }
            }

            // Natural completion auto-advances; this is the one transition
            // that navigates without a user command.
            MediaEvent::Ended => {
                if self.state == PlaybackState::Playing {
                    self.set_state(PlaybackState::Ended);
                    self.advance();
                }
            }

            MediaEvent::ErrorReported(code) => {
                let media_error = MediaError::classify(code);
                error!(
                    "Media error on {} {}: {}",
                    self.position.book, self.position.chapter, media_error
                );
                self.last_error = Some(media_error);
                self.set_state(PlaybackState::Error);
                self.notify(SessionEvent::ErrorRaised(media_error));
            }
        }
    }

    /// Derive the locator for the current position and reload the handle.
    ///
    /// The position is already final when this runs; no load is ever
    /// issued against a stale position. Bumping the generation first makes
    /// the previous load's late events unroutable.
    fn reload(&mut self) {
        let locator =
            self.locator
                .locator(&self.position.version, &self.position.book, self.position.chapter);
        self.generation = self.generation.next();
        self.transport.reset();
        if self.last_error.take().is_some() {
            self.notify(SessionEvent::ErrorCleared);
        }
        self.set_state(PlaybackState::Loading);
        info!(
            "Loading {} {} ({}): {}",
            self.position.book, self.position.chapter, self.position.version, locator
        );
        self.media.load(&locator);
    }

    fn set_position(&mut self, book: String, chapter: u32) {
        self.position.book = book;
        self.position.chapter = chapter;
        self.notify(SessionEvent::PositionChanged(self.position.clone()));
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            info!("Playback state changed to: {:?}", state);
            self.notify(SessionEvent::StateChanged(state));
        }
    }

    fn should_autoplay(&self) -> bool {
        match self.config.autoplay {
            AutoplayPolicy::Always => true,
            AutoplayPolicy::WhenPlaybackIntended => self.intend_playback,
            AutoplayPolicy::Never => false,
        }
    }

    /// Ask the handle to start playing. A rejection is a non-fatal, logged
    /// condition; actual state changes arrive as handle events.
    fn attempt_play(&mut self) {
        match self.media.play() {
            PlayAttempt::Started => {}
            PlayAttempt::Rejected(reason) => warn!("Play request rejected: {}", reason),
        }
    }

    fn notify(&mut self, event: SessionEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }

    fn seek_allowed(&self) -> bool {
        matches!(
            self.state,
            PlaybackState::Ready
                | PlaybackState::Playing
                | PlaybackState::Paused
                | PlaybackState::Ended
        )
    }
}

impl<M: MediaHandle> SessionView for PlaybackSession<M> {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            position: self.position.clone(),
            state: self.state,
            metrics: self.transport.metrics(),
            last_error: self.last_error,
        }
    }
}

impl<M: MediaHandle> SessionCommands for PlaybackSession<M> {
    fn go_to_book(&mut self, name: &str) {
        self.go_to_position(name, 1);
    }

    fn go_to_chapter(&mut self, chapter: u32) {
        let book = self.position.book.clone();
        self.go_to_position(&book, chapter);
    }

    fn go_to_position(&mut self, book: &str, chapter: u32) {
        // An unknown book silently degrades to the start of the canon;
        // it is not an error state.
        let (name, chapters) = match self.canon.lookup(book) {
            Some(entry) => (entry.name.clone(), entry.chapters),
            None => {
                debug!("Unknown book '{}', falling back to start of canon", book);
                let first = self.canon.first();
                (first.name.clone(), first.chapters)
            }
        };
        let chapter = chapter.clamp(1, chapters);
        self.set_position(name, chapter);
        self.reload();
    }

    fn advance(&mut self) {
        let (entry, chapter) =
            canon::next_position(&self.canon, &self.position.book, self.position.chapter);
        let name = entry.name.clone();
        self.set_position(name, chapter);
        self.reload();
    }

    fn retreat(&mut self) {
        let (entry, chapter) =
            canon::previous_position(&self.canon, &self.position.book, self.position.chapter);
        let name = entry.name.clone();
        self.set_position(name, chapter);
        self.reload();
    }

    fn select_version(&mut self, version: &str) {
        self.position.version = version.to_string();
        self.notify(SessionEvent::PositionChanged(self.position.clone()));
        self.reload();
    }

    fn play(&mut self) {
        match self.state {
            PlaybackState::Idle | PlaybackState::Error => {
                debug!("Ignoring play in {:?}", self.state);
            }
            PlaybackState::Loading => {
                // Remember the intent; autoplay resolves it on ready
                self.intend_playback = true;
            }
            PlaybackState::Playing => {}
            PlaybackState::Ready | PlaybackState::Paused | PlaybackState::Ended => {
                self.intend_playback = true;
                self.attempt_play();
            }
        }
    }

    fn pause(&mut self) {
        self.intend_playback = false;
        self.media.pause();
    }

    fn play_pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    fn seek(&mut self, seconds: f64) {
        if !self.seek_allowed() {
            debug!("Ignoring seek in {:?}", self.state);
            return;
        }
        self.transport.note_seek(seconds);
        let target = self.transport.metrics().current_time;
        self.media.set_position(target);
        self.notify(SessionEvent::TimeChanged(target));
    }

    fn begin_scrub(&mut self) {
        if self.seek_allowed() {
            self.transport.begin_scrub();
        }
    }

    fn scrub_to(&mut self, seconds: f64) {
        if !self.seek_allowed() {
            return;
        }
        if let Some(target) = self.transport.scrub_to(seconds) {
            self.media.set_position(target);
        }
        self.notify(SessionEvent::TimeChanged(self.transport.metrics().current_time));
    }

    fn end_scrub(&mut self, seconds: f64) {
        if !self.seek_allowed() {
            return;
        }
        if let Some(target) = self.transport.end_scrub(seconds) {
            self.media.set_position(target);
            self.notify(SessionEvent::TimeChanged(target));
        }
    }

    fn fast_forward(&mut self) {
        if self.state == PlaybackState::Loading {
            return;
        }
        match self.transport.skip_forward(self.config.skip_interval_secs) {
            Some(SkipAction::Seek(target)) => self.seek(target),
            Some(SkipAction::CrossBoundary) => self.advance(),
            None => debug!("Ignoring fast-forward before duration is known"),
        }
    }

    fn rewind(&mut self) {
        if self.state == PlaybackState::Loading {
            return;
        }
        match self
            .transport
            .skip_back(self.config.skip_interval_secs, self.config.rewind_tolerance_secs)
        {
            SkipAction::Seek(target) => self.seek(target),
            SkipAction::CrossBoundary => self.retreat(),
        }
    }

    fn retry(&mut self) {
        self.reload();
    }

    fn dismiss_error(&mut self) {
        if self.state == PlaybackState::Error {
            self.last_error = None;
            self.notify(SessionEvent::ErrorCleared);
            self.set_state(PlaybackState::Idle);
        }
    }
}
