//! Playback session module for Lectio
//!
//! This module owns the position and playback state machine: the current
//! (version, book, chapter) position, the transport metrics, and the
//! lifecycle of the underlying media handle. Views never hold navigation or
//! transport logic; they read the session through [`SessionView`] and
//! [`SessionObserver`] and drive it through [`SessionCommands`].

mod session;
mod transport;

pub use session::PlaybackSession;
pub use transport::{ScrubMode, SkipAction, Transport, TransportMetrics};

use crate::media::MediaError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Playback state
///
/// Owned exclusively by the session controller; views are read-only
/// observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No load in progress and nothing playable.
    Idle,

    /// A locator has been handed to the media handle; buffering.
    Loading,

    /// Enough data buffered to play.
    Ready,

    /// Currently playing.
    Playing,

    /// Playback paused.
    Paused,

    /// End of the chapter reached.
    Ended,

    /// A media error occurred; explicit retry or navigation required.
    Error,
}

/// The current reading position
///
/// Invariant: `1 <= chapter <= chapter count of book`. Mutated only by the
/// session controller in response to navigation or error-recovery
/// decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Translation identifier, e.g. "kjv".
    pub version: String,

    /// Canonical book name, resolvable in the canon index.
    pub book: String,

    /// 1-based chapter number.
    pub chapter: u32,
}

/// Whether reaching `Ready` starts playback automatically
///
/// Observed deployments disagree on this, so it is policy, not behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoplayPolicy {
    /// Always start playing once enough data is buffered.
    Always,

    /// Start only if playback was intended: an explicit pause sticks
    /// across chapter reloads until the next explicit play.
    WhenPlaybackIntended,

    /// Never start automatically; wait for an explicit play command.
    Never,
}

impl FromStr for AutoplayPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(AutoplayPolicy::Always),
            "when-playback-intended" => Ok(AutoplayPolicy::WhenPlaybackIntended),
            "never" => Ok(AutoplayPolicy::Never),
            other => Err(format!("unknown autoplay policy '{}'", other)),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Autoplay-on-ready policy.
    pub autoplay: AutoplayPolicy,

    /// Scrub commit protocol.
    pub scrub_mode: ScrubMode,

    /// Fixed fast-forward/rewind interval in seconds.
    pub skip_interval_secs: f64,

    /// Below this position a rewind retreats to the previous chapter
    /// instead of micro-seeking toward a zero the reported time never
    /// exactly reaches.
    pub rewind_tolerance_secs: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autoplay: AutoplayPolicy::Always,
            scrub_mode: ScrubMode::CommitOnRelease,
            skip_interval_secs: 10.0,
            rewind_tolerance_secs: 0.25,
        }
    }
}

/// Change notification pushed to session observers
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The playback state changed.
    StateChanged(PlaybackState),

    /// The reading position changed.
    PositionChanged(Position),

    /// The chapter duration became known, in seconds.
    DurationChanged(f64),

    /// The displayed playback time changed, in seconds.
    TimeChanged(f64),

    /// A media error was classified and stored.
    ErrorRaised(MediaError),

    /// The stored error was cleared by navigation, retry or dismissal.
    ErrorCleared,
}

/// Read-only view of the session state, cheap to clone
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub position: Position,
    pub state: PlaybackState,
    pub metrics: TransportMetrics,
    pub last_error: Option<MediaError>,
}

/// Observer of session change notifications
pub trait SessionObserver: Send {
    fn on_event(&mut self, event: &SessionEvent);
}

/// The session's read-only observable surface
pub trait SessionView {
    fn snapshot(&self) -> SessionSnapshot;
}

/// The command surface views drive the session through
///
/// Every operation that changes the position re-derives the resource
/// locator and reloads the media handle before any play is attempted.
pub trait SessionCommands {
    /// Navigate to chapter 1 of the named book.
    fn go_to_book(&mut self, name: &str);

    /// Navigate to a chapter of the current book.
    fn go_to_chapter(&mut self, chapter: u32);

    /// Navigate to an arbitrary (book, chapter) position.
    fn go_to_position(&mut self, book: &str, chapter: u32);

    /// Advance one chapter, wrapping at the end of the canon.
    fn advance(&mut self);

    /// Retreat one chapter, wrapping at the start of the canon.
    fn retreat(&mut self);

    /// Switch translation and reload the current chapter.
    fn select_version(&mut self, version: &str);

    /// Request playback to start.
    fn play(&mut self);

    /// Request playback to pause.
    fn pause(&mut self);

    /// Toggle between playing and paused.
    fn play_pause(&mut self);

    /// Seek to an absolute time in seconds.
    fn seek(&mut self, seconds: f64);

    /// Begin a scrub gesture.
    fn begin_scrub(&mut self);

    /// Report a scrub drag position.
    fn scrub_to(&mut self, seconds: f64);

    /// End a scrub gesture, committing the final position.
    fn end_scrub(&mut self, seconds: f64);

    /// Skip forward by the configured interval, advancing a chapter when
    /// the skip would pass the end.
    fn fast_forward(&mut self);

    /// Skip backward by the configured interval, retreating a chapter when
    /// already at the start.
    fn rewind(&mut self);

    /// Reload the current position after an error.
    fn retry(&mut self);

    /// Clear a displayed error without reloading.
    fn dismiss_error(&mut self);
}
