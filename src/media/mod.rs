//! Media resource boundary for Lectio
//!
//! This module defines the seam between the playback session and the
//! platform's playable-media handle: the [`MediaHandle`] capability trait,
//! the closed set of [`MediaEvent`]s the handle reports back, the
//! [`PlayAttempt`] result of an asynchronous play request, and the
//! classification of the handle's numeric error codes. The handle itself
//! (decoding, buffering, networking) is provided by the host platform and
//! assumed correct; Lectio only drives it.

mod error;
mod locator;
mod scripted;

pub use error::{MediaError, MediaErrorKind};
pub use locator::{book_slug, LocatorConfig, SlugStyle};
pub use scripted::{ScriptedCall, ScriptedMedia};

/// Identifier for one load issued to the media handle
///
/// Each reload bumps the generation; events are tagged with the generation
/// current when the handle emitted them, so the session can drop reports
/// that belong to a superseded load (last-write-wins reload semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadGeneration(u64);

impl LoadGeneration {
    /// Generation before any load has been issued.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Generation of the load following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for LoadGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of an asynchronous play request
///
/// The platform exposes starting playback as an operation that can resolve
/// or reject (autoplay restrictions, transient device state). The session
/// inspects the outcome instead of firing and forgetting: a rejection is a
/// non-fatal, logged condition, not an error state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayAttempt {
    /// The handle accepted the request; a `PlaybackStarted` event follows.
    Started,

    /// The handle declined to start playback.
    Rejected(String),
}

/// Asynchronous events reported by the media handle
///
/// This is the closed set the session state machine consumes; platform
/// event names map onto it at the adapter edge (buffered-enough maps from
/// the platform's "can play through" signal, and an abort is reported as
/// `ErrorReported` with the aborted error code).
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The handle began fetching the current locator.
    LoadStarted,

    /// Enough data is buffered to begin playback.
    BufferedEnoughToPlay,

    /// Total duration of the resource became known, in seconds.
    DurationKnown(f64),

    /// Continuous position report, in seconds.
    TimeReported(f64),

    /// Actual playback started (the handle is the source of truth).
    PlaybackStarted,

    /// Actual playback paused.
    PlaybackPaused,

    /// Playback reached the end of the resource.
    Ended,

    /// The handle failed; the code is classified by [`MediaError::classify`].
    ErrorReported(Option<u32>),
}

/// Capability contract of the platform's playable-media handle
///
/// One handle exists per session and is exclusively owned and mutated by
/// the session controller. All methods are non-blocking; readiness,
/// duration, time and errors arrive as [`MediaEvent`]s tagged with the
/// [`LoadGeneration`] in effect when the handle emitted them.
pub trait MediaHandle: Send {
    /// Point the handle at a new resource locator and begin loading it.
    ///
    /// Loading a new locator supersedes any load in flight; the handle is
    /// not required to cancel it, only to tag subsequent events with the
    /// new generation.
    fn load(&mut self, locator: &str);

    /// Request playback to start.
    fn play(&mut self) -> PlayAttempt;

    /// Request playback to pause.
    fn pause(&mut self);

    /// Seek to the given position in seconds.
    fn set_position(&mut self, seconds: f64);

    /// Current playback position in seconds.
    fn position(&self) -> f64;

    /// Total duration in seconds, unknown until metadata has loaded.
    fn duration(&self) -> Option<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_ordering() {
        let first = LoadGeneration::initial();
        let second = first.next();
        assert!(second > first);
        assert_ne!(first, second);
        assert_eq!(second, first.next());
        assert_eq!(format!("{}", second), "#1");
    }

    #[test]
    fn test_play_attempt_carries_reason() {
        let attempt = PlayAttempt::Rejected("autoplay blocked".to_string());
        assert!(matches!(attempt, PlayAttempt::Rejected(ref r) if r == "autoplay blocked"));
    }
}
