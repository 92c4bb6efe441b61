//! Time and scrub coordination
//!
//! The transport reconciles two writers of the displayed playback time: the
//! media handle's continuous position reports, and user-driven seek
//! gestures. A drag in progress must not be clobbered by a report, and a
//! seek in flight must not be overwritten by a stale report that predates
//! it. The transport also decides fixed-interval skips, turning a skip that
//! would leave the chapter into a boundary crossing instead of an
//! out-of-range seek.
//!
//! The shape mirrors the rest of the player: the coordinator owns the
//! metrics and returns directives ([`SkipAction`], seek targets) that the
//! session executes against the media handle.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A report within this window of a pending seek target counts as the
/// handle having settled at the target.
const SEEK_SETTLE_WINDOW: f64 = 0.5;

/// Scrub commit protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrubMode {
    /// Drags move only the displayed value; one seek is issued on release.
    CommitOnRelease,

    /// Every drag delta issues a seek immediately.
    Continuous,
}

impl FromStr for ScrubMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commit-on-release" => Ok(ScrubMode::CommitOnRelease),
            "continuous" => Ok(ScrubMode::Continuous),
            other => Err(format!("unknown scrub mode '{}'", other)),
        }
    }
}

/// Transport metrics exposed to views
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportMetrics {
    /// Chapter duration in seconds, unknown until metadata has loaded.
    pub duration: Option<f64>,

    /// Displayed playback time in seconds. While scrubbing this is the
    /// pending drag value, not the handle's report.
    pub current_time: f64,

    /// Whether a scrub gesture is in progress.
    pub is_scrubbing: bool,
}

impl Default for TransportMetrics {
    fn default() -> Self {
        Self {
            duration: None,
            current_time: 0.0,
            is_scrubbing: false,
        }
    }
}

/// Decision for a fixed-interval skip
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipAction {
    /// In-range seek to the given time.
    Seek(f64),

    /// The skip would leave the chapter; advance or retreat instead.
    CrossBoundary,
}

/// Coordinator for time reports, scrub gestures and interval skips
#[derive(Debug)]
pub struct Transport {
    metrics: TransportMetrics,
    mode: ScrubMode,
    pending_seek: Option<f64>,
}

impl Transport {
    pub fn new(mode: ScrubMode) -> Self {
        Self {
            metrics: TransportMetrics::default(),
            mode,
            pending_seek: None,
        }
    }

    pub fn metrics(&self) -> TransportMetrics {
        self.metrics
    }

    pub fn mode(&self) -> ScrubMode {
        self.mode
    }

    /// Forget everything tied to the previous resource. Called on reload.
    pub fn reset(&mut self) {
        self.metrics = TransportMetrics::default();
        self.pending_seek = None;
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.metrics.duration = Some(duration);
    }

    /// Accept or suppress a continuous position report from the handle.
    ///
    /// Returns whether the report became the displayed time. Reports are
    /// suppressed while a drag is in progress, and while a seek is pending
    /// until a report lands near its target.
    pub fn report_time(&mut self, seconds: f64) -> bool {
        if self.metrics.is_scrubbing {
            return false;
        }
        if let Some(target) = self.pending_seek {
            if (seconds - target).abs() > SEEK_SETTLE_WINDOW {
                return false;
            }
            self.pending_seek = None;
        }
        self.metrics.current_time = seconds.max(0.0);
        true
    }

    /// Record a session-issued seek so stale reports cannot undo it.
    pub fn note_seek(&mut self, seconds: f64) {
        let target = self.clamp_to_duration(seconds);
        self.metrics.current_time = target;
        self.pending_seek = Some(target);
    }

    /// Begin a scrub gesture. Suppression only exists in commit-on-release
    /// mode; continuous mode needs no suppression state.
    pub fn begin_scrub(&mut self) {
        if self.mode == ScrubMode::CommitOnRelease {
            self.metrics.is_scrubbing = true;
        }
    }

    /// Report a drag position. Returns a seek target to issue now, if the
    /// protocol seeks continuously.
    pub fn scrub_to(&mut self, seconds: f64) -> Option<f64> {
        let target = self.clamp_to_duration(seconds);
        match self.mode {
            ScrubMode::CommitOnRelease => {
                self.metrics.current_time = target;
                None
            }
            ScrubMode::Continuous => {
                self.note_seek(target);
                Some(target)
            }
        }
    }

    /// End a scrub gesture at the given position. Returns the seek target
    /// to commit.
    pub fn end_scrub(&mut self, seconds: f64) -> Option<f64> {
        self.metrics.is_scrubbing = false;
        let target = self.clamp_to_duration(seconds);
        self.note_seek(target);
        Some(target)
    }

    /// Decide a fixed-interval skip forward.
    ///
    /// `None` while the duration is unknown: without a known end there is
    /// no safe in-range target and no basis for a boundary crossing.
    pub fn skip_forward(&self, interval: f64) -> Option<SkipAction> {
        let duration = self.metrics.duration?;
        if self.metrics.current_time + interval < duration {
            Some(SkipAction::Seek(self.metrics.current_time + interval))
        } else {
            Some(SkipAction::CrossBoundary)
        }
    }

    /// Decide a fixed-interval skip backward.
    ///
    /// At or below `tolerance` the position counts as "already at start"
    /// and the skip becomes a boundary crossing; reported times hover just
    /// above zero and would otherwise micro-rewind forever.
    pub fn skip_back(&self, interval: f64, tolerance: f64) -> SkipAction {
        let current = self.metrics.current_time;
        if current <= tolerance {
            SkipAction::CrossBoundary
        } else if current <= interval {
            SkipAction::Seek(0.0)
        } else {
            SkipAction::Seek(current - interval)
        }
    }

    fn clamp_to_duration(&self, seconds: f64) -> f64 {
        match self.metrics.duration {
            Some(duration) => seconds.clamp(0.0, duration),
            None => seconds.max(0.0),
        }
    }
}
