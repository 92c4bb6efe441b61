//! Classification of media handle error codes
//!
//! The playable-media handle reports failures as a small numeric code.
//! Classification maps that code onto a stable category; the session stores
//! the classified error and surfaces its message to the user. The mapping is
//! a pure, total function over all integers: anything outside the known
//! range, and an absent code, classify as `Unknown`.

use std::fmt;

/// Stable category of a media failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaErrorKind {
    /// Playback was interrupted, not by the network (codes 1 and 3).
    Aborted,

    /// Fetching or streaming the resource failed (code 2).
    NetworkFailure,

    /// The resource is missing or cannot be decoded (code 4).
    MediaUnsupportedOrNotFound,

    /// Unclassified code, or the handle reported no error object.
    Unknown,
}

/// A classified media failure, keeping the raw code for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaError {
    pub kind: MediaErrorKind,
    pub code: Option<u32>,
}

impl MediaError {
    /// Classify a raw error code from the media handle.
    pub fn classify(code: Option<u32>) -> Self {
        let kind = match code {
            Some(1) | Some(3) => MediaErrorKind::Aborted,
            Some(2) => MediaErrorKind::NetworkFailure,
            Some(4) => MediaErrorKind::MediaUnsupportedOrNotFound,
            _ => MediaErrorKind::Unknown,
        };
        Self { kind, code }
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.code) {
            (MediaErrorKind::Aborted, Some(code)) => {
                write!(f, "The audio playback was aborted. (Error code {})", code)
            }
            (MediaErrorKind::NetworkFailure, Some(code)) => {
                write!(f, "Network error. (Error code {})", code)
            }
            (MediaErrorKind::MediaUnsupportedOrNotFound, Some(code)) => {
                write!(f, "The audio could not be loaded. (Error code {})", code)
            }
            _ => write!(f, "An unknown error occurred. Please try again later."),
        }
    }
}
