//! Lectio - a scripture audio-playback navigator
//!
//! Lectio walks a listener through the fixed 66-book canon one chapter at a
//! time, streaming one audio resource per chapter through a platform-provided
//! playable-media handle. The crate owns the reading position, the playback
//! state machine, wraparound chapter/book navigation, and the reconciliation
//! of user scrubbing with the handle's continuous time reports. Audio
//! decoding and networking live behind the [`media::MediaHandle`] seam and
//! are out of scope here.

pub mod canon;
pub mod media;
pub mod player;
pub mod utils;
