//! Game audio playback using kira and symphonia.
//!
//! This crate provides:
//! - [`Audio`]: the playback interface game code programs against
//! - [`AudioEngine`]: the implementation, generic over a [`Mixer`]
//! - [`AudioDriver`]: the kira-backed mixer for real output
//! - [`AudioKeyMap`]: the path-to-key cache shared by all playback
//! - [`decode_file`]: eager WAV/MP3/FLAC decoding via symphonia
//!
//! The host drives everything from a 60 Hz loop: call
//! [`Audio::update`] once per frame to advance fades and reap
//! finished instances. Nothing here spawns threads; kira does its own
//! mixing on the audio thread internally.

mod audio_driver;
mod config;
mod decode;
mod engine;
mod fade;
mod format;
mod keys;
mod mixer;
mod spatial;
mod traits;
mod volume;

#[cfg(test)]
mod test_utils;

pub use audio_driver::AudioDriver;
pub use config::AudioSettings;
pub use decode::{DecodedAudio, decode_file};
pub use engine::AudioEngine;
pub use format::AudioFormat;
pub use keys::{AudioKey, AudioKeyMap};
pub use mixer::{BufferId, InstanceId, InstanceState, Mixer};
pub use traits::{Audio, AudioAction, MusicFinished};
pub use volume::MAX_VOLUME;

use anyhow::Result;

/// Create an engine over the default audio device, boxed behind the
/// playback interface.
pub fn create_audio_engine() -> Result<Box<dyn Audio>> {
    Ok(Box::new(AudioEngine::new()?))
}

/// Same as [`create_audio_engine`] with explicit initial volumes.
pub fn create_audio_engine_with_settings(settings: AudioSettings) -> Result<Box<dyn Audio>> {
    Ok(Box::new(AudioEngine::with_settings(settings)?))
}
