//! Playback seam between the engine and the audio device.

use std::path::Path;

use anyhow::Result;

/// Handle for a loaded, decoded sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// Handle for one playback of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub u64);

/// Coarse playback state of an instance.
///
/// Unknown instances report `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Playing,
    Paused,
    Stopped,
}

/// Abstraction over the mixing device.
/// Implementations: AudioDriver (kira), MockMixer (testing).
///
/// Control calls on unknown instances are silently ignored; only
/// loading and spawning can fail.
pub trait Mixer {
    /// Decode a file and register it for playback.
    fn load(&mut self, path: &Path) -> Result<BufferId>;

    /// Drop a buffer. Instances already spawned from it keep playing;
    /// release them first if they should not.
    fn unload(&mut self, buffer: BufferId);

    /// Start a new playback of a buffer.
    fn spawn(&mut self, buffer: BufferId, gain: f32, looping: bool) -> Result<InstanceId>;

    fn pause(&mut self, instance: InstanceId);
    fn resume(&mut self, instance: InstanceId);
    fn stop(&mut self, instance: InstanceId);

    /// Seek back to the start without changing play state.
    fn seek_start(&mut self, instance: InstanceId);

    /// Set instance gain (0.0..=1.0).
    fn set_gain(&mut self, instance: InstanceId, gain: f32);

    /// Last gain set on the instance; 0.0 for unknown instances.
    fn gain(&self, instance: InstanceId) -> f32;

    fn set_looping(&mut self, instance: InstanceId, looping: bool);

    /// Apply stereo pan (-1.0..=1.0) and a distance attenuation
    /// multiplied into the instance gain.
    fn set_position(&mut self, instance: InstanceId, panning: f32, attenuation: f32);

    fn state(&self, instance: InstanceId) -> InstanceState;

    /// Stop the instance and discard its handle.
    fn release(&mut self, instance: InstanceId);
}
