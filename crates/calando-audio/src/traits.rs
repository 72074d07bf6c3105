//! Public playback interface.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use crate::format::AudioFormat;
use crate::keys::AudioKey;

/// Actions applicable to the current music or to all live sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioAction {
    Stop,
    Resume,
    Pause,
    /// Restart from the beginning and play.
    Replay,
    /// Seek to the beginning and hold paused.
    Rewind,
    /// Silence without changing the stored volume.
    Mute,
    Unmute,
    Loop,
    StopLoop,
    /// Raise gain by one step, saturating at full volume.
    VolumeUp,
    /// Lower gain by one step, saturating at silence.
    VolumeDown,
}

/// Handler invoked when a fade-out completes and the music stops.
pub type MusicFinished = Box<dyn FnMut()>;

/// Playback interface for game code.
/// Implementation: AudioEngine (kira + symphonia).
///
/// The host calls `update` once per frame at 60 Hz; fades and instance
/// cleanup advance only there. All methods assume a single thread.
pub trait Audio {
    /// Start a file as the current music, replacing any previous music.
    /// The file is decoded on first play and cached under the returned key.
    fn play_music(&mut self, path: &Path) -> Result<AudioKey>;

    /// Play a file as a fire-and-forget sound effect. Instances of the
    /// same file may overlap.
    fn play_sound_effect(&mut self, path: &Path) -> Result<AudioKey>;

    /// Apply an action to the current music. No-op when no music is active.
    fn operate_current_music(&mut self, action: AudioAction);

    /// Apply an action to every live sound-effect instance. The current
    /// music is skipped.
    fn operate_current_sounds(&mut self, action: AudioAction);

    /// Start music silent and ramp to the music volume over `fade`.
    fn fade_in_music(&mut self, path: &Path, looping: bool, fade: Duration) -> Result<AudioKey>;

    /// Ramp the current music to silence over `fade`, then stop it and
    /// invoke the music-finished handler.
    fn fade_out_music(&mut self, fade: Duration);

    /// Stop and unload everything associated with the key, forgetting
    /// the key itself.
    fn free_music(&mut self, key: AudioKey);
    fn free_sound(&mut self, key: AudioKey);

    /// Set the music volume on the 0-100 scale, clamping.
    fn set_music_volume(&mut self, volume: i32);

    /// Current music volume, 0-100. Reads the live instance gain when
    /// music exists, so a muted track reports 0.
    fn music_volume(&self) -> i32;

    /// Set the gain of all live instances of a file, 0-100.
    fn set_sound_volume(&mut self, path: &Path, volume: i32);

    /// Volume of the first live instance of a file, 0-100; 0 when the
    /// file is unknown or has no instances.
    fn sound_volume(&self, path: &Path) -> i32;

    fn max_volume(&self) -> i32;

    /// Position the music in the stereo field, listener at the origin.
    fn set_music_position(&mut self, x: f64, y: f64);

    /// Install or clear the handler fired when a fade-out silences the
    /// music. The handler persists across tracks until replaced.
    fn set_music_finished(&mut self, handler: Option<MusicFinished>);

    /// Format of a file judged by its extension only.
    fn music_type(&self, path: &Path) -> AudioFormat;

    fn is_music_playing(&self) -> bool;
    fn is_music_paused(&self) -> bool;
    fn is_music_fading(&self) -> bool;

    /// Advance fades and reap finished instances. Call once per frame.
    fn update(&mut self);

    /// Stop everything and release all buffers and keys.
    fn dispose(&mut self);
}
