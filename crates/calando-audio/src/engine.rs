//! The audio engine: key cache, music state machine, fades and
//! instance cleanup, generic over the mixing device.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use log::warn;

use crate::audio_driver::AudioDriver;
use crate::config::AudioSettings;
use crate::fade::{Fade, FadeStep};
use crate::format::AudioFormat;
use crate::keys::{AudioKey, AudioKeyMap};
use crate::mixer::{BufferId, InstanceId, InstanceState, Mixer};
use crate::spatial;
use crate::traits::{Audio, AudioAction, MusicFinished};
use crate::volume::{self, VOLUME_STEP};

/// A loaded buffer plus every instance spawned from it.
struct BufferRecord {
    buffer: BufferId,
    instances: Vec<InstanceId>,
}

/// State of the single current-music slot.
#[derive(Default)]
struct MusicState {
    key: Option<AudioKey>,
    instance: Option<InstanceId>,
    paused: bool,
    fade: Option<Fade>,
    finished: Option<MusicFinished>,
}

/// [`Audio`] implementation over a [`Mixer`].
///
/// All bookkeeping lives here; the mixer only decodes files and moves
/// samples. One instance at most is designated the current music, and
/// every other instance is treated as a sound effect.
pub struct AudioEngine<M: Mixer = AudioDriver> {
    mixer: M,
    keys: AudioKeyMap,
    buffers: HashMap<AudioKey, BufferRecord>,
    music: MusicState,
    music_gain: f32,
    sound_gain: f32,
}

impl AudioEngine<AudioDriver> {
    /// Engine over the default audio device.
    pub fn new() -> Result<Self> {
        Self::with_settings(AudioSettings::default())
    }

    pub fn with_settings(settings: AudioSettings) -> Result<Self> {
        Ok(Self::with_mixer_and_settings(AudioDriver::new()?, settings))
    }
}

impl<M: Mixer> AudioEngine<M> {
    /// Engine over a caller-supplied mixer.
    pub fn with_mixer(mixer: M) -> Self {
        Self::with_mixer_and_settings(mixer, AudioSettings::default())
    }

    pub fn with_mixer_and_settings(mixer: M, settings: AudioSettings) -> Self {
        Self {
            mixer,
            keys: AudioKeyMap::new(),
            buffers: HashMap::new(),
            music: MusicState::default(),
            music_gain: settings.music_gain(),
            sound_gain: settings.sound_gain(),
        }
    }

    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut M {
        &mut self.mixer
    }

    /// Buffer for a key, loading the file on first use.
    fn buffer_for(&mut self, key: AudioKey, path: &Path) -> Result<BufferId> {
        if let Some(record) = self.buffers.get(&key) {
            return Ok(record.buffer);
        }
        let buffer = self.mixer.load(path)?;
        self.buffers.insert(
            key,
            BufferRecord {
                buffer,
                instances: Vec::new(),
            },
        );
        Ok(buffer)
    }

    fn remove_instance(&mut self, instance: InstanceId) {
        for record in self.buffers.values_mut() {
            record.instances.retain(|&i| i != instance);
        }
    }

    /// Release every instance the mixer reports as stopped. If the
    /// current music is among them, the music slot is reset so no stale
    /// handle survives.
    fn cleanup_finished(&mut self) {
        let mut finished: Vec<InstanceId> = Vec::new();
        for record in self.buffers.values() {
            for &instance in &record.instances {
                if self.mixer.state(instance) == InstanceState::Stopped {
                    finished.push(instance);
                }
            }
        }
        if finished.is_empty() {
            return;
        }
        for &instance in &finished {
            self.mixer.release(instance);
        }
        for record in self.buffers.values_mut() {
            record.instances.retain(|i| !finished.contains(i));
        }
        if let Some(current) = self.music.instance {
            if finished.contains(&current) {
                self.music.instance = None;
                self.music.paused = false;
                self.music.fade = None;
            }
        }
    }

    /// Advance the music fade by one tick. On completion the gain snaps
    /// to the target; a fade to silence also stops the music and fires
    /// the finished handler.
    fn update_fade(&mut self) {
        let Some(instance) = self.music.instance else {
            self.music.fade = None;
            return;
        };
        let Some(fade) = self.music.fade.as_mut() else {
            return;
        };
        match fade.tick() {
            FadeStep::Running(gain) => self.mixer.set_gain(instance, gain),
            FadeStep::Finished(gain) => {
                self.music.fade = None;
                self.mixer.set_gain(instance, gain);
                if gain == 0.0 {
                    self.mixer.stop(instance);
                    if let Some(handler) = self.music.finished.as_mut() {
                        handler();
                    }
                }
            }
        }
    }

    fn replay_music(&mut self, instance: InstanceId) {
        if self.mixer.state(instance) != InstanceState::Stopped {
            self.mixer.seek_start(instance);
            self.mixer.resume(instance);
            self.music.paused = false;
            return;
        }
        // A stopped instance cannot be restarted; spawn a fresh one
        // from the cached buffer.
        self.mixer.release(instance);
        self.remove_instance(instance);
        self.music.instance = None;
        let Some(key) = self.music.key else { return };
        let Some(buffer) = self.buffers.get(&key).map(|r| r.buffer) else {
            return;
        };
        match self.mixer.spawn(buffer, self.music_gain, false) {
            Ok(fresh) => {
                if let Some(record) = self.buffers.get_mut(&key) {
                    record.instances.push(fresh);
                }
                self.music.instance = Some(fresh);
                self.music.paused = false;
            }
            Err(e) => warn!("failed to replay music: {e}"),
        }
    }

    fn apply_sound_action(&mut self, instance: InstanceId, action: AudioAction) {
        match action {
            AudioAction::Stop => self.mixer.stop(instance),
            AudioAction::Resume => self.mixer.resume(instance),
            AudioAction::Pause => self.mixer.pause(instance),
            AudioAction::Replay => {
                self.mixer.seek_start(instance);
                self.mixer.resume(instance);
            }
            AudioAction::Rewind => {
                self.mixer.seek_start(instance);
                self.mixer.pause(instance);
            }
            AudioAction::Mute => self.mixer.set_gain(instance, 0.0),
            // Unmute resets to full volume, not the gain the instance
            // had before muting.
            AudioAction::Unmute => self.mixer.set_gain(instance, 1.0),
            AudioAction::Loop => self.mixer.set_looping(instance, true),
            AudioAction::StopLoop => self.mixer.set_looping(instance, false),
            AudioAction::VolumeUp => {
                let gain = self.mixer.gain(instance);
                self.mixer.set_gain(instance, (gain + VOLUME_STEP).min(1.0));
            }
            AudioAction::VolumeDown => {
                let gain = self.mixer.gain(instance);
                self.mixer.set_gain(instance, (gain - VOLUME_STEP).max(0.0));
            }
        }
    }

    fn free_key(&mut self, key: AudioKey) {
        let Some(record) = self.buffers.remove(&key) else {
            return;
        };
        for instance in record.instances {
            self.mixer.stop(instance);
            self.mixer.release(instance);
        }
        self.mixer.unload(record.buffer);
        self.keys.forget(key);
        if self.music.key == Some(key) {
            self.music.key = None;
            self.music.instance = None;
            self.music.paused = false;
            self.music.fade = None;
        }
    }
}

impl<M: Mixer> Audio for AudioEngine<M> {
    fn play_music(&mut self, path: &Path) -> Result<AudioKey> {
        if let Some(instance) = self.music.instance.take() {
            self.mixer.stop(instance);
            self.mixer.release(instance);
            self.remove_instance(instance);
        }
        self.music.paused = false;
        self.music.fade = None;

        let key = self.keys.resolve(path);
        let buffer = self.buffer_for(key, path)?;
        let instance = self.mixer.spawn(buffer, self.music_gain, false)?;
        if let Some(record) = self.buffers.get_mut(&key) {
            record.instances.push(instance);
        }
        self.music.key = Some(key);
        self.music.instance = Some(instance);
        Ok(key)
    }

    fn play_sound_effect(&mut self, path: &Path) -> Result<AudioKey> {
        let key = self.keys.resolve(path);
        let buffer = self.buffer_for(key, path)?;
        let instance = self.mixer.spawn(buffer, self.sound_gain, false)?;
        if let Some(record) = self.buffers.get_mut(&key) {
            record.instances.push(instance);
        }
        self.cleanup_finished();
        Ok(key)
    }

    fn operate_current_music(&mut self, action: AudioAction) {
        let Some(instance) = self.music.instance else {
            return;
        };
        match action {
            AudioAction::Stop => {
                self.mixer.stop(instance);
                self.music.paused = false;
            }
            AudioAction::Resume => {
                self.mixer.resume(instance);
                self.music.paused = false;
            }
            AudioAction::Pause => {
                self.mixer.pause(instance);
                self.music.paused = true;
            }
            AudioAction::Replay => self.replay_music(instance),
            AudioAction::Rewind => {
                self.mixer.seek_start(instance);
                self.mixer.pause(instance);
                self.music.paused = true;
            }
            AudioAction::Mute => self.mixer.set_gain(instance, 0.0),
            AudioAction::Unmute => self.mixer.set_gain(instance, self.music_gain),
            AudioAction::Loop => self.mixer.set_looping(instance, true),
            AudioAction::StopLoop => self.mixer.set_looping(instance, false),
            AudioAction::VolumeUp => {
                self.music_gain = (self.music_gain + VOLUME_STEP).min(1.0);
                self.mixer.set_gain(instance, self.music_gain);
            }
            AudioAction::VolumeDown => {
                self.music_gain = (self.music_gain - VOLUME_STEP).max(0.0);
                self.mixer.set_gain(instance, self.music_gain);
            }
        }
    }

    fn operate_current_sounds(&mut self, action: AudioAction) {
        self.cleanup_finished();
        let music_instance = self.music.instance;
        let targets: Vec<InstanceId> = self
            .buffers
            .values()
            .flat_map(|record| record.instances.iter().copied())
            .filter(|&instance| Some(instance) != music_instance)
            .collect();
        for instance in targets {
            self.apply_sound_action(instance, action);
        }
    }

    fn fade_in_music(&mut self, path: &Path, looping: bool, fade: Duration) -> Result<AudioKey> {
        let key = self.play_music(path)?;
        if let Some(instance) = self.music.instance {
            self.mixer.set_gain(instance, 0.0);
            self.mixer.set_looping(instance, looping);
            self.music.fade = Some(Fade::new(0.0, self.music_gain, fade));
        }
        Ok(key)
    }

    fn fade_out_music(&mut self, fade: Duration) {
        if self.music.instance.is_some() {
            self.music.fade = Some(Fade::new(self.music_gain, 0.0, fade));
        }
    }

    fn free_music(&mut self, key: AudioKey) {
        self.free_key(key);
    }

    fn free_sound(&mut self, key: AudioKey) {
        self.free_key(key);
    }

    fn set_music_volume(&mut self, volume: i32) {
        self.music_gain = volume::gain_from_volume(volume);
        if let Some(instance) = self.music.instance {
            self.mixer.set_gain(instance, self.music_gain);
        }
    }

    fn music_volume(&self) -> i32 {
        match self.music.instance {
            Some(instance) => volume::volume_from_gain(self.mixer.gain(instance)),
            None => volume::volume_from_gain(self.music_gain),
        }
    }

    fn set_sound_volume(&mut self, path: &Path, volume: i32) {
        let gain = volume::gain_from_volume(volume);
        let Some(key) = self.keys.lookup(path) else {
            return;
        };
        let Some(record) = self.buffers.get(&key) else {
            return;
        };
        for &instance in &record.instances {
            self.mixer.set_gain(instance, gain);
        }
    }

    fn sound_volume(&self, path: &Path) -> i32 {
        let Some(key) = self.keys.lookup(path) else {
            return 0;
        };
        let Some(record) = self.buffers.get(&key) else {
            return 0;
        };
        match record.instances.first() {
            Some(&instance) => volume::volume_from_gain(self.mixer.gain(instance)),
            None => 0,
        }
    }

    fn max_volume(&self) -> i32 {
        volume::MAX_VOLUME
    }

    fn set_music_position(&mut self, x: f64, y: f64) {
        if let Some(instance) = self.music.instance {
            let params = spatial::position_params(x as f32, y as f32);
            self.mixer
                .set_position(instance, params.panning, params.attenuation);
        }
    }

    fn set_music_finished(&mut self, handler: Option<MusicFinished>) {
        self.music.finished = handler;
    }

    fn music_type(&self, path: &Path) -> AudioFormat {
        AudioFormat::from_path(path)
    }

    fn is_music_playing(&self) -> bool {
        self.music
            .instance
            .is_some_and(|i| self.mixer.state(i) == InstanceState::Playing)
    }

    fn is_music_paused(&self) -> bool {
        self.music.instance.is_some() && self.music.paused
    }

    fn is_music_fading(&self) -> bool {
        self.music.fade.is_some()
    }

    fn update(&mut self) {
        self.update_fade();
        self.cleanup_finished();
    }

    fn dispose(&mut self) {
        for (_, record) in self.buffers.drain() {
            for instance in record.instances {
                self.mixer.stop(instance);
                self.mixer.release(instance);
            }
            self.mixer.unload(record.buffer);
        }
        self.keys.clear();
        self.music.key = None;
        self.music.instance = None;
        self.music.paused = false;
        self.music.fade = None;
    }
}
