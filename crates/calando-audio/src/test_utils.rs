//! Test utilities: a recording mixer so engine behavior can be checked
//! without an audio device.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use crate::mixer::{BufferId, InstanceId, InstanceState, Mixer};

/// What the mock knows about one spawned instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MockInstance {
    pub buffer: BufferId,
    pub gain: f32,
    pub looping: bool,
    pub state: InstanceState,
    pub panning: f32,
    pub attenuation: f32,
    /// Number of seek-to-start calls received.
    pub seeks: usize,
}

/// In-memory [`Mixer`] that records every call.
///
/// `load` succeeds without touching the filesystem unless `fail_loads`
/// is set. Instances keep their entry until released, so tests can
/// inspect the final state of each one.
#[derive(Debug, Default)]
pub struct MockMixer {
    next_buffer: u64,
    next_instance: u64,
    pub fail_loads: bool,
    pub loaded: HashMap<BufferId, PathBuf>,
    pub unloaded: Vec<BufferId>,
    pub instances: HashMap<InstanceId, MockInstance>,
    pub released: Vec<InstanceId>,
}

impl MockMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The only live instance; panics unless exactly one exists.
    pub fn only_instance(&self) -> InstanceId {
        assert_eq!(self.instances.len(), 1, "expected exactly one instance");
        *self.instances.keys().next().unwrap()
    }

    /// Number of live instances currently in the given state.
    pub fn count_in_state(&self, state: InstanceState) -> usize {
        self.instances.values().filter(|i| i.state == state).count()
    }

    /// Force an instance's reported state, e.g. to simulate a sound
    /// reaching its natural end.
    pub fn finish(&mut self, instance: InstanceId) {
        if let Some(entry) = self.instances.get_mut(&instance) {
            entry.state = InstanceState::Stopped;
        }
    }
}

impl Mixer for MockMixer {
    fn load(&mut self, path: &Path) -> Result<BufferId> {
        if self.fail_loads {
            return Err(anyhow!("mock load failure: {}", path.display()));
        }
        self.next_buffer += 1;
        let id = BufferId(self.next_buffer);
        self.loaded.insert(id, path.to_path_buf());
        Ok(id)
    }

    fn unload(&mut self, buffer: BufferId) {
        self.loaded.remove(&buffer);
        self.unloaded.push(buffer);
    }

    fn spawn(&mut self, buffer: BufferId, gain: f32, looping: bool) -> Result<InstanceId> {
        self.next_instance += 1;
        let id = InstanceId(self.next_instance);
        self.instances.insert(
            id,
            MockInstance {
                buffer,
                gain,
                looping,
                state: InstanceState::Playing,
                panning: 0.0,
                attenuation: 1.0,
                seeks: 0,
            },
        );
        Ok(id)
    }

    fn pause(&mut self, instance: InstanceId) {
        if let Some(entry) = self.instances.get_mut(&instance) {
            if entry.state != InstanceState::Stopped {
                entry.state = InstanceState::Paused;
            }
        }
    }

    fn resume(&mut self, instance: InstanceId) {
        if let Some(entry) = self.instances.get_mut(&instance) {
            if entry.state != InstanceState::Stopped {
                entry.state = InstanceState::Playing;
            }
        }
    }

    fn stop(&mut self, instance: InstanceId) {
        if let Some(entry) = self.instances.get_mut(&instance) {
            entry.state = InstanceState::Stopped;
        }
    }

    fn seek_start(&mut self, instance: InstanceId) {
        if let Some(entry) = self.instances.get_mut(&instance) {
            entry.seeks += 1;
        }
    }

    fn set_gain(&mut self, instance: InstanceId, gain: f32) {
        if let Some(entry) = self.instances.get_mut(&instance) {
            entry.gain = gain;
        }
    }

    fn gain(&self, instance: InstanceId) -> f32 {
        self.instances.get(&instance).map_or(0.0, |i| i.gain)
    }

    fn set_looping(&mut self, instance: InstanceId, looping: bool) {
        if let Some(entry) = self.instances.get_mut(&instance) {
            entry.looping = looping;
        }
    }

    fn set_position(&mut self, instance: InstanceId, panning: f32, attenuation: f32) {
        if let Some(entry) = self.instances.get_mut(&instance) {
            entry.panning = panning;
            entry.attenuation = attenuation;
        }
    }

    fn state(&self, instance: InstanceId) -> InstanceState {
        self.instances
            .get(&instance)
            .map_or(InstanceState::Stopped, |i| i.state)
    }

    fn release(&mut self, instance: InstanceId) {
        if self.instances.remove(&instance).is_some() {
            self.released.push(instance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_tracks_lifecycle() {
        let mut mixer = MockMixer::new();
        let buffer = mixer.load(Path::new("a.wav")).unwrap();
        let instance = mixer.spawn(buffer, 0.5, false).unwrap();
        assert_eq!(mixer.state(instance), InstanceState::Playing);
        assert_eq!(mixer.gain(instance), 0.5);

        mixer.pause(instance);
        assert_eq!(mixer.state(instance), InstanceState::Paused);

        mixer.release(instance);
        assert_eq!(mixer.state(instance), InstanceState::Stopped);
        assert_eq!(mixer.released, vec![instance]);
    }

    #[test]
    fn test_mock_failure_switch() {
        let mut mixer = MockMixer::new();
        mixer.fail_loads = true;
        assert!(mixer.load(Path::new("a.wav")).is_err());
        assert!(mixer.loaded.is_empty());
    }

    #[test]
    fn stopped_instances_do_not_resume() {
        let mut mixer = MockMixer::new();
        let buffer = mixer.load(Path::new("a.wav")).unwrap();
        let instance = mixer.spawn(buffer, 1.0, false).unwrap();
        mixer.stop(instance);
        mixer.resume(instance);
        assert_eq!(mixer.state(instance), InstanceState::Stopped);
    }
}
