//! Audio engine configuration.

use serde::{Deserialize, Serialize};

use crate::volume;

/// Initial volume settings for the audio engine.
///
/// Volumes use the external 0-100 scale; values outside the range are
/// clamped when converted to gain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Music volume, 0-100.
    pub music_volume: i32,
    /// Gain given to newly spawned sound-effect instances, 0-100.
    pub sound_volume: i32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_volume: volume::MAX_VOLUME,
            sound_volume: volume::MAX_VOLUME,
        }
    }
}

impl AudioSettings {
    /// Normalized music gain.
    pub fn music_gain(&self) -> f32 {
        volume::gain_from_volume(self.music_volume)
    }

    /// Normalized sound-effect gain.
    pub fn sound_gain(&self) -> f32 {
        volume::gain_from_volume(self.sound_volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AudioSettings::default();
        assert_eq!(settings.music_volume, 100);
        assert_eq!(settings.sound_volume, 100);
        assert_eq!(settings.music_gain(), 1.0);
    }

    #[test]
    fn test_settings_serialization() {
        let settings = AudioSettings {
            music_volume: 70,
            sound_volume: 85,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: AudioSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.music_volume, 70);
        assert_eq!(parsed.sound_volume, 85);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: AudioSettings = serde_json::from_str("{\"music_volume\": 40}").unwrap();
        assert_eq!(parsed.music_volume, 40);
        assert_eq!(parsed.sound_volume, 100);
    }

    #[test]
    fn out_of_range_volumes_clamp_in_gain() {
        let settings = AudioSettings {
            music_volume: 150,
            sound_volume: -20,
        };
        assert_eq!(settings.music_gain(), 1.0);
        assert_eq!(settings.sound_gain(), 0.0);
    }
}
