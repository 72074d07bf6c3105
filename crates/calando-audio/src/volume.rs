//! Conversions between the external integer volume scale and normalized gain.
//!
//! Callers deal in whole numbers from 0 to [`MAX_VOLUME`]; everything below
//! the public interface works in normalized gain (0.0 to 1.0). Out-of-range
//! values are clamped in both directions rather than rejected.

/// Upper bound of the external integer volume scale.
pub const MAX_VOLUME: i32 = 100;

/// Gain step applied by the volume-up/volume-down playback actions.
pub const VOLUME_STEP: f32 = 0.1;

/// Convert an external 0-100 volume to a normalized gain.
pub fn gain_from_volume(volume: i32) -> f32 {
    (volume as f32 / MAX_VOLUME as f32).clamp(0.0, 1.0)
}

/// Convert a normalized gain back to the external 0-100 scale.
pub fn volume_from_gain(gain: f32) -> i32 {
    (gain.clamp(0.0, 1.0) * MAX_VOLUME as f32).round() as i32
}
