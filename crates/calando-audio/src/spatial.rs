//! Stereo positioning for a listener fixed at the origin.
//!
//! The engine has no 3D scene; emitter positions are reduced to a pan
//! and a distance attenuation applied on top of the instance gain.

/// Distance inside which no attenuation is applied.
const MIN_DISTANCE: f32 = 1.0;
/// Distance beyond which attenuation stops increasing.
const MAX_DISTANCE: f32 = 100.0;

/// Pan and attenuation derived from an emitter position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialParams {
    /// Stereo pan, -1.0 (hard left) to 1.0 (hard right).
    pub panning: f32,
    /// Gain multiplier, 1.0 at or inside `MIN_DISTANCE`.
    pub attenuation: f32,
}

/// Compute pan and attenuation for an emitter at (x, y), with the
/// listener at the origin facing +y and +x to the right.
pub fn position_params(x: f32, y: f32) -> SpatialParams {
    let distance = (x * x + y * y).sqrt();
    if distance < f32::EPSILON {
        return SpatialParams {
            panning: 0.0,
            attenuation: 1.0,
        };
    }
    let clamped = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    SpatialParams {
        panning: (x / distance).clamp(-1.0, 1.0),
        attenuation: MIN_DISTANCE / clamped,
    }
}
