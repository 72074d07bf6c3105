//! Linear music fades, advanced once per host update.

use std::time::Duration;

/// Per-update fade decrement. The host loop runs at 60 Hz, so each
/// update accounts for 16 ms of wall time regardless of actual frame
/// duration.
pub const FADE_TICK_SECS: f32 = 0.016;

/// An in-progress linear gain ramp.
#[derive(Debug, Clone)]
pub struct Fade {
    start_gain: f32,
    target_gain: f32,
    remaining_secs: f32,
    duration_secs: f32,
}

/// Result of advancing a fade by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeStep {
    /// Still ramping; apply this gain.
    Running(f32),
    /// Ramp complete; snap to this gain and discard the fade.
    Finished(f32),
}

impl Fade {
    pub fn new(start_gain: f32, target_gain: f32, duration: Duration) -> Self {
        let secs = duration.as_secs_f32();
        Self {
            start_gain,
            target_gain,
            remaining_secs: secs,
            duration_secs: secs,
        }
    }

    /// Advance by one 60 Hz tick.
    ///
    /// A zero-length fade finishes on the first tick. Interpolation is
    /// linear in gain, not in decibels.
    pub fn tick(&mut self) -> FadeStep {
        self.remaining_secs -= FADE_TICK_SECS;
        if self.remaining_secs <= 0.0 {
            FadeStep::Finished(self.target_gain)
        } else {
            let t = 1.0 - self.remaining_secs / self.duration_secs;
            FadeStep::Running(self.start_gain + (self.target_gain - self.start_gain) * t)
        }
    }
}
