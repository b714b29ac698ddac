//! Frame timing
//!
//! Gameplay reads the scaled `dt`; skill-check meters read the unscaled
//! `raw_dt`. Both travel together in a `Frame` so nothing has to reach for
//! an ambient clock.

/// Longest frame the simulation will accept (seconds). Longer hitches are
/// clamped so a stalled window doesn't launch actors through the floor.
pub const DEFAULT_MAX_FRAME: f32 = 1.0 / 20.0;

/// Timing for a single simulation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Delta after time scale (seconds)
    pub dt: f32,
    /// Real delta before time scale (seconds)
    pub raw_dt: f32,
}

impl Frame {
    /// A frame where scaled and raw time agree.
    pub fn fixed(dt: f32) -> Self {
        Self { dt, raw_dt: dt }
    }
}

/// Process-wide time scale applied to every frame's delta.
#[derive(Debug, Clone)]
pub struct Clock {
    /// Multiplier applied to raw time (1.0 = normal speed)
    pub time_scale: f32,
    /// Upper bound for a raw frame delta
    pub max_frame: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            time_scale: 1.0,
            max_frame: DEFAULT_MAX_FRAME,
        }
    }

    /// Build the frame for a raw host delta.
    pub fn frame(&self, raw_dt: f32) -> Frame {
        let raw = raw_dt.clamp(0.0, self.max_frame);
        Frame {
            dt: raw * self.time_scale,
            raw_dt: raw,
        }
    }

    /// Back to normal speed.
    pub fn reset(&mut self) {
        self.time_scale = 1.0;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_applies_scale_to_dt_only() {
        let mut clock = Clock::new();
        clock.time_scale = 0.5;
        let frame = clock.frame(0.02);
        assert!((frame.dt - 0.01).abs() < 1e-6);
        assert!((frame.raw_dt - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_frame_clamps_hitches() {
        let clock = Clock::new();
        let frame = clock.frame(2.0);
        assert_eq!(frame.raw_dt, DEFAULT_MAX_FRAME);
        assert_eq!(clock.frame(-1.0).dt, 0.0);
    }
}
