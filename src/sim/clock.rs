//! Frame delta-time
//!
//! Timestamps come from the host (milliseconds, monotonic). The first
//! timestamp after a reset only seeds the clock.

use crate::consts::MAX_FRAME_DT;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Seconds since the previous timestamp, clamped to [0, MAX_FRAME_DT]
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let last = self.last_ms.unwrap_or(now_ms);
        self.last_ms = Some(now_ms);
        (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT)
    }

    /// Forget the previous timestamp so the next delta is zero
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    pub fn is_seeded(&self) -> bool {
        self.last_ms.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(12_345.0), 0.0);
        assert!(clock.is_seeded());
    }

    #[test]
    fn test_delta_in_seconds() {
        let mut clock = FrameClock::new();
        clock.delta(1000.0);
        let dt = clock.delta(1016.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_spike_is_clamped() {
        let mut clock = FrameClock::new();
        clock.delta(0.0);
        assert_eq!(clock.delta(4000.0), MAX_FRAME_DT);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::new();
        clock.delta(500.0);
        assert_eq!(clock.delta(400.0), 0.0);
    }

    #[test]
    fn test_reset_hides_pause_duration() {
        let mut clock = FrameClock::new();
        clock.delta(0.0);
        clock.delta(16.0);
        clock.reset();
        // Thirty seconds paused: the resumed frame still starts at zero
        assert_eq!(clock.delta(30_016.0), 0.0);
        let dt = clock.delta(30_032.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }
}
