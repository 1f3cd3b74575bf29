//! Timing profiles for reel spins and the session clock

use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::position::ReelPosition;

/// Timing profile for spins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// The machine as shipped: 15 turns over 9 s
    #[default]
    Normal,
    /// Short spins for repeated play
    Turbo,
    /// Near-instant spins for tooling and tests
    Instant,
    /// Scaled or hand-edited timing
    Custom,
}

impl TimingProfile {
    pub fn name(&self) -> &'static str {
        match self {
            TimingProfile::Normal => "normal",
            TimingProfile::Turbo => "turbo",
            TimingProfile::Instant => "instant",
            TimingProfile::Custom => "custom",
        }
    }
}

/// Convert milliseconds to a `Duration`.
///
/// Negatives and NaN clamp to zero, values too large for a `Duration` to `Duration::MAX`.
pub fn ms(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
}

/// Detailed spin timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinTiming {
    /// Profile type
    pub profile: TimingProfile,

    /// Full turns before the final quarter-turn alignment
    pub full_rotations: u32,

    /// Time for one reel's rotation tween (ms)
    pub spin_duration_ms: f64,

    /// Start offsets for left, middle, right (ms)
    pub stagger_ms: [f64; 3],

    /// Segments around each carousel
    pub segment_count: usize,

    /// Tween ticks per second
    pub frame_rate: f64,

    /// Overshoot of the back ease on the rotation tween
    pub overshoot: f64,

    /// Slack added after the last reel should have stopped before the barrier gives up (ms)
    pub settle_grace_ms: f64,
}

impl SpinTiming {
    /// Normal timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            full_rotations: 15,
            spin_duration_ms: 9000.0,
            stagger_ms: [0.0, 750.0, 1500.0],
            segment_count: 4,
            frame_rate: 60.0,
            overshoot: 0.8,
            settle_grace_ms: 2000.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            full_rotations: 6,
            spin_duration_ms: 3000.0,
            stagger_ms: [0.0, 250.0, 500.0],
            segment_count: 4,
            frame_rate: 60.0,
            overshoot: 0.8,
            settle_grace_ms: 1000.0,
        }
    }

    /// Instant mode: one turn, one frame
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            full_rotations: 1,
            spin_duration_ms: 0.0,
            stagger_ms: [0.0, 1.0, 2.0],
            segment_count: 4,
            frame_rate: 60.0,
            overshoot: 0.8,
            settle_grace_ms: 100.0,
        }
    }

    /// Get timing for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale all durations by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            profile: TimingProfile::Custom,
            spin_duration_ms: self.spin_duration_ms * factor,
            stagger_ms: self.stagger_ms.map(|s| s * factor),
            settle_grace_ms: self.settle_grace_ms * factor,
            ..self.clone()
        }
    }

    /// Builder: override the spin duration
    pub fn with_spin_duration_ms(mut self, duration_ms: f64) -> Self {
        self.profile = TimingProfile::Custom;
        self.spin_duration_ms = duration_ms;
        self
    }

    /// Total angle swept by one spin: full turns plus the quarter-turn alignment
    pub fn total_rotation(&self) -> f64 {
        TAU * self.full_rotations as f64 + FRAC_PI_2
    }

    /// Angle between neighbouring segments
    pub fn segment_angle(&self) -> f64 {
        TAU / self.segment_count.max(1) as f64
    }

    pub fn spin_duration(&self) -> Duration {
        ms(self.spin_duration_ms)
    }

    /// Stagger for a position; unassigned reels start immediately
    pub fn stagger_for(&self, position: ReelPosition) -> Duration {
        position
            .index()
            .map(|i| ms(self.stagger_ms[i]))
            .unwrap_or(Duration::ZERO)
    }

    /// Time between tween ticks
    pub fn frame_period(&self) -> Duration {
        if self.frame_rate <= 0.0 {
            return ms(1000.0 / 60.0);
        }
        ms(1000.0 / self.frame_rate)
    }

    /// Do the staggers produce a left → middle → right cascade?
    pub fn is_cascading(&self) -> bool {
        self.stagger_ms[0] < self.stagger_ms[1] && self.stagger_ms[1] < self.stagger_ms[2]
    }

    /// When the last reel should be at rest, measured from the spin call (ms)
    pub fn expected_session_ms(&self) -> f64 {
        let last_stagger = self.stagger_ms.iter().cloned().fold(0.0, f64::max);
        last_stagger + self.spin_duration_ms
    }

    /// Default barrier timeout
    pub fn settle_timeout(&self) -> Duration {
        ms(self.expected_session_ms() + self.settle_grace_ms)
    }
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self::normal()
    }
}

/// Origin all session timestamps are measured from
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    origin: Instant,
}

impl SessionClock {
    /// Start the clock now
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds since the clock started
    pub fn elapsed_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_matches_machine() {
        let timing = SpinTiming::normal();
        assert_eq!(timing.full_rotations, 15);
        assert_eq!(timing.spin_duration(), Duration::from_secs(9));
        assert!(timing.is_cascading());
        assert!((timing.total_rotation() - (30.0 * std::f64::consts::PI + FRAC_PI_2)).abs() < 1e-9);
    }

    #[test]
    fn test_stagger_lookup() {
        let timing = SpinTiming::normal();
        assert_eq!(timing.stagger_for(ReelPosition::Left), Duration::ZERO);
        assert_eq!(timing.stagger_for(ReelPosition::Middle), Duration::from_millis(750));
        assert_eq!(timing.stagger_for(ReelPosition::Right), Duration::from_millis(1500));
        assert_eq!(timing.stagger_for(ReelPosition::Unassigned), Duration::ZERO);
    }

    #[test]
    fn test_profiles_are_cascading() {
        for profile in [TimingProfile::Normal, TimingProfile::Turbo, TimingProfile::Instant] {
            assert!(SpinTiming::from_profile(profile).is_cascading(), "{:?}", profile);
        }
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(TimingProfile::Turbo.name(), "turbo");
        assert_eq!(SpinTiming::normal().scaled(0.5).profile.name(), "custom");
    }

    #[test]
    fn test_scaled() {
        let half = SpinTiming::normal().scaled(0.5);
        assert_eq!(half.profile, TimingProfile::Custom);
        assert_eq!(half.spin_duration_ms, 4500.0);
        assert_eq!(half.stagger_ms, [0.0, 375.0, 750.0]);
        assert_eq!(half.full_rotations, 15);
    }

    #[test]
    fn test_settle_timeout_covers_last_reel() {
        let timing = SpinTiming::normal();
        assert_eq!(timing.expected_session_ms(), 10500.0);
        assert_eq!(timing.settle_timeout(), Duration::from_millis(12500));
    }

    #[test]
    fn test_ms_clamps() {
        assert_eq!(ms(-5.0), Duration::ZERO);
        assert_eq!(ms(f64::NAN), Duration::ZERO);
        assert_eq!(ms(1500.0), Duration::from_millis(1500));
        assert_eq!(ms(f64::INFINITY), Duration::MAX);
        assert_eq!(ms(f64::MAX), Duration::MAX);
    }

    #[test]
    fn test_unbounded_scale_saturates() {
        let timing = SpinTiming::normal().scaled(f64::INFINITY);
        assert_eq!(timing.spin_duration(), Duration::MAX);
        assert_eq!(timing.stagger_for(ReelPosition::Right), Duration::MAX);
        assert_eq!(timing.settle_timeout(), Duration::MAX);
    }

    #[test]
    fn test_segment_angle() {
        let mut timing = SpinTiming::normal();
        assert!((timing.segment_angle() - FRAC_PI_2).abs() < 1e-12);
        timing.segment_count = 0;
        assert!((timing.segment_angle() - TAU).abs() < 1e-12);
    }
}
