//! Tween engine
//!
//! Interpolates one numeric property over time with an easing curve,
//! optional repeats and yoyo legs. `drive` ticks a tween on the runtime's
//! timer at a fixed frame period and hands every value to a callback.

use std::f64::consts::PI;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{Instant, MissedTickBehavior};

/// Easing curve
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    SineIn,
    SineOut,
    /// Sine-based S-curve
    #[default]
    SineInOut,
    /// Pulls back before moving (overshoot amount)
    BackIn(f64),
    /// Overshoots the target and returns
    BackOut(f64),
    /// Pulls back at the start and overshoots at the end
    BackInOut(f64),
}

impl Ease {
    /// Apply the curve to a linear progress value (0.0-1.0)
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Ease::Linear => t,
            Ease::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Ease::SineOut => (t * PI / 2.0).sin(),
            Ease::SineInOut => (1.0 - (t * PI).cos()) / 2.0,
            Ease::BackIn(s) => back_in(t, s),
            Ease::BackOut(s) => 1.0 - back_in(1.0 - t, s),
            Ease::BackInOut(s) => {
                if t < 0.5 {
                    back_in(t * 2.0, s) / 2.0
                } else {
                    1.0 - back_in((1.0 - t) * 2.0, s) / 2.0
                }
            }
        }
    }
}

#[inline]
fn back_in(t: f64, overshoot: f64) -> f64 {
    t * t * ((overshoot + 1.0) * t - overshoot)
}

/// How many extra legs a tween plays after the first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    #[default]
    Once,
    Times(u32),
    Forever,
}

/// One property animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    /// Duration of one leg
    pub duration: Duration,
    pub ease: Ease,
    pub repeat: Repeat,
    /// Alternate legs play backwards
    pub yoyo: bool,
}

impl Tween {
    /// Linear single-leg tween
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            ease: Ease::Linear,
            repeat: Repeat::Once,
            yoyo: false,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Number of legs, `None` when endless
    pub fn legs(&self) -> Option<u64> {
        match self.repeat {
            Repeat::Once => Some(1),
            Repeat::Times(n) => Some(n as u64 + 1),
            Repeat::Forever => None,
        }
    }

    /// Total running time, `None` when endless
    pub fn total_duration(&self) -> Option<Duration> {
        self.legs()
            .map(|legs| self.duration.saturating_mul(legs.min(u32::MAX as u64) as u32))
    }

    pub fn is_endless(&self) -> bool {
        self.legs().is_none()
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        self.total_duration().is_some_and(|total| elapsed >= total)
    }

    /// Property value after `elapsed`
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let (leg, progress) = self.leg_progress(elapsed);
        let backwards = self.yoyo && leg % 2 == 1;
        let k = if backwards {
            self.ease.apply(1.0 - progress)
        } else {
            self.ease.apply(progress)
        };
        self.from + (self.to - self.from) * k
    }

    /// Value once the tween has finished
    pub fn end_value(&self) -> f64 {
        match self.legs() {
            Some(legs) if self.yoyo && legs % 2 == 0 => self.from,
            _ => self.to,
        }
    }

    fn leg_progress(&self, elapsed: Duration) -> (u64, f64) {
        let leg_secs = self.duration.as_secs_f64();
        let last_leg = self.legs().map(|n| n.saturating_sub(1));

        if leg_secs <= 0.0 {
            return (last_leg.unwrap_or(0), 1.0);
        }

        let position = elapsed.as_secs_f64() / leg_secs;
        let leg = position.floor() as u64;
        match last_leg {
            Some(last) if leg > last => (last, 1.0),
            _ => (leg, position.fract()),
        }
    }
}

/// Tick `tween` every `frame_period` until it completes, passing each value to `on_update`.
///
/// The first value is delivered immediately and the final value is always
/// delivered exactly once. Endless tweens never return; drop the future to stop them.
pub async fn drive<F>(tween: &Tween, frame_period: Duration, mut on_update: F)
where
    F: FnMut(f64),
{
    let start = Instant::now();
    let mut interval = tokio::time::interval(frame_period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let elapsed = start.elapsed();
        if tween.is_complete(elapsed) {
            on_update(tween.end_value());
            return;
        }
        on_update(tween.value_at(elapsed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ease_endpoints() {
        for ease in [
            Ease::Linear,
            Ease::SineIn,
            Ease::SineOut,
            Ease::SineInOut,
            Ease::BackIn(0.8),
            Ease::BackOut(0.8),
            Ease::BackInOut(0.8),
        ] {
            assert_relative_eq!(ease.apply(0.0), 0.0, epsilon = 1e-9);
            assert_relative_eq!(ease.apply(1.0), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_back_ease_overshoots() {
        let ease = Ease::BackInOut(0.8);
        // Pulls back early, overshoots late
        assert!(ease.apply(0.15) < 0.0);
        assert!(ease.apply(0.85) > 1.0);
        assert_relative_eq!(ease.apply(0.5), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_yoyo_returns_to_start() {
        let tween = Tween::new(0.2, 1.0, Duration::from_millis(500))
            .ease(Ease::SineInOut)
            .repeat(Repeat::Times(7))
            .yoyo(true);

        assert_eq!(tween.total_duration(), Some(Duration::from_millis(4000)));
        assert_relative_eq!(tween.value_at(Duration::from_millis(500)), 1.0, epsilon = 1e-9);
        assert_relative_eq!(tween.value_at(Duration::from_millis(1000)), 0.2, epsilon = 1e-9);
        assert_relative_eq!(tween.end_value(), 0.2);
        assert!(tween.is_complete(Duration::from_millis(4000)));
    }

    #[test]
    fn test_endless_tween() {
        let tween = Tween::new(1.1, 2.1, Duration::from_secs(1))
            .repeat(Repeat::Forever)
            .yoyo(true);
        assert!(tween.is_endless());
        assert!(!tween.is_complete(Duration::from_secs(3600)));
        assert_relative_eq!(tween.value_at(Duration::from_millis(1500)), 1.6, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_duration_lands_on_target() {
        let tween = Tween::new(0.0, 5.0, Duration::ZERO);
        assert!(tween.is_complete(Duration::ZERO));
        assert_relative_eq!(tween.value_at(Duration::ZERO), 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_delivers_final_value() {
        let tween = Tween::new(0.0, 10.0, Duration::from_millis(100));
        let mut values = Vec::new();
        drive(&tween, Duration::from_millis(16), |v| values.push(v)).await;

        assert_eq!(values.first().copied(), Some(0.0));
        assert_eq!(values.last().copied(), Some(10.0));
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.len() >= 6);
    }
}
