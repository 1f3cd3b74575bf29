//! Machine body presentation effects
//!
//! The cabinet's bulbs, curtains, neon trim and glow are plain numeric
//! scene properties. Every effect is a set of tweens over them; bounded
//! effects are awaited, the glow pulse runs as a background task.

use std::future::Future;
use std::time::Duration;

use futures_util::future::{BoxFuture, join_all};
use log::{debug, warn};
use pm_slot::{Ease, Repeat, SceneResult, Tween};
use pm_stage::PresentationEffect;
use tokio::task::JoinHandle;

use crate::scene::{PropertyKey, SharedScene, animate_property};

// ═══════════════════════════════════════════════════════════════════════════════
// BACKGROUND EFFECT
// ═══════════════════════════════════════════════════════════════════════════════

/// Effect running on its own task. Aborted on `cancel()` or drop.
#[derive(Debug)]
pub struct BackgroundEffect {
    effect: PresentationEffect,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundEffect {
    /// Run `future` on the current runtime
    pub fn spawn<F>(effect: PresentationEffect, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            effect,
            handle: Some(tokio::spawn(future)),
        }
    }

    /// Effect that never ran
    pub fn idle(effect: PresentationEffect) -> Self {
        Self {
            effect,
            handle: None,
        }
    }

    pub fn effect(&self) -> PresentationEffect {
        self.effect
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Cancelling {}", self.effect.display_name());
            handle.abort();
        }
    }
}

impl Drop for BackgroundEffect {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRESENTATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome effects the coordinator sequences
pub trait Presentation: Send {
    /// Bulbs flash; completes when the flashing stops
    fn win_flash(&mut self) -> BoxFuture<'_, ()>;

    /// Curtains open outwards
    fn curtain_open(&mut self) -> BoxFuture<'_, ()>;

    /// Endless glow pulse; runs until the returned handle is dropped
    fn start_glow_pulse(&mut self) -> BackgroundEffect;

    /// Lights go down
    fn lose_fade(&mut self) -> BoxFuture<'_, ()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// MACHINE BODY
// ═══════════════════════════════════════════════════════════════════════════════

/// Default neon trim (pink)
pub const NEON_DEFAULT: [f64; 3] = [0.99, 0.46, 0.46];
/// Neon trim on mega games (deep red)
pub const NEON_MEGA: [f64; 3] = [0.9, 0.0, 0.0];
/// Neon trim once the lights are down
pub const NEON_OFF: [f64; 3] = [0.1, 0.0, 0.0];

pub const BULB_ALPHA: f64 = 0.2;
pub const GLOW_INTENSITY: f64 = 1.1;
pub const GLOW_PEAK: f64 = 2.1;

const CURTAIN_SCALE: f64 = 0.013;
const CURTAIN_OPEN_SCALE: f64 = 0.003;
const LEFT_CURTAIN_X: f64 = -0.39;
const RIGHT_CURTAIN_X: f64 = 0.905;
const CURTAIN_OPEN_X: f64 = 4.5;

pub struct MachineBody {
    scene: SharedScene,
    is_mega: bool,
    frame_period: Duration,
}

impl MachineBody {
    pub fn new(scene: SharedScene, is_mega: bool) -> Self {
        Self {
            scene,
            is_mega,
            frame_period: Duration::from_secs_f64(1.0 / 60.0),
        }
    }

    pub fn with_frame_period(mut self, frame_period: Duration) -> Self {
        self.frame_period = frame_period;
        self
    }

    pub fn is_mega(&self) -> bool {
        self.is_mega
    }

    /// Neon trim colour for this machine
    pub fn neon_color(&self) -> [f64; 3] {
        if self.is_mega { NEON_MEGA } else { NEON_DEFAULT }
    }

    /// Write the resting state of every animated property
    pub fn build(&self) -> SceneResult<()> {
        let [r, g, b] = self.neon_color();
        let mut scene = self.scene.lock();
        for (key, value) in [
            (PropertyKey::NeonRed, r),
            (PropertyKey::NeonGreen, g),
            (PropertyKey::NeonBlue, b),
            (PropertyKey::BulbAlpha, BULB_ALPHA),
            (PropertyKey::GlowIntensity, GLOW_INTENSITY),
            (PropertyKey::LeftCurtainScaleX, CURTAIN_SCALE),
            (PropertyKey::RightCurtainScaleX, CURTAIN_SCALE),
            (PropertyKey::LeftCurtainX, LEFT_CURTAIN_X),
            (PropertyKey::RightCurtainX, RIGHT_CURTAIN_X),
        ] {
            scene.set_property(key, value)?;
        }
        Ok(())
    }

    /// Run tweens concurrently; failures are logged and skipped
    async fn animate_all(&self, effect: PresentationEffect, tweens: Vec<(PropertyKey, Tween)>) {
        let runs = tweens.into_iter().map(|(key, tween)| async move {
            (key, animate_property(&self.scene, key, tween, self.frame_period).await)
        });
        for (key, result) in join_all(runs).await {
            if let Err(err) = result {
                warn!("{}: {} skipped ({})", effect.display_name(), key, err);
            }
        }
    }
}

impl Presentation for MachineBody {
    fn win_flash(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let flash = Tween::new(0.0, 1.0, Duration::from_millis(500))
                .ease(Ease::SineInOut)
                .repeat(Repeat::Times(7))
                .yoyo(true);
            self.animate_all(PresentationEffect::WinFlash, vec![(PropertyKey::BulbAlpha, flash)])
                .await;
        })
    }

    fn curtain_open(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let to = |target: f64| {
                Tween::new(0.0, target, Duration::from_secs(1)).ease(Ease::SineInOut)
            };
            self.animate_all(
                PresentationEffect::CurtainOpen,
                vec![
                    (PropertyKey::LeftCurtainScaleX, to(CURTAIN_OPEN_SCALE)),
                    (PropertyKey::RightCurtainScaleX, to(CURTAIN_OPEN_SCALE)),
                    (PropertyKey::LeftCurtainX, to(-CURTAIN_OPEN_X)),
                    (PropertyKey::RightCurtainX, to(CURTAIN_OPEN_X)),
                ],
            )
            .await;
        })
    }

    fn start_glow_pulse(&mut self) -> BackgroundEffect {
        let scene = self.scene.clone();
        let frame_period = self.frame_period;
        let pulse = Tween::new(0.0, GLOW_PEAK, Duration::from_secs(1))
            .ease(Ease::SineInOut)
            .repeat(Repeat::Forever)
            .yoyo(true);

        BackgroundEffect::spawn(PresentationEffect::GlowPulse, async move {
            if let Err(err) =
                animate_property(&scene, PropertyKey::GlowIntensity, pulse, frame_period).await
            {
                warn!("Glow pulse skipped: {}", err);
            }
        })
    }

    fn lose_fade(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let fade = |target: f64| {
                Tween::new(0.0, target, Duration::from_secs(1)).ease(Ease::SineOut)
            };
            let [r, g, b] = NEON_OFF;

            self.animate_all(
                PresentationEffect::LoseFade,
                vec![
                    (PropertyKey::NeonRed, fade(r)),
                    (PropertyKey::NeonGreen, fade(g)),
                    (PropertyKey::NeonBlue, fade(b)),
                ],
            )
            .await;
            self.animate_all(PresentationEffect::LoseFade, vec![(PropertyKey::BulbAlpha, fade(0.0))])
                .await;
            self.animate_all(
                PresentationEffect::LoseFade,
                vec![(PropertyKey::GlowIntensity, fade(0.0))],
            )
            .await;
        })
    }
}
