//! Game — the outcome coordinator
//!
//! Decides the outcome once, runs the spin session, then sequences the win
//! or lose presentation strictly in order. The glow pulse is the only
//! effect not awaited; the game holds it and it stops when the game drops.

use std::time::Duration;

use futures_util::future::BoxFuture;
use log::{info, warn};
use pm_slot::{SessionClock, SessionReport, SpinSession, reel_outcomes};
use pm_stage::{PresentationEffect, Stage, StageRecorder};

use crate::assets::AssetTasks;
use crate::button::SpinButton;
use crate::click::{ClickThrough, Navigator};
use crate::config::GameLaunchConfig;
use crate::machine_body::{BackgroundEffect, Presentation};
use crate::outcome::{FromConfig, OutcomePolicy};
use crate::scene::SharedScene;
use crate::wall::FeaturedGameWall;

pub struct Game {
    config: GameLaunchConfig,
    has_won: bool,
    session: SpinSession,
    presentation: Box<dyn Presentation>,
    scene: SharedScene,
    assets: AssetTasks,
    navigator: Option<Box<dyn Navigator>>,
    click_through: Option<ClickThrough>,
    glow: Option<BackgroundEffect>,
    wall: Option<FeaturedGameWall>,
    report: Option<SessionReport>,
    is_spinning: bool,
    has_spun: bool,
    frame_period: Duration,
}

impl Game {
    /// Build a game; the outcome is taken from the config
    pub fn new(
        config: GameLaunchConfig,
        session: SpinSession,
        presentation: Box<dyn Presentation>,
        scene: SharedScene,
        navigator: Box<dyn Navigator>,
    ) -> Self {
        let has_won = FromConfig.decide(&config);
        Self {
            assets: AssetTasks::for_config(&config, ""),
            has_spun: config.has_spun,
            config,
            has_won,
            session,
            presentation,
            scene,
            navigator: Some(navigator),
            click_through: None,
            glow: None,
            wall: None,
            report: None,
            is_spinning: false,
            frame_period: Duration::from_secs_f64(1.0 / 60.0),
        }
    }

    /// Re-decide the outcome with `policy`. Ignored once a spin has started.
    pub fn with_policy(mut self, policy: &dyn OutcomePolicy) -> Self {
        if self.has_spun || self.is_spinning {
            warn!("Outcome policy {} ignored after spin", policy.name());
            return self;
        }
        self.has_won = policy.decide(&self.config);
        info!("Outcome decided by {}: has_won = {}", policy.name(), self.has_won);
        self
    }

    /// Use already-loaded asset tasks for the wall
    pub fn with_assets(mut self, assets: AssetTasks) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_frame_period(mut self, frame_period: Duration) -> Self {
        self.frame_period = frame_period;
        self
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN
    // ═══════════════════════════════════════════════════════════════════════════

    /// Spin once and play the outcome presentation.
    ///
    /// Returns `has_won`, or `None` if the game has already spun.
    pub async fn spin(&mut self) -> Option<bool> {
        if self.has_spun || self.is_spinning {
            warn!("Spin refused: reels are single-use");
            return None;
        }
        self.is_spinning = true;

        let timeout = self.session.default_timeout();
        let report = self.session.spin(reel_outcomes(self.has_won), timeout).await;
        if report.degraded {
            warn!("Degraded session, force-settled {:?}", report.timed_out);
        }
        self.report = Some(report);

        let recorder = self.session.recorder().clone();
        let clock = self.session.clock();
        recorder.record(
            Stage::OutcomeResolved {
                has_won: self.has_won,
            },
            clock.elapsed_ms(),
        );

        if self.has_won {
            self.present_win(&recorder, clock).await;
        } else {
            self.present_lose(&recorder, clock).await;
        }

        self.is_spinning = false;
        self.has_spun = true;
        recorder.record(Stage::SpinEnd, clock.elapsed_ms());
        info!("Spin finished: has_won = {}", self.has_won);
        Some(self.has_won)
    }

    async fn present_win(&mut self, recorder: &StageRecorder, clock: SessionClock) {
        run_effect(
            recorder,
            clock,
            PresentationEffect::WinFlash,
            self.presentation.win_flash(),
        )
        .await;
        run_effect(
            recorder,
            clock,
            PresentationEffect::CurtainOpen,
            self.presentation.curtain_open(),
        )
        .await;

        recorder.record(
            Stage::PresentationStart {
                effect: PresentationEffect::GlowPulse,
            },
            clock.elapsed_ms(),
        );
        self.glow = Some(self.presentation.start_glow_pulse());
    }

    async fn present_lose(&mut self, recorder: &StageRecorder, clock: SessionClock) {
        run_effect(
            recorder,
            clock,
            PresentationEffect::LoseFade,
            self.presentation.lose_fade(),
        )
        .await;

        self.attach_click_through(recorder, clock);

        recorder.record(
            Stage::PresentationStart {
                effect: PresentationEffect::RecommendationWall,
            },
            clock.elapsed_ms(),
        );
        let mut wall =
            FeaturedGameWall::build(&self.config.recommended_games, &self.assets.game_tiles);
        let placed = wall.place(&self.scene, self.frame_period);
        info!(
            "Recommendation wall: {} of {} games placed",
            placed,
            self.config.recommended_games.len()
        );
        self.wall = Some(wall);
        recorder.record(
            Stage::PresentationEnd {
                effect: PresentationEffect::RecommendationWall,
            },
            clock.elapsed_ms(),
        );
    }

    fn attach_click_through(&mut self, recorder: &StageRecorder, clock: SessionClock) {
        let Some(navigator) = self.navigator.take() else {
            return;
        };
        self.click_through = Some(
            ClickThrough::new(self.scene.clone(), navigator).with_recorder(recorder.clone(), clock),
        );
        recorder.record(Stage::ClickThroughAttached, clock.elapsed_ms());
    }

    /// Route a pointer-down to the click-through; no-op until it is attached
    pub fn handle_pointer_down(&mut self, x: f64, y: f64) -> Option<String> {
        self.click_through
            .as_mut()
            .and_then(|click| click.handle_pointer_down(x, y))
    }

    /// Stop the background effects early
    pub fn stop_presentation(&mut self) {
        if let Some(mut glow) = self.glow.take() {
            glow.cancel();
            let clock = self.session.clock();
            self.session.recorder().record(
                Stage::PresentationCancelled {
                    effect: glow.effect(),
                },
                clock.elapsed_ms(),
            );
        }
        if let Some(wall) = self.wall.as_mut() {
            wall.stop();
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub fn has_spun(&self) -> bool {
        self.has_spun
    }

    pub fn config(&self) -> &GameLaunchConfig {
        &self.config
    }

    pub fn session(&self) -> &SpinSession {
        &self.session
    }

    pub fn recorder(&self) -> &StageRecorder {
        self.session.recorder()
    }

    /// Session report of the spin, once it has run
    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    pub fn wall(&self) -> Option<&FeaturedGameWall> {
        self.wall.as_ref()
    }

    pub fn is_glowing(&self) -> bool {
        self.glow.as_ref().is_some_and(BackgroundEffect::is_running)
    }

    pub fn button(&self) -> SpinButton {
        SpinButton {
            can_spin: self.config.can_spin,
            is_spinning: self.is_spinning,
            has_spun: self.has_spun,
            has_won: self.has_won,
        }
    }
}

/// Await one bounded effect between its start and end stages
async fn run_effect(
    recorder: &StageRecorder,
    clock: SessionClock,
    effect: PresentationEffect,
    run: BoxFuture<'_, ()>,
) {
    recorder.record(Stage::PresentationStart { effect }, clock.elapsed_ms());
    run.await;
    recorder.record(Stage::PresentationEnd { effect }, clock.elapsed_ms());
}
