//! Click-through to recommended games
//!
//! Attached on the lose path. Each pointer-down casts a ray; a hit on a
//! tagged object navigates to the tag, a miss does nothing.

use log::{debug, info};
use pm_slot::SessionClock;
use pm_stage::{Stage, StageRecorder};

use crate::scene::SharedScene;

/// Navigation side effect
pub trait Navigator: Send {
    fn navigate(&mut self, destination: &str);
}

impl<F> Navigator for F
where
    F: FnMut(&str) + Send,
{
    fn navigate(&mut self, destination: &str) {
        self(destination)
    }
}

/// Navigator that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&mut self, destination: &str) {
        info!("Navigate → {}", destination);
    }
}

pub struct ClickThrough {
    scene: SharedScene,
    navigator: Box<dyn Navigator>,
    recorder: Option<(StageRecorder, SessionClock)>,
    dispatched: usize,
}

impl ClickThrough {
    pub fn new(scene: SharedScene, navigator: Box<dyn Navigator>) -> Self {
        Self {
            scene,
            navigator,
            recorder: None,
            dispatched: 0,
        }
    }

    /// Record every navigation as a stage
    pub fn with_recorder(mut self, recorder: StageRecorder, clock: SessionClock) -> Self {
        self.recorder = Some((recorder, clock));
        self
    }

    /// Handle one pointer-down; returns the destination on a hit
    pub fn handle_pointer_down(&mut self, x: f64, y: f64) -> Option<String> {
        let hit = self.scene.lock().pick(x, y);
        let Some(destination) = hit else {
            debug!("Pointer down at ({:.2}, {:.2}): no hit", x, y);
            return None;
        };

        self.navigator.navigate(&destination);
        self.dispatched += 1;
        if let Some((recorder, clock)) = &self.recorder {
            recorder.record(
                Stage::Navigate {
                    destination: destination.clone(),
                },
                clock.elapsed_ms(),
            );
        }
        Some(destination)
    }

    /// Navigations dispatched so far
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }
}
