//! Reel — one independently spinning symbol carousel
//!
//! A reel owns a ring of evenly spaced segments. Spinning drives the ring
//! through a fixed eased rotation; each time the read-head segment comes
//! back around after having been shown, it receives a fresh random face,
//! which reads as blurred symbols while the reel is in flight. Once the
//! reel has made all of its full turns, the next redisplay plants the final
//! face instead and nothing touches the read head again.

use std::f64::consts::{FRAC_PI_8, PI, TAU};
use std::fmt;

use log::{debug, error, warn};
use pm_stage::{Stage, StagePayload, StageRecorder};
use serde::{Deserialize, Serialize};

use crate::error::{ReelPositionError, SceneResult};
use crate::position::{ReelOutcome, ReelPosition};
use crate::symbols::{Symbol, SymbolPicker, forced_face_for};
use crate::timing::{SessionClock, SpinTiming};
use crate::tween::{Ease, Tween, drive};
use crate::view::ReelView;

/// Segment whose face is the reel's result
pub const READ_HEAD: usize = 0;

/// One face-bearing panel around the carousel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub face: Symbol,
    /// Set once the segment has been visible since its last face change
    pub has_displayed: bool,
    /// Angle of the segment in the carousel's build pose
    pub base_angle: f64,
}

/// Reel lifecycle; one-way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinState {
    #[default]
    Idle,
    Spinning,
    Settled,
}

pub struct Reel {
    position: ReelPosition,
    timing: SpinTiming,
    segments: Vec<Segment>,
    rotation: f64,
    state: SpinState,
    /// Final face has been planted
    committed: bool,
    last_half_turn: i64,
    picker: SymbolPicker,
    view: Option<Box<dyn ReelView>>,
    render_failures: usize,
    degraded_logged: bool,
    recorder: Option<StageRecorder>,
    clock: SessionClock,
}

impl Reel {
    /// Build an idle reel with random ordinary faces
    pub fn new(position: ReelPosition, timing: SpinTiming) -> Self {
        let mut reel = Self {
            position,
            segments: Vec::new(),
            rotation: 0.0,
            state: SpinState::Idle,
            committed: false,
            last_half_turn: 0,
            picker: SymbolPicker::default(),
            view: None,
            render_failures: 0,
            degraded_logged: false,
            recorder: None,
            clock: SessionClock::start(),
            timing,
        };
        reel.reset_segments();
        reel
    }

    /// Build a reel from a position label.
    ///
    /// Unknown labels are logged and produce an unassigned reel.
    pub fn from_label(label: &str, timing: SpinTiming) -> Self {
        let position = label
            .parse::<ReelPosition>()
            .unwrap_or_else(|err: ReelPositionError| {
                error!("{}", err);
                ReelPosition::Unassigned
            });
        Self::new(position, timing)
    }

    /// Use a specific picker; re-rolls the initial faces and shows them on an attached view
    pub fn with_picker(mut self, picker: SymbolPicker) -> Self {
        self.picker = picker;
        self.reset_segments();
        self.push_faces();
        self
    }

    /// Attach a renderer view and push the current state to it
    pub fn with_view(mut self, view: Box<dyn ReelView>) -> Self {
        self.set_view(view);
        self
    }

    pub fn set_view(&mut self, view: Box<dyn ReelView>) {
        self.view = Some(view);
        self.degraded_logged = false;
        let rotation = self.rotation;
        self.render(|view| view.set_rotation(rotation));
        self.push_faces();
    }

    /// Send every segment's face to the view, if one is attached
    fn push_faces(&mut self) {
        if self.view.is_none() {
            return;
        }
        for index in 0..self.segments.len() {
            let face = self.segments[index].face;
            self.render(|view| view.set_segment_face(index, face));
        }
    }

    /// Report stages into `recorder`, timestamped against `clock`
    pub fn attach(&mut self, recorder: StageRecorder, clock: SessionClock) {
        self.recorder = Some(recorder);
        self.clock = clock;
    }

    fn reset_segments(&mut self) {
        let count = self.timing.segment_count.max(1);
        let spacing = self.timing.segment_angle();
        self.segments = (0..count)
            .map(|i| Segment {
                face: self.picker.pick(),
                has_displayed: false,
                base_angle: spacing * i as f64,
            })
            .collect();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN
    // ═══════════════════════════════════════════════════════════════════════════

    /// Spin to rest and return the settled read-head face.
    ///
    /// Waits out the position's stagger first. A reel that is not idle is
    /// left untouched and reports its current face.
    pub async fn spin(&mut self, outcome: ReelOutcome) -> Symbol {
        if self.state != SpinState::Idle {
            warn!(
                "Reel {} asked to spin while {:?}, ignoring",
                self.position, self.state
            );
            return self.read_head_face();
        }

        let outcome = self.effective_outcome(outcome);
        let stagger = self.timing.stagger_for(self.position);
        if !stagger.is_zero() {
            tokio::time::sleep(stagger).await;
        }

        self.state = SpinState::Spinning;
        self.record(
            |index| Stage::ReelSpinning { reel_index: index },
            StagePayload::new().stagger_ms(stagger.as_secs_f64() * 1000.0),
        );
        debug!("Reel {} spinning ({:?})", self.position, outcome);

        let tween = Tween::new(0.0, self.timing.total_rotation(), self.timing.spin_duration())
            .ease(Ease::BackInOut(self.timing.overshoot));
        let frame_period = self.timing.frame_period();
        drive(&tween, frame_period, |angle| self.advance(angle, outcome)).await;

        self.settle(outcome)
    }

    /// Settle now with whatever the read head shows
    pub fn force_settle(&mut self) -> Symbol {
        let face = self.read_head_face();
        if self.state == SpinState::Settled {
            return face;
        }

        warn!(
            "Reel {} force-settled while {:?} on {}",
            self.position, self.state, face
        );
        self.committed = true;
        self.state = SpinState::Settled;
        let name = face.name().to_string();
        self.record(
            |index| Stage::ReelForceSettled {
                reel_index: index,
                symbol: name,
            },
            StagePayload::new().rotation(self.rotation),
        );
        face
    }

    fn effective_outcome(&self, outcome: ReelOutcome) -> ReelOutcome {
        match self.position {
            ReelPosition::Unassigned => ReelOutcome::Neutral,
            _ => outcome,
        }
    }

    /// Per-tick update
    fn advance(&mut self, angle: f64, outcome: ReelOutcome) {
        self.rotation = angle;
        self.render(|view| view.set_rotation(angle));

        let half_turn = (angle / PI).floor() as i64;
        if half_turn > self.last_half_turn {
            self.last_half_turn = half_turn;
            self.redisplay_read_head(angle, outcome);
        }

        for segment in &mut self.segments {
            if (segment.base_angle + angle).rem_euclid(PI) > FRAC_PI_8 {
                segment.has_displayed = true;
            }
        }
    }

    fn redisplay_read_head(&mut self, angle: f64, outcome: ReelOutcome) {
        if self.committed {
            return;
        }

        let turns = (angle / TAU).floor() as i64;
        if turns >= self.timing.full_rotations as i64 {
            let face = self.final_face(outcome);
            self.commit(face);
        } else if self.segments[READ_HEAD].has_displayed {
            let face = self.picker.pick();
            self.set_face(READ_HEAD, face);
            self.segments[READ_HEAD].has_displayed = false;
        }
    }

    fn final_face(&mut self, outcome: ReelOutcome) -> Symbol {
        match (outcome, forced_face_for(self.position)) {
            (ReelOutcome::Win, Some(forced)) => forced,
            _ => self.picker.pick(),
        }
    }

    fn commit(&mut self, face: Symbol) {
        self.set_face(READ_HEAD, face);
        self.segments[READ_HEAD].has_displayed = false;
        self.committed = true;
        debug!("Reel {} committed {}", self.position, face);
    }

    fn settle(&mut self, outcome: ReelOutcome) -> Symbol {
        if !self.committed {
            // Tween ended without crossing into the final turn
            let face = self.final_face(outcome);
            self.commit(face);
        }
        self.state = SpinState::Settled;

        let face = self.read_head_face();
        let name = face.name().to_string();
        self.record(
            |index| Stage::ReelStop {
                reel_index: index,
                symbol: name,
            },
            StagePayload::new().rotation(self.rotation),
        );
        face
    }

    fn set_face(&mut self, index: usize, face: Symbol) {
        self.segments[index].face = face;
        self.render(|view| view.set_segment_face(index, face));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // COLLABORATORS
    // ═══════════════════════════════════════════════════════════════════════════

    fn render<F>(&mut self, op: F)
    where
        F: FnOnce(&mut dyn ReelView) -> SceneResult<()>,
    {
        let result = match self.view.as_mut() {
            Some(view) => op(view.as_mut()),
            None => {
                if !self.degraded_logged {
                    warn!("Reel {} has no view, spinning headless", self.position);
                    self.degraded_logged = true;
                }
                return;
            }
        };

        if let Err(err) = result {
            self.render_failures += 1;
            if !self.degraded_logged {
                warn!("Reel {} render degraded: {}", self.position, err);
                self.degraded_logged = true;
            }
        }
    }

    fn record<F>(&self, stage: F, payload: StagePayload)
    where
        F: FnOnce(u8) -> Stage,
    {
        let (Some(recorder), Some(index)) = (&self.recorder, self.position.index()) else {
            return;
        };
        recorder.record_with(stage(index as u8), self.clock.elapsed_ms(), payload);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn position(&self) -> ReelPosition {
        self.position
    }

    pub fn timing(&self) -> &SpinTiming {
        &self.timing
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn spin_state(&self) -> SpinState {
        self.state
    }

    pub fn is_settled(&self) -> bool {
        self.state == SpinState::Settled
    }

    /// Current carousel rotation (radians)
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Face currently under the read head
    pub fn read_head_face(&self) -> Symbol {
        self.segments[READ_HEAD].face
    }

    /// Result face, once settled
    pub fn settled_face(&self) -> Option<Symbol> {
        self.is_settled().then(|| self.read_head_face())
    }

    /// View calls that returned an error
    pub fn render_failures(&self) -> usize {
        self.render_failures
    }

    pub fn has_view(&self) -> bool {
        self.view.is_some()
    }
}

impl fmt::Debug for Reel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reel")
            .field("position", &self.position)
            .field("state", &self.state)
            .field("rotation", &self.rotation)
            .field("segments", &self.segments)
            .field("committed", &self.committed)
            .field("has_view", &self.view.is_some())
            .finish_non_exhaustive()
    }
}
