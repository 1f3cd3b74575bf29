//! SpinSession — three reels and the settle barrier
//!
//! Starts left, middle and right concurrently (each waits out its own
//! stagger) and resolves only once every reel is at rest. A timeout bounds
//! the wait: reels still moving when it fires are force-settled on the face
//! they show and the report is marked degraded.

use std::time::Duration;

use futures_util::future::join_all;
use log::{info, warn};
use pm_stage::{Stage, StagePayload, StageRecorder};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::position::{REEL_POSITIONS, ReelOutcome, ReelPosition};
use crate::reel::Reel;
use crate::symbols::{FORCED_SYMBOLS, Symbol, SymbolPicker};
use crate::timing::{SessionClock, SpinTiming};
use crate::view::{ReelLayout, ReelScene, ReelView};

/// Result of one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Settled read-head faces, left to right
    pub faces: [Symbol; 3],
    /// The barrier timed out and force-settled at least one reel
    pub degraded: bool,
    /// Reels the timeout force-settled
    pub timed_out: Vec<ReelPosition>,
}

impl SessionReport {
    /// Faces spell out the full forced word
    pub fn is_jackpot(&self) -> bool {
        self.faces == FORCED_SYMBOLS
    }

    pub fn face_names(&self) -> Vec<String> {
        self.faces.iter().map(|f| f.name().to_string()).collect()
    }
}

#[derive(Debug)]
pub struct SpinSession {
    reels: [Reel; 3],
    recorder: StageRecorder,
    clock: SessionClock,
}

impl SpinSession {
    /// Three fresh reels sharing `timing`
    pub fn new(timing: SpinTiming, recorder: StageRecorder) -> Self {
        let reels = REEL_POSITIONS.map(|position| Reel::new(position, timing.clone()));
        Self::assemble(reels, recorder, SessionClock::start())
    }

    /// Take ownership of pre-built reels.
    ///
    /// Reels must be in left, middle, right order and share a segment count.
    pub fn from_reels(
        reels: [Reel; 3],
        recorder: StageRecorder,
        clock: SessionClock,
    ) -> Result<Self, SessionError> {
        for (slot, (reel, expected)) in reels.iter().zip(REEL_POSITIONS).enumerate() {
            if reel.position() != expected {
                return Err(SessionError::MisplacedReel {
                    slot,
                    expected: expected.to_string(),
                    found: reel.position().to_string(),
                });
            }
        }

        let counts = reels.each_ref().map(|reel| reel.segments().len());
        if counts.iter().any(|&count| count != counts[0]) {
            return Err(SessionError::SegmentMismatch(counts));
        }

        Ok(Self::assemble(reels, recorder, clock))
    }

    fn assemble(mut reels: [Reel; 3], recorder: StageRecorder, clock: SessionClock) -> Self {
        for reel in &mut reels {
            reel.attach(recorder.clone(), clock);
        }
        Self {
            reels,
            recorder,
            clock,
        }
    }

    /// Deterministic faces; each reel gets its own stream derived from `seed`
    pub fn with_seed(self, seed: u64) -> Self {
        let Self {
            reels,
            recorder,
            clock,
        } = self;
        let seeds = reel_seeds(seed);
        let mut index = 0;
        let reels = reels.map(|reel| {
            let reel = reel.with_picker(SymbolPicker::seeded(seeds[index]));
            index += 1;
            reel
        });
        Self {
            reels,
            recorder,
            clock,
        }
    }

    /// Attach a view to the reel at `position`
    pub fn set_view(&mut self, position: ReelPosition, view: Box<dyn ReelView>) -> bool {
        match self.reel_mut(position) {
            Some(reel) => {
                reel.set_view(view);
                true
            }
            None => false,
        }
    }

    /// Ask `scene` for a view per reel; failures leave that reel headless
    pub fn build_views(&mut self, scene: &mut dyn ReelScene) -> usize {
        let mut built = 0;
        for reel in &mut self.reels {
            let layout = ReelLayout::for_position(reel.position(), reel.segments().len());
            match scene.build_reel(reel.position(), layout) {
                Ok(view) => {
                    reel.set_view(view);
                    built += 1;
                }
                Err(err) => warn!("Reel {} view unavailable: {}", reel.position(), err),
            }
        }
        built
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BARRIER
    // ═══════════════════════════════════════════════════════════════════════════

    /// Spin all reels and wait until every one has settled, or `timeout` passes
    pub async fn spin(&mut self, outcomes: [ReelOutcome; 3], timeout: Duration) -> SessionReport {
        self.recorder.record(Stage::SpinStart, self.clock.elapsed_ms());
        info!("Session spin started ({:?})", outcomes);

        let spins = self
            .reels
            .iter_mut()
            .zip(outcomes)
            .map(|(reel, outcome)| reel.spin(outcome));
        let result = tokio::time::timeout(timeout, join_all(spins)).await;

        let timed_out = match result {
            Ok(_) => Vec::new(),
            Err(_) => {
                warn!("Session barrier timed out after {:?}", timeout);
                self.reels
                    .iter_mut()
                    .filter(|reel| !reel.is_settled())
                    .map(|reel| {
                        reel.force_settle();
                        reel.position()
                    })
                    .collect()
            }
        };

        let report = SessionReport {
            faces: self.reels.each_ref().map(|reel| reel.read_head_face()),
            degraded: !timed_out.is_empty(),
            timed_out,
        };

        self.recorder.record_with(
            Stage::SessionSettled {
                degraded: report.degraded,
            },
            self.clock.elapsed_ms(),
            StagePayload::new().reel_faces(report.face_names()),
        );
        info!(
            "Session settled: {} (degraded: {})",
            report.face_names().join(" "),
            report.degraded
        );
        report
    }

    /// Spin with the longest timeout any reel's timing asks for
    pub async fn spin_with_default_timeout(&mut self, outcomes: [ReelOutcome; 3]) -> SessionReport {
        let timeout = self.default_timeout();
        self.spin(outcomes, timeout).await
    }

    pub fn default_timeout(&self) -> Duration {
        self.reels
            .iter()
            .map(|reel| reel.timing().settle_timeout())
            .max()
            .unwrap_or_default()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Every reel has settled
    pub fn is_complete(&self) -> bool {
        self.reels.iter().all(Reel::is_settled)
    }

    pub fn reels(&self) -> &[Reel; 3] {
        &self.reels
    }

    pub fn reel(&self, position: ReelPosition) -> Option<&Reel> {
        position.index().map(|i| &self.reels[i])
    }

    fn reel_mut(&mut self, position: ReelPosition) -> Option<&mut Reel> {
        position.index().map(|i| &mut self.reels[i])
    }

    pub fn recorder(&self) -> &StageRecorder {
        &self.recorder
    }

    pub fn clock(&self) -> SessionClock {
        self.clock
    }
}

/// Independent per-reel seeds drawn from one session seed
fn reel_seeds(seed: u64) -> [u64; 3] {
    let mut rng = StdRng::seed_from_u64(seed);
    [rng.next_u64(), rng.next_u64(), rng.next_u64()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::reel_outcomes;

    #[test]
    fn test_from_reels_rejects_misplaced() {
        let timing = SpinTiming::normal();
        let reels = [
            Reel::new(ReelPosition::Middle, timing.clone()),
            Reel::new(ReelPosition::Left, timing.clone()),
            Reel::new(ReelPosition::Right, timing),
        ];
        let err = SpinSession::from_reels(reels, StageRecorder::default(), SessionClock::start())
            .unwrap_err();
        assert!(matches!(err, SessionError::MisplacedReel { slot: 0, .. }));
    }

    #[test]
    fn test_from_reels_rejects_segment_mismatch() {
        let timing = SpinTiming::normal();
        let mut six = timing.clone();
        six.segment_count = 6;
        let reels = [
            Reel::new(ReelPosition::Left, timing.clone()),
            Reel::new(ReelPosition::Middle, six),
            Reel::new(ReelPosition::Right, timing),
        ];
        let err = SpinSession::from_reels(reels, StageRecorder::default(), SessionClock::start())
            .unwrap_err();
        assert_eq!(err, SessionError::SegmentMismatch([4, 6, 4]));
    }

    #[test]
    fn test_reel_seeds_do_not_overlap_across_sessions() {
        assert_eq!(reel_seeds(42), reel_seeds(42));

        let mut seen = std::collections::HashSet::new();
        for seed in 0..64 {
            for reel_seed in reel_seeds(seed) {
                assert!(seen.insert(reel_seed), "seed {} reuses a reel stream", seed);
            }
        }
    }

    #[test]
    fn test_with_seed_is_reproducible() {
        let faces = |seed: u64| {
            let session =
                SpinSession::new(SpinTiming::normal(), StageRecorder::default()).with_seed(seed);
            session
                .reels()
                .each_ref()
                .map(|reel| reel.segments().iter().map(|s| s.face).collect::<Vec<_>>())
        };
        assert_eq!(faces(9), faces(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_json_round_trip() {
        let mut session =
            SpinSession::new(SpinTiming::instant(), StageRecorder::default()).with_seed(4);
        let report = session.spin_with_default_timeout(reel_outcomes(false)).await;

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"faces\":[\"win_left\",\"win_middle\""));
        let parsed: SessionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[tokio::test(start_paused = true)]
    async fn test_won_session_spells_word() {
        let mut session = SpinSession::new(SpinTiming::normal(), StageRecorder::default());
        let report = session.spin_with_default_timeout(reel_outcomes(true)).await;

        assert!(session.is_complete());
        assert!(!report.degraded);
        assert!(report.is_jackpot());
        assert_eq!(report.face_names(), vec!["W", "I", "N"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lost_session_misses_last_letter() {
        let mut session =
            SpinSession::new(SpinTiming::normal(), StageRecorder::default()).with_seed(3);
        let report = session.spin_with_default_timeout(reel_outcomes(false)).await;

        assert_eq!(report.faces[0], Symbol::WinLeft);
        assert_eq!(report.faces[1], Symbol::WinMiddle);
        assert!(!report.faces[2].is_forced());
        assert!(!report.is_jackpot());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trace_brackets_reels() {
        let recorder = StageRecorder::default();
        let mut session = SpinSession::new(SpinTiming::turbo(), recorder.clone());
        session.spin_with_default_timeout([ReelOutcome::Neutral; 3]).await;

        let trace = recorder.snapshot();
        let validation = trace.validate();
        assert!(validation.has_spin_start);
        assert!(validation.has_all_reels);
        assert!(validation.barrier_after_last_reel);
        assert!(trace.is_chronological());
    }
}
