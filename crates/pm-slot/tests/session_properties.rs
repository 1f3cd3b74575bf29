//! Session-level behaviour of the reel core
//!
//! All tests run on a paused tokio clock so full-length spins finish instantly:
//! - Forced faces land exactly where a win asks for them
//! - Lose and neutral reels never show a forced face
//! - The barrier waits for the last reel to settle, whatever its position
//! - Reels start in left, middle, right order
//! - A stuck reel degrades the session instead of hanging it

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pm_slot::{
    FORCED_SYMBOLS, REEL_POSITIONS, Reel, ReelOutcome, ReelPosition, ReelView, SceneResult,
    SessionClock, SpinSession, SpinTiming, Symbol, SymbolPicker, reel_outcomes,
};
use pm_stage::{Stage, StageRecorder};

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Remembers every face any segment was ever given
#[derive(Clone, Default)]
struct FaceHistory {
    faces: Arc<Mutex<Vec<Symbol>>>,
}

impl ReelView for FaceHistory {
    fn set_rotation(&mut self, _radians: f64) -> SceneResult<()> {
        Ok(())
    }

    fn set_segment_face(&mut self, _index: usize, symbol: Symbol) -> SceneResult<()> {
        self.faces.lock().push(symbol);
        Ok(())
    }
}

fn session_with(timings: [SpinTiming; 3], recorder: &StageRecorder, seed: u64) -> SpinSession {
    let mut i = 0;
    let reels = timings.map(|timing| {
        let position = REEL_POSITIONS[i];
        i += 1;
        Reel::new(position, timing).with_picker(SymbolPicker::seeded(seed + i as u64))
    });
    SpinSession::from_reels(reels, recorder.clone(), SessionClock::start())
        .expect("reels are in order")
}

// ═══════════════════════════════════════════════════════════════════════════════
// SETTLE DETERMINISM
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_win_settles_on_forced_face_for_every_position() {
    for seed in 0..5 {
        let mut session =
            SpinSession::new(SpinTiming::normal(), StageRecorder::default()).with_seed(seed);
        let report = session
            .spin(reel_outcomes(true), Duration::from_secs(30))
            .await;

        assert_eq!(report.faces, FORCED_SYMBOLS, "seed {}", seed);
        for (reel, forced) in session.reels().iter().zip(FORCED_SYMBOLS) {
            assert_eq!(reel.settled_face(), Some(forced));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_instant_profile_still_plants() {
    let mut session = SpinSession::new(SpinTiming::instant(), StageRecorder::default());
    let report = session.spin_with_default_timeout(reel_outcomes(true)).await;
    assert!(report.is_jackpot());
    assert!(!report.degraded);
}

// ═══════════════════════════════════════════════════════════════════════════════
// NON-OUTCOME REELS
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_lose_and_neutral_never_show_forced_faces() {
    for seed in 0..40 {
        let outcome = if seed % 2 == 0 {
            ReelOutcome::Lose
        } else {
            ReelOutcome::Neutral
        };
        let history = FaceHistory::default();
        let mut session =
            SpinSession::new(SpinTiming::turbo(), StageRecorder::default()).with_seed(seed);
        for position in REEL_POSITIONS {
            session.set_view(position, Box::new(history.clone()));
        }

        let report = session.spin_with_default_timeout([outcome; 3]).await;

        assert!(report.faces.iter().all(|f| !f.is_forced()), "seed {}", seed);
        assert!(history.faces.lock().iter().all(|f| !f.is_forced()));
        for reel in session.reels() {
            assert!(reel.segments().iter().all(|s| !s.face.is_forced()));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BARRIER
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_barrier_waits_for_true_last_reel() {
    let recorder = StageRecorder::default();
    let normal = SpinTiming::normal();
    let timings = [
        normal.clone(),
        normal.clone().with_spin_duration_ms(6000.0),
        normal.with_spin_duration_ms(1000.0),
    ];
    let mut session = session_with(timings, &recorder, 7);

    let started = tokio::time::Instant::now();
    let report = session
        .spin(reel_outcomes(true), Duration::from_secs(60))
        .await;

    assert!(!report.degraded);
    assert!(session.is_complete());
    assert!(started.elapsed() >= Duration::from_millis(9000));

    let trace = recorder.snapshot();
    let left_rest = trace.reel_rest_ms(0).expect("left rested");
    let right_rest = trace.reel_rest_ms(2).expect("right rested");
    assert!(right_rest < left_rest, "right should settle first");

    let settled = trace
        .find_event(|e| matches!(e.stage, Stage::SessionSettled { .. }))
        .expect("barrier recorded");
    assert!(settled.timestamp_ms >= left_rest);
    assert!(trace.validate().barrier_after_last_reel);
}

#[tokio::test(start_paused = true)]
async fn test_barrier_with_middle_last() {
    let recorder = StageRecorder::default();
    let turbo = SpinTiming::turbo();
    let timings = [
        turbo.clone(),
        turbo.clone().with_spin_duration_ms(8000.0),
        turbo,
    ];
    let mut session = session_with(timings, &recorder, 1);
    session
        .spin([ReelOutcome::Neutral; 3], Duration::from_secs(60))
        .await;

    let trace = recorder.snapshot();
    let middle_rest = trace.reel_rest_ms(1).expect("middle rested");
    assert!(trace.reel_rest_ms(2).expect("right rested") < middle_rest);
    assert!(trace.validate().barrier_after_last_reel);
}

// ═══════════════════════════════════════════════════════════════════════════════
// STAGGER
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_reels_start_left_to_right() {
    for seed in 0..10 {
        let recorder = StageRecorder::default();
        let mut session = SpinSession::new(SpinTiming::normal(), recorder.clone()).with_seed(seed);
        session.spin_with_default_timeout(reel_outcomes(seed % 2 == 0)).await;

        let trace = recorder.snapshot();
        let starts: Vec<f64> = (0..3)
            .map(|i| trace.reel_start_ms(i).expect("reel started"))
            .collect();
        assert!(starts[0] <= starts[1] && starts[1] <= starts[2], "{:?}", starts);
        assert!(starts[2] - starts[0] >= 1500.0);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TIMEOUT
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_stuck_reel_degrades_session() {
    let recorder = StageRecorder::default();
    let turbo = SpinTiming::turbo();
    let timings = [
        turbo.clone(),
        turbo.clone(),
        turbo.with_spin_duration_ms(60_000.0),
    ];
    let mut session = session_with(timings, &recorder, 9);

    let started = tokio::time::Instant::now();
    let report = session
        .spin(reel_outcomes(true), Duration::from_secs(5))
        .await;

    assert!(started.elapsed() < Duration::from_secs(6));
    assert!(report.degraded);
    assert_eq!(report.timed_out, vec![ReelPosition::Right]);
    assert_eq!(report.faces[0], Symbol::WinLeft);
    assert_eq!(report.faces[1], Symbol::WinMiddle);
    // Still mid-flight when cut off, so the plant never happened
    assert!(!report.faces[2].is_forced());
    assert!(session.is_complete());

    let trace = recorder.snapshot();
    assert!(trace.has_stage("reel_force_settled"));
    assert!(trace.summary().degraded);
}
