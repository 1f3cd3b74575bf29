//! # pm-stage — Prize Machine Stage System
//!
//! Defines the canonical phases a prize-machine session passes through and
//! the timeline they are recorded on.
//!
//! ## Philosophy
//!
//! Reels, the session barrier and the presentation effects never talk to
//! each other through callbacks. Each one reports the STAGE it reached:
//! - Spin starts → Reels spin → Reels stop → Session settles → Outcome resolved
//! - Outcome resolved → Win presentation OR lose presentation
//!
//! The resulting `StageTrace` is what tests and tooling assert against.

pub mod event;
pub mod recorder;
pub mod stage;
pub mod trace;

pub use event::*;
pub use recorder::*;
pub use stage::*;
pub use trace::*;
