//! # pm-slot — Prize Machine reel core
//!
//! The spin-and-resolution core of the prize machine: three independently
//! animated reels, a forced outcome planted on the final rotation, and a
//! session barrier that only releases once every reel is at rest.
//!
//! ## Architecture
//!
//! ```text
//! SpinSession
//!     │
//!     ├── Reel (left)   ── stagger 0 ms
//!     ├── Reel (middle) ── stagger 750 ms
//!     └── Reel (right)  ── stagger 1500 ms
//!           │
//!           ├── Tween (eased rotation, ticked per frame)
//!           ├── SymbolPicker (blurred faces while in flight)
//!           └── ReelView (renderer collaborator, optional)
//!           │
//!           v
//!     SessionReport → StageRecorder
//! ```

pub mod error;
pub mod position;
pub mod reel;
pub mod session;
pub mod symbols;
pub mod timing;
pub mod tween;
pub mod view;

pub use error::*;
pub use position::*;
pub use reel::*;
pub use session::*;
pub use symbols::*;
pub use timing::*;
pub use tween::*;
pub use view::*;
