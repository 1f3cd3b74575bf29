//! # pm-game — Prize Machine outcome coordinator
//!
//! Owns the spin session and everything that happens around it: the launch
//! configuration, asset availability, the outcome decision, the machine
//! body's presentation effects and the lose-path recommendation wall.
//!
//! ## Flow
//!
//! ```text
//! GameLaunchConfig ──► OutcomePolicy ──► has_won (decided once)
//!                                            │
//!                          Game::spin ───────┤
//!                                            v
//!                               SpinSession barrier
//!                                            │
//!                  ┌─────────────────────────┴──────────────────────┐
//!                  v (won)                                          v (lost)
//!     win flash → curtain open → glow pulse      lose fade → click-through → wall
//!                                 (background)
//! ```

pub mod assets;
pub mod button;
pub mod click;
pub mod config;
pub mod error;
pub mod game;
pub mod machine_body;
pub mod outcome;
pub mod scene;
pub mod wall;

pub use assets::*;
pub use button::*;
pub use click::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use machine_body::*;
pub use outcome::*;
pub use scene::*;
pub use wall::*;
