//! Renderer collaborator seams
//!
//! The core never talks to a scene graph directly. A reel drives a
//! [`ReelView`] that a [`ReelScene`] built for it; every call returns a
//! [`SceneResult`] so the reel can decide what a failure means (it logs and
//! keeps spinning).

use serde::{Deserialize, Serialize};

use crate::error::SceneResult;
use crate::position::ReelPosition;
use crate::symbols::Symbol;

// ═══════════════════════════════════════════════════════════════════════════════
// LAYOUT
// ═══════════════════════════════════════════════════════════════════════════════

/// Width of one reel along the machine's x axis
pub const REEL_WIDTH: f64 = 0.87;
/// Gap between neighbouring reels
pub const REEL_GAP: f64 = 0.025;
pub const REEL_DIAMETER: f64 = 1.1;
pub const REEL_Y: f64 = 1.112;
pub const REEL_Z: f64 = -1.806;

/// Where and how big to build one reel carousel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReelLayout {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub width: f64,
    pub diameter: f64,
    pub segments: usize,
}

impl ReelLayout {
    /// Standard placement for a position; the machine faces -x so left sits at +x
    pub fn for_position(position: ReelPosition, segments: usize) -> Self {
        let x = match position {
            ReelPosition::Left => REEL_WIDTH + REEL_GAP,
            ReelPosition::Right => -(REEL_WIDTH + REEL_GAP),
            ReelPosition::Middle | ReelPosition::Unassigned => 0.0,
        };
        Self {
            x,
            y: REEL_Y,
            z: REEL_Z,
            width: REEL_WIDTH,
            diameter: REEL_DIAMETER,
            segments,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRAITS
// ═══════════════════════════════════════════════════════════════════════════════

/// One rendered reel carousel
pub trait ReelView: Send {
    /// Rotate the whole carousel (radians, relative to its build pose)
    fn set_rotation(&mut self, radians: f64) -> SceneResult<()>;

    /// Show `symbol` on segment `index`
    fn set_segment_face(&mut self, index: usize, symbol: Symbol) -> SceneResult<()>;
}

/// Builds reel carousels in a scene
pub trait ReelScene {
    fn build_reel(
        &mut self,
        position: ReelPosition,
        layout: ReelLayout,
    ) -> SceneResult<Box<dyn ReelView>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_layout_mirrors_around_middle() {
        let left = ReelLayout::for_position(ReelPosition::Left, 4);
        let middle = ReelLayout::for_position(ReelPosition::Middle, 4);
        let right = ReelLayout::for_position(ReelPosition::Right, 4);

        assert_relative_eq!(left.x, 0.895);
        assert_relative_eq!(middle.x, 0.0);
        assert_relative_eq!(right.x, -0.895);
        assert_eq!(left.segments, 4);
        assert_relative_eq!(left.y, right.y);
    }
}
