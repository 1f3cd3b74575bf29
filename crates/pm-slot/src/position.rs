//! Reel positions and per-reel outcomes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReelPositionError;

/// Where a reel sits in the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelPosition {
    Left,
    Middle,
    Right,
    /// Built from an out-of-scope label: no stagger slot, no forced face
    Unassigned,
}

/// The three positions a session owns, in start order
pub const REEL_POSITIONS: [ReelPosition; 3] =
    [ReelPosition::Left, ReelPosition::Middle, ReelPosition::Right];

impl ReelPosition {
    /// Index into session arrays (left = 0)
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Left => Some(0),
            Self::Middle => Some(1),
            Self::Right => Some(2),
            Self::Unassigned => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Middle => "middle",
            Self::Right => "right",
            Self::Unassigned => "unassigned",
        }
    }
}

impl FromStr for ReelPosition {
    type Err = ReelPositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "middle" => Ok(Self::Middle),
            "right" => Ok(Self::Right),
            other => Err(ReelPositionError(other.to_string())),
        }
    }
}

impl fmt::Display for ReelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a single reel is asked to commit on its final rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelOutcome {
    /// Plant the position's forced face
    Win,
    /// Finish on an ordinary face
    Lose,
    /// No opinion; finish on an ordinary face
    #[default]
    Neutral,
}

/// Per-reel outcomes for a session outcome.
///
/// The left and middle reels always spell out their forced faces; the right
/// reel completes the word only on a win.
pub fn reel_outcomes(has_won: bool) -> [ReelOutcome; 3] {
    [
        ReelOutcome::Win,
        ReelOutcome::Win,
        if has_won {
            ReelOutcome::Win
        } else {
            ReelOutcome::Lose
        },
    ]
}
