//! Stage — The core enum defining all canonical session phases
//!
//! A Stage is NOT an animation, NOT a renderer call.
//! A Stage is the SEMANTIC MEANING of a moment in the session flow.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bounded or unbounded presentation effect driven by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationEffect {
    /// Bulb flash played right after a win
    WinFlash,
    /// Curtains sliding open to reveal the prize
    CurtainOpen,
    /// Endless glow pulse (never awaited)
    GlowPulse,
    /// Lights dimming after a loss
    LoseFade,
    /// Wall of recommended games shown after a loss
    RecommendationWall,
}

impl PresentationEffect {
    /// Does this effect belong to the win branch?
    pub fn is_win_branch(&self) -> bool {
        matches!(self, Self::WinFlash | Self::CurtainOpen | Self::GlowPulse)
    }

    /// Does this effect belong to the lose branch?
    pub fn is_lose_branch(&self) -> bool {
        !self.is_win_branch()
    }

    /// Bounded effects are awaited by the coordinator
    pub fn is_bounded(&self) -> bool {
        !matches!(self, Self::GlowPulse)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::WinFlash => "Win Flash",
            Self::CurtainOpen => "Curtain Open",
            Self::GlowPulse => "Glow Pulse",
            Self::LoseFade => "Lose Fade",
            Self::RecommendationWall => "Recommendation Wall",
        }
    }
}

/// Canonical session stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Coordinator triggered the spin session
    SpinStart,

    /// Reel left its stagger delay and started rotating
    ReelSpinning {
        /// Which reel (0 = left)
        reel_index: u8,
    },

    /// Reel reached mechanical rest
    ReelStop {
        /// Which reel stopped
        reel_index: u8,
        /// Face shown by the read head
        symbol: String,
    },

    /// Reel did not settle in time and was stopped on its current face
    ReelForceSettled {
        /// Which reel
        reel_index: u8,
        /// Face shown by the read head
        symbol: String,
    },

    /// Session barrier released: every reel is settled
    SessionSettled {
        /// At least one reel had to be force-settled
        #[serde(default)]
        degraded: bool,
    },

    /// Coordinator picked the presentation branch
    OutcomeResolved {
        /// Session outcome decided before the spin
        has_won: bool,
    },

    /// Coordinator finished dispatching the branch
    SpinEnd,

    // ═══════════════════════════════════════════════════════════════════════
    // PRESENTATION
    // ═══════════════════════════════════════════════════════════════════════
    /// Presentation effect started
    PresentationStart {
        effect: PresentationEffect,
    },

    /// Bounded presentation effect completed
    PresentationEnd {
        effect: PresentationEffect,
    },

    /// Background presentation effect was torn down
    PresentationCancelled {
        effect: PresentationEffect,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // INTERACTION
    // ═══════════════════════════════════════════════════════════════════════
    /// Click-through handler attached to the scene
    ClickThroughAttached,

    /// Pointer hit a tagged object and a redirect was dispatched
    Navigate {
        destination: String,
    },
}

impl Stage {
    /// Get the category for this stage
    pub fn category(&self) -> StageCategory {
        match self {
            Stage::SpinStart
            | Stage::ReelSpinning { .. }
            | Stage::ReelStop { .. }
            | Stage::ReelForceSettled { .. }
            | Stage::SessionSettled { .. }
            | Stage::OutcomeResolved { .. }
            | Stage::SpinEnd => StageCategory::SpinLifecycle,

            Stage::PresentationStart { .. }
            | Stage::PresentationEnd { .. }
            | Stage::PresentationCancelled { .. } => StageCategory::Presentation,

            Stage::ClickThroughAttached | Stage::Navigate { .. } => StageCategory::Interaction,
        }
    }

    /// Get the snake_case type name of this stage
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart => "spin_start",
            Stage::ReelSpinning { .. } => "reel_spinning",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::ReelForceSettled { .. } => "reel_force_settled",
            Stage::SessionSettled { .. } => "session_settled",
            Stage::OutcomeResolved { .. } => "outcome_resolved",
            Stage::SpinEnd => "spin_end",
            Stage::PresentationStart { .. } => "presentation_start",
            Stage::PresentationEnd { .. } => "presentation_end",
            Stage::PresentationCancelled { .. } => "presentation_cancelled",
            Stage::ClickThroughAttached => "click_through_attached",
            Stage::Navigate { .. } => "navigate",
        }
    }

    /// Reel index for per-reel stages
    pub fn reel_index(&self) -> Option<u8> {
        match self {
            Stage::ReelSpinning { reel_index }
            | Stage::ReelStop { reel_index, .. }
            | Stage::ReelForceSettled { reel_index, .. } => Some(*reel_index),
            _ => None,
        }
    }

    /// Presentation effect for presentation stages
    pub fn effect(&self) -> Option<PresentationEffect> {
        match self {
            Stage::PresentationStart { effect }
            | Stage::PresentationEnd { effect }
            | Stage::PresentationCancelled { effect } => Some(*effect),
            _ => None,
        }
    }

    /// Does this stage mark a reel at rest?
    pub fn is_reel_rest(&self) -> bool {
        matches!(self, Stage::ReelStop { .. } | Stage::ReelForceSettled { .. })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ReelSpinning { reel_index } => write!(f, "REEL_SPINNING_{}", reel_index),
            Stage::ReelStop { reel_index, symbol } => {
                write!(f, "REEL_STOP_{} [{}]", reel_index, symbol)
            }
            Stage::ReelForceSettled { reel_index, symbol } => {
                write!(f, "REEL_FORCE_SETTLED_{} [{}]", reel_index, symbol)
            }
            Stage::SessionSettled { degraded } => {
                write!(f, "SESSION_SETTLED{}", if *degraded { " (degraded)" } else { "" })
            }
            Stage::OutcomeResolved { has_won } => {
                write!(f, "OUTCOME_RESOLVED [{}]", if *has_won { "win" } else { "lose" })
            }
            Stage::PresentationStart { effect } => {
                write!(f, "PRESENTATION_START [{}]", effect.display_name())
            }
            Stage::PresentationEnd { effect } => {
                write!(f, "PRESENTATION_END [{}]", effect.display_name())
            }
            Stage::PresentationCancelled { effect } => {
                write!(f, "PRESENTATION_CANCELLED [{}]", effect.display_name())
            }
            Stage::Navigate { destination } => write!(f, "NAVIGATE [{}]", destination),
            other => write!(f, "{}", other.type_name().to_uppercase()),
        }
    }
}

/// Stage categories for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    SpinLifecycle,
    Presentation,
    Interaction,
}
