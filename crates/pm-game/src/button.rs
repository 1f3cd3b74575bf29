//! Spin button state

use serde::{Deserialize, Serialize};

use crate::config::GameLaunchConfig;

/// What a button press asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    Spin,
    ClaimPrize,
}

pub const SPIN_LABEL: &str = "Spin here";
pub const CLAIM_LABEL: &str = "Claim Prize";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpinButton {
    pub can_spin: bool,
    pub is_spinning: bool,
    pub has_spun: bool,
    pub has_won: bool,
}

impl SpinButton {
    pub fn from_config(config: &GameLaunchConfig) -> Self {
        Self {
            can_spin: config.can_spin,
            is_spinning: config.is_spinning,
            has_spun: config.has_spun,
            has_won: config.has_won,
        }
    }

    /// Hidden after a lost spin, while spinning, or when spinning is disallowed
    pub fn is_visible(&self) -> bool {
        let lost = self.has_spun && !self.has_won;
        !lost && self.can_spin && !self.is_spinning
    }

    pub fn label(&self) -> Option<&'static str> {
        if !self.is_visible() {
            return None;
        }
        Some(if self.has_spun && self.has_won {
            CLAIM_LABEL
        } else {
            SPIN_LABEL
        })
    }

    pub fn click(&self) -> Option<ButtonAction> {
        if !self.is_visible() {
            None
        } else if !self.has_spun {
            Some(ButtonAction::Spin)
        } else if self.has_won {
            Some(ButtonAction::ClaimPrize)
        } else {
            None
        }
    }
}
