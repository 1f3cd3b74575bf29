//! Outcome selection
//!
//! How `has_won` is decided is the host's business. The coordinator asks a
//! policy exactly once per game, before the first spin.

use crate::config::GameLaunchConfig;

pub trait OutcomePolicy: Send + Sync {
    fn decide(&self, config: &GameLaunchConfig) -> bool;

    fn name(&self) -> &'static str;
}

/// Use the launch config's `hasWon`
#[derive(Debug, Clone, Copy, Default)]
pub struct FromConfig;

impl OutcomePolicy for FromConfig {
    fn decide(&self, config: &GameLaunchConfig) -> bool {
        config.has_won
    }

    fn name(&self) -> &'static str {
        "from_config"
    }
}

/// Always win; demo builds
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysWin;

impl OutcomePolicy for AlwaysWin {
    fn decide(&self, _config: &GameLaunchConfig) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "always_win"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies() {
        let lost = GameLaunchConfig::default().with_has_won(false);
        assert!(!FromConfig.decide(&lost));
        assert!(FromConfig.decide(&lost.clone().with_has_won(true)));
        assert!(AlwaysWin.decide(&lost));
    }
}
