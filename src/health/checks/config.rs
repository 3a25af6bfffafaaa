//! Configuration check

use crate::config::EngineConfig;
use crate::engine::Game;
use crate::health::check::{CheckResult, SystemCheck};

/// Validates the engine's configuration and that every profile loads
pub struct ConfigCheck {
    profiles: Vec<String>,
}

impl ConfigCheck {
    /// Checks the debug and release profiles
    pub fn new() -> Self {
        Self::with_profiles(["debug", "release"])
    }

    pub fn with_profiles<I, P>(profiles: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            profiles: profiles.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> SystemCheck<S> for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates the running configuration and the profile files")
    }

    fn check(&self, game: &Game<S>) -> CheckResult {
        let config = game.config();
        let mut details = vec![format!(
            "✓ Running profile '{}': fps={}, quit={}, log filter '{}'",
            config.profile, config.fps, config.quit, config.logging.filter
        )];
        if let Err(e) = config.validate() {
            details.push(format!("✗ {e}"));
            return CheckResult::fail("Running configuration is invalid").with_details(details);
        }

        let mut failed = 0;
        for profile in &self.profiles {
            match EngineConfig::load(profile) {
                Ok(loaded) => details.push(format!(
                    "✓ Profile '{profile}': fps={}, quit={}",
                    loaded.fps, loaded.quit
                )),
                Err(e) => {
                    failed += 1;
                    details.push(format!("⚠ Profile '{profile}': {e}"));
                }
            }
        }

        if failed > 0 {
            CheckResult::warn(format!("{failed} profile(s) failed to load")).with_details(details)
        } else {
            CheckResult::pass(format!("{} fps target, {} profiles loaded", config.fps, self.profiles.len()))
                .with_details(details)
        }
    }
}
