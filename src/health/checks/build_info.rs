//! Build information check

use crate::build_info;
use crate::engine::Game;
use crate::health::check::{CheckResult, SystemCheck};

/// Reports compile-time build metadata
#[derive(Default)]
pub struct BuildInfoCheck;

impl BuildInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl<S: 'static> SystemCheck<S> for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Reports build metadata (rustc, target, timestamps)")
    }

    fn check(&self, _game: &Game<S>) -> CheckResult {
        CheckResult::pass(build_info::version_string())
            .with_details(build_info::detailed_info().lines())
    }
}
