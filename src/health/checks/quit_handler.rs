//! Quit handler check

use crate::engine::Game;
use crate::health::check::{CheckResult, SystemCheck};
use crate::input::EventKind;

/// Applies the run-start quit handler rule ahead of time
#[derive(Default)]
pub struct QuitHandlerCheck;

impl QuitHandlerCheck {
    pub fn new() -> Self {
        Self
    }
}

impl<S: 'static> SystemCheck<S> for QuitHandlerCheck {
    fn name(&self) -> &'static str {
        "Quit Handler"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Checks that exactly one quit handler exists across the system")
    }

    fn check(&self, game: &Game<S>) -> CheckResult {
        let holders: Vec<String> = std::iter::once(game.global().clone())
            .chain(game.registry().interfaces())
            .filter_map(|i| match i.count_handlers(EventKind::Quit) {
                0 => None,
                n => Some(format!("{}: {n}", i.name())),
            })
            .collect();

        match game.check_quit_handlers() {
            Err(e) => CheckResult::fail(e.to_string()).with_details(holders),
            Ok(()) if holders.is_empty() => {
                CheckResult::warn("No quit handler, only an interrupt can stop the run")
            }
            Ok(()) => CheckResult::pass("One quit handler").with_details(holders),
        }
    }
}
