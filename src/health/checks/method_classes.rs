//! Method handler class check

use crate::engine::Game;
use crate::health::check::{CheckResult, SystemCheck};

/// Finds method handlers whose class is not registered on their interface
///
/// Such handlers never fire: no instance of the class can be tracked there.
#[derive(Default)]
pub struct MethodClassCheck;

impl MethodClassCheck {
    pub fn new() -> Self {
        Self
    }
}

impl<S: 'static> SystemCheck<S> for MethodClassCheck {
    fn name(&self) -> &'static str {
        "Method Classes"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Checks that every method handler's class is registered")
    }

    fn check(&self, game: &Game<S>) -> CheckResult {
        let mut bound = 0;
        let mut orphans = Vec::new();
        for interface in std::iter::once(game.global().clone()).chain(game.registry().interfaces()) {
            for (id, class) in interface.handlers().bound_classes() {
                bound += 1;
                if !interface.tracker().is_registered_id(id) {
                    orphans.push(format!("⚠ {class} on '{}'", interface.name()));
                }
            }
        }

        if orphans.is_empty() {
            CheckResult::pass(format!("{bound} bound class(es), all registered"))
        } else {
            CheckResult::warn(format!("{} method handler class(es) never registered", orphans.len()))
                .with_details(orphans)
        }
    }
}
