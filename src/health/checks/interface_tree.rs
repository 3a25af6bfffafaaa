//! Interface tree check

use crate::engine::Game;
use crate::health::check::{CheckResult, SystemCheck};
use crate::interface::Interface;

/// Looks for active interfaces that dispatch can never reach
///
/// An interface under an inactive ancestor keeps its own flag but is skipped
/// with the ancestor's whole subtree.
#[derive(Default)]
pub struct InterfaceTreeCheck;

impl InterfaceTreeCheck {
    pub fn new() -> Self {
        Self
    }
}

fn describe<S: 'static>(interface: &Interface<S>, depth: usize, lines: &mut Vec<String>) {
    let state = if interface.is_active() { "active" } else { "inactive" };
    lines.push(format!(
        "{}{} ({state}, {} handlers, {} frames)",
        "  ".repeat(depth),
        interface.name(),
        interface.handlers().len(),
        interface.frame_count()
    ));
    for child in interface.children() {
        describe(&child, depth + 1, lines);
    }
}

fn inactive_ancestor<S: 'static>(interface: &Interface<S>) -> Option<Interface<S>> {
    let mut node = interface.parent();
    while let Some(current) = node {
        if !current.is_active() {
            return Some(current);
        }
        node = current.parent();
    }
    None
}

impl<S: 'static> SystemCheck<S> for InterfaceTreeCheck {
    fn name(&self) -> &'static str {
        "Interface Tree"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Checks that every active interface is reachable by dispatch")
    }

    fn check(&self, game: &Game<S>) -> CheckResult {
        let registry = game.registry();
        let mut details = Vec::new();
        for interface in registry.top_level() {
            describe(&interface, 0, &mut details);
        }

        let unreachable: Vec<String> = registry
            .interfaces()
            .iter()
            .filter(|i| i.is_active())
            .filter_map(|i| {
                inactive_ancestor(i)
                    .map(|a| format!("⚠ '{}' is active under inactive '{}'", i.name(), a.name()))
            })
            .collect();

        if registry.is_empty() {
            return CheckResult::warn("No interfaces created");
        }
        if !unreachable.is_empty() {
            let message = format!("{} active interface(s) unreachable", unreachable.len());
            details.extend(unreachable);
            return CheckResult::warn(message).with_details(details);
        }
        let reachable = registry.interfaces().iter().filter(|i| i.is_reachable()).count();
        if reachable == 0 {
            return CheckResult::warn("No interface is active").with_details(details);
        }
        CheckResult::pass(format!("{} interfaces, {reachable} reachable", registry.len()))
            .with_details(details)
    }
}
