//! Setup diagnostics for a constructed engine
//!
//! Catches registration mistakes before the main loop starts:
//! - Invalid configuration or unreadable profile files
//! - Active interfaces hidden under an inactive ancestor
//! - A quit handler count that would make `run` fail
//! - Method handlers for classes that are never tracked
//!
//! # Example
//!
//! ```
//! use interface_manager::config::EngineConfig;
//! use interface_manager::engine::{Game, TextSurface};
//! use interface_manager::health;
//!
//! let game: Game<TextSurface> = Game::new(EngineConfig::default()).unwrap();
//! game.create_interface("menu").unwrap().activate();
//!
//! let report = health::run_all_checks(&game);
//! assert!(report.is_healthy());
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

pub use check::{CheckResult, CheckStatus, SystemCheck};
pub use reporter::{format_report, print_report};
pub use runner::{HealthCheckReport, HealthCheckRunner};

use crate::engine::Game;

/// The default check suite
pub fn default_runner<S: 'static>() -> HealthCheckRunner<S> {
    HealthCheckRunner::new()
        .add_check(checks::ConfigCheck::new())
        .add_check(checks::InterfaceTreeCheck::new())
        .add_check(checks::QuitHandlerCheck::new())
        .add_check(checks::MethodClassCheck::new())
        .add_check(checks::BuildInfoCheck::new())
}

/// Runs the default checks against `game`
pub fn run_all_checks<S: 'static>(game: &Game<S>) -> HealthCheckReport {
    default_runner().run(game)
}
