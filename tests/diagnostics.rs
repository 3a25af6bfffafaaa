//! Integration tests for the setup diagnostics

use interface_manager::engine::{Game, TextSurface};
use interface_manager::health::{self, CheckStatus, HealthCheckRunner, SystemCheck, checks::*};
use interface_manager::input::{EventKind, Trigger};
use interface_manager::{EngineConfig, quit};

fn game() -> Game<TextSurface> {
    let game = Game::new(EngineConfig::default()).unwrap();
    game.create_interface("menu").unwrap().activate();
    game
}

#[test]
fn test_all_checks_on_a_sound_setup() {
    let report = health::run_all_checks(&game());

    if !report.is_healthy() {
        eprintln!("\n{}", health::format_report(&report));
    }
    assert!(
        report.is_healthy(),
        "Diagnostics failed: {} failures, {} warnings",
        report.failed,
        report.warned
    );
    assert_eq!(report.total(), 5);
}

#[test]
fn test_unreachable_interface_warns() {
    let game = game();
    let play = game.create_interface("play").unwrap();
    let pause = game.create_interface("pause").unwrap();
    play.register_interface(&pause).unwrap();
    pause.activate();

    let result = InterfaceTreeCheck::new().check(&game);
    assert_eq!(result.status, CheckStatus::Warn);
    assert!(result.details.iter().any(|d| d.contains("'pause'")));
}

#[test]
fn test_nothing_active_warns() {
    let game: Game<TextSurface> = Game::new(EngineConfig::default()).unwrap();
    game.create_interface("menu").unwrap();
    let result = InterfaceTreeCheck::new().check(&game);
    assert_eq!(result.status, CheckStatus::Warn);
}

#[test]
fn test_duplicate_quit_handler_fails() {
    let game = game();
    game.get_interface("menu")
        .unwrap()
        .event(Trigger::new(EventKind::Quit), |_| quit());

    let report = health::run_all_checks(&game);
    assert!(!report.is_healthy());
    assert_eq!(report.exit_code(), 1);
    let quit_check = report.result("Quit Handler").unwrap();
    assert!(quit_check.status.is_fail());
    assert_eq!(quit_check.details.len(), 2);
}

#[test]
fn test_missing_quit_handler_warns() {
    let game: Game<TextSurface> = Game::new(EngineConfig::default().with_quit(false)).unwrap();
    let result = QuitHandlerCheck::new().check(&game);
    assert_eq!(result.status, CheckStatus::Warn);
}

struct Unregistered;

#[test]
fn test_unregistered_method_class_warns() {
    let game = game();
    let menu = game.get_interface("menu").unwrap();
    menu.method_event(Trigger::<Unregistered>::new(EventKind::Click), |_, _| Ok(()));

    let result = MethodClassCheck::new().check(&game);
    assert_eq!(result.status, CheckStatus::Warn);
    assert!(result.details[0].contains("Unregistered"));

    menu.register_cls::<Unregistered>();
    let result = MethodClassCheck::new().check(&game);
    assert_eq!(result.status, CheckStatus::Pass);
}

#[test]
fn test_build_info_check() {
    let result = BuildInfoCheck::new().check(&game());
    assert!(result.status.is_ok(), "Build info check failed: {}", result.message);
    assert!(!result.details.is_empty());
}

#[test]
fn test_runner_collects_all_checks() {
    let runner = HealthCheckRunner::new()
        .add_check(QuitHandlerCheck::new())
        .add_check(BuildInfoCheck::new());
    let report = runner.run(&game());

    assert_eq!(report.total(), 2, "Expected 2 checks in report");
    assert_eq!(report.passed + report.warned + report.failed, report.total());
    assert_eq!(report.exit_code(), 0);
}
