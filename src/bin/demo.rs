//! Terminal demo: a menu, a play screen with a pause popup, and clickable
//! counters
//!
//! Run with `--check` to print the setup diagnostics instead.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use interface_manager::engine::{Game, TerminalBackend, TextSurface, quit, switch_interface};
use interface_manager::input::{EventKind, Instance, KeyCode, MouseButton, Trigger};
use interface_manager::{EngineConfig, Group, health, interrupt, logging};

#[derive(Debug, Parser)]
#[command(name = "demo", version, about = "Interface manager terminal demo")]
struct Cli {
    /// Configuration profile (defaults to $ENGINE_PROFILE, then "debug")
    #[arg(long)]
    profile: Option<String>,

    /// Override the target frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Print setup diagnostics and exit
    #[arg(long)]
    check: bool,
}

/// A clickable box that counts left clicks inside it
struct Counter {
    label: &'static str,
    x: i32,
    y: i32,
    width: i32,
    clicks: u32,
}

impl Counter {
    fn contains(&self, (x, y): (i32, i32)) -> bool {
        y == self.y && x >= self.x && x < self.x + self.width
    }
}

/// Builds the interface tree; the returned counters must outlive the run,
/// since interfaces only track them weakly
fn build(config: EngineConfig) -> anyhow::Result<(Game<TextSurface>, Vec<Instance<Counter>>)> {
    let game = Game::new(config)?;

    game.frame(|surface: &mut TextSurface| {
        surface.clear();
        Ok(())
    });

    let menu = game.create_interface("menu")?;
    let play = game.create_interface("play")?;
    let pause = game.create_interface("pause")?;
    play.register_interface(&pause)?;

    menu.frame(|surface: &mut TextSurface| {
        surface.put_str(2, 1, "INTERFACE MANAGER DEMO");
        surface.put_str(2, 3, "[enter] or click: play");
        Ok(())
    });
    menu.event(Trigger::new(EventKind::KeyPress).eq("key", KeyCode::Enter), |_| {
        switch_interface("play")
    });
    menu.event(Trigger::new(EventKind::Click).eq("button", MouseButton::Left), |_| {
        switch_interface("play")
    });

    let counters = play.register_cls::<Counter>();
    let owned = vec![
        counters.spawn(Counter { label: "left", x: 2, y: 3, width: 12, clicks: 0 }),
        counters.spawn(Counter { label: "right", x: 18, y: 3, width: 12, clicks: 0 }),
    ];
    play.method_event(
        Trigger::new(EventKind::Click)
            .eq("button", MouseButton::Left)
            .bound("pos", |c: &Counter, v| v.as_point().is_some_and(|p| c.contains(p))),
        |counter, _| {
            counter.clicks += 1;
            info!(counter = counter.label, clicks = counter.clicks, "Counter clicked");
            Ok(())
        },
    );
    play.method_frame(|counter: &mut Counter, surface: &mut TextSurface| {
        let text = format!("[{} {:>3}]", counter.label, counter.clicks);
        surface.put_str(counter.x, counter.y, &text);
        Ok(())
    });
    play.frame(|surface: &mut TextSurface| {
        surface.put_str(2, 1, "PLAY  click a counter, [space] pause");
        Ok(())
    });
    let popup = pause.clone();
    play.event(Trigger::new(EventKind::KeyPress).eq("key", KeyCode::Space), move |_| {
        if popup.is_active() {
            popup.deactivate();
        } else {
            popup.activate();
        }
        Ok(())
    });

    pause.frame(|surface: &mut TextSurface| {
        surface.put_str(6, 5, "+----------+");
        surface.put_str(6, 6, "|  PAUSED  |");
        surface.put_str(6, 7, "+----------+");
        Ok(())
    });

    let screens = Group::new(game.registry(), "screens", ["menu", "play"]);
    screens.event(Trigger::new(EventKind::KeyPress).eq("key", KeyCode::Escape), |_| {
        switch_interface("menu")
    })?;
    screens.event(Trigger::new(EventKind::KeyPress).eq("key", KeyCode::Q), |_| quit())?;
    screens.frame(|surface: &mut TextSurface| {
        let (_, height) = surface.size();
        surface.put_str(2, i32::from(height) - 1, "[esc] menu  [q] quit");
        Ok(())
    })?;

    menu.activate();
    Ok((game, owned))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.profile {
        Some(profile) => EngineConfig::load(profile)?,
        None => EngineConfig::load_from_env()?,
    };
    if let Some(fps) = cli.fps {
        config = config.with_fps(fps);
    }

    logging::init(&config.logging)?;
    let (game, _counters) = build(config)?;

    if cli.check {
        let report = health::run_all_checks(&game);
        health::print_report(&report);
        return Ok(ExitCode::from(u8::try_from(report.exit_code()).unwrap_or(1)));
    }

    interrupt::install(&game.interrupt_handle())?;
    let mut backend = TerminalBackend::new()
        .context("Failed to start terminal backend")?
        .with_interrupt(game.interrupt_handle());
    game.run(&mut backend)?;
    Ok(ExitCode::SUCCESS)
}
