//! Dispatch engine and main loop

use tracing::{debug, error, info, trace, warn};

use super::backend::{Backend, TeardownGuard};
use super::clock::FrameClock;
use super::signal::{HandlerResult, Interrupt, Signal, quit};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::input::{ClassHandle, EventKind, EventRecord, Instance, Trigger, Value};
use crate::interface::{Interface, Registry};
use crate::interrupt::InterruptFlag;

/// Name of the hidden interface holding global handlers and frames
const GLOBAL_INTERFACE: &str = "_main";

/// What a dispatch or render pass led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// A switch signal was applied
    Switched,
    /// The quit signal was raised
    Quit,
}

/// The dispatch engine
///
/// Owns the interface registry and a hidden, always-active global interface.
/// Each record goes to the global handlers first, then to every top-level
/// interface in creation order; frames are rendered in the same order.
pub struct Game<S: 'static> {
    config: EngineConfig,
    registry: Registry<S>,
    global: Interface<S>,
    interrupt: InterruptFlag,
}

impl<S: 'static> Game<S> {
    /// Creates an engine with an empty registry
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if the configuration does not validate.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_registry(config, Registry::new())
    }

    /// Creates an engine over interfaces that already exist
    pub fn with_registry(config: EngineConfig, registry: Registry<S>) -> Result<Self> {
        config.validate()?;

        let global = Interface::new(GLOBAL_INTERFACE);
        global.activate();
        if config.quit {
            global.event(Trigger::new(EventKind::Quit), |_| quit());
        }
        info!(profile = %config.profile, fps = config.fps, quit = config.quit, "Engine created");

        Ok(Self {
            config,
            registry,
            global,
            interrupt: InterruptFlag::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    /// The interface holding global handlers and frames
    pub fn global(&self) -> &Interface<S> {
        &self.global
    }

    /// Flag that stops the run when raised; see [`crate::interrupt::install`]
    pub fn interrupt_handle(&self) -> InterruptFlag {
        self.interrupt.clone()
    }

    pub fn create_interface(&self, name: impl Into<String>) -> Result<Interface<S>> {
        self.registry.create_interface(name)
    }

    pub fn get_interface(&self, name: &str) -> Result<Interface<S>> {
        self.registry.get_interface(name)
    }

    /// Registers a global handler
    pub fn event<F>(&self, trigger: Trigger, callback: F)
    where
        F: Fn(&[Value]) -> HandlerResult + 'static,
    {
        self.global.event(trigger, callback);
    }

    /// Registers a global method handler for class `T`
    pub fn method_event<T, F>(&self, trigger: Trigger<T>, callback: F)
    where
        T: 'static,
        F: Fn(&mut T, &[Value]) -> HandlerResult + 'static,
    {
        self.global.method_event(trigger, callback);
    }

    /// Registers class `T` for global method handlers and frames
    pub fn register_cls<T: 'static>(&self) -> ClassHandle<T> {
        self.global.register_cls()
    }

    pub fn register_object<T: 'static>(&self, instance: &Instance<T>) -> Result<()> {
        self.global.register_object(instance)
    }

    /// Registers a global frame callback
    pub fn frame<F>(&self, callback: F)
    where
        F: Fn(&mut S) -> HandlerResult + 'static,
    {
        self.global.frame(callback);
    }

    pub fn method_frame<T, F>(&self, callback: F)
    where
        T: 'static,
        F: Fn(&mut T, &mut S) -> HandlerResult + 'static,
    {
        self.global.method_frame(callback);
    }

    /// Every interface that can handle events: the global one, then the
    /// registry in creation order
    fn all_interfaces(&self) -> impl Iterator<Item = Interface<S>> {
        std::iter::once(self.global.clone()).chain(self.registry.interfaces())
    }

    /// Total quit handlers across the global interface and every registry
    /// interface
    pub fn quit_handler_count(&self) -> usize {
        self.all_interfaces()
            .map(|i| i.count_handlers(EventKind::Quit))
            .sum()
    }

    /// Enforces the quit-handler rule checked when a run starts
    ///
    /// # Errors
    /// Returns [`Error::DuplicateQuitHandler`] if more than one quit handler is
    /// registered. Having none is allowed; the run then ends only on an
    /// interrupt or a `quit()` raised elsewhere.
    pub fn check_quit_handlers(&self) -> Result<()> {
        match self.quit_handler_count() {
            0 => {
                warn!("No quit handler registered");
                Ok(())
            }
            1 => Ok(()),
            count => Err(Error::DuplicateQuitHandler { count }),
        }
    }

    /// Dispatches one record and applies any signal it raised
    ///
    /// # Errors
    /// Returns the error of a handler that failed with something other than
    /// a signal.
    pub fn dispatch(&self, record: &EventRecord) -> Result<Outcome> {
        trace!(kind = ?record.kind(), "Dispatching record");
        let result = self.dispatch_pass(record);
        self.settle(result)
    }

    fn dispatch_pass(&self, record: &EventRecord) -> HandlerResult {
        self.global.dispatch_event(record)?;
        for interface in self.registry.top_level() {
            // attached as a child earlier in this pass
            if interface.parent().is_some() {
                continue;
            }
            interface.dispatch_event(record)?;
        }
        Ok(())
    }

    /// Runs the global frames, then each top-level interface's render
    pub fn render(&self, surface: &mut S) -> Result<Outcome> {
        let result = self.render_pass(surface);
        self.settle(result)
    }

    fn render_pass(&self, surface: &mut S) -> HandlerResult {
        self.global.render(surface)?;
        for interface in self.registry.top_level() {
            if interface.parent().is_some() {
                continue;
            }
            interface.render(surface)?;
        }
        Ok(())
    }

    /// Interprets what a pass unwound with
    fn settle(&self, result: HandlerResult) -> Result<Outcome> {
        match result {
            Ok(()) => Ok(Outcome::Continue),
            Err(Interrupt::Signal(Signal::Quit)) => {
                info!("Quit requested");
                Ok(Outcome::Quit)
            }
            Err(Interrupt::Signal(Signal::Switch(target))) => {
                debug!(target = %target, "Switch requested");
                self.registry.switch_to(&target);
                Ok(Outcome::Switched)
            }
            Err(Interrupt::Error(e)) => {
                error!(error = %e, "Unrecovered error, stopping");
                Err(e)
            }
        }
    }

    fn interrupted(&self) -> bool {
        let raised = self.interrupt.is_raised();
        if raised {
            info!("Interrupted, stopping");
        }
        raised
    }

    /// One frame: poll, dispatch every record, render, flip
    ///
    /// A quit signal or a raised interrupt ends the frame early with
    /// [`Outcome::Quit`], skipping the remaining records of the batch. The
    /// interrupt is checked before and after polling and after each record.
    /// No pacing and no teardown; [`run`](Self::run) adds both.
    pub fn step<B>(&self, backend: &mut B) -> Result<Outcome>
    where
        B: Backend<Surface = S>,
    {
        if self.interrupted() {
            return Ok(Outcome::Quit);
        }

        let records = backend.poll().map_err(Error::Backend)?;
        if self.interrupted() {
            return Ok(Outcome::Quit);
        }
        for record in &records {
            if self.dispatch(record)? == Outcome::Quit || self.interrupted() {
                return Ok(Outcome::Quit);
            }
        }

        if self.render(backend.surface())? == Outcome::Quit {
            return Ok(Outcome::Quit);
        }
        backend.flip().map_err(Error::Backend)?;
        Ok(Outcome::Continue)
    }

    /// Runs the main loop until quit, interrupt, or an unrecovered error
    ///
    /// `backend` is torn down exactly once when this returns, whatever the
    /// reason, including a panic in a handler.
    ///
    /// # Errors
    /// - [`Error::DuplicateQuitHandler`] before the first frame
    /// - the first unrecovered handler error
    /// - [`Error::Backend`] if polling or flipping fails
    pub fn run<B>(&self, backend: &mut B) -> Result<()>
    where
        B: Backend<Surface = S>,
    {
        let mut backend = TeardownGuard::new(backend);
        self.interrupt.reset();
        self.check_quit_handlers()?;

        info!(fps = self.config.fps, interfaces = self.registry.len(), "Starting main loop");
        let mut clock = FrameClock::new(self.config.fps);
        while self.step(&mut *backend)? != Outcome::Quit {
            clock.tick();
        }
        info!(frames = clock.frames(), "Main loop stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::switch_interface;

    fn game() -> Game<Vec<String>> {
        Game::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_zero_fps_is_rejected() {
        let result = Game::<()>::new(EngineConfig::default().with_fps(0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_default_quit_handler() {
        let game = game();
        assert_eq!(game.quit_handler_count(), 1);
        assert_eq!(game.dispatch(&EventRecord::quit()).unwrap(), Outcome::Quit);
    }

    #[test]
    fn test_user_quit_handler_alongside_default_is_rejected() {
        let game = game();
        let menu = game.create_interface("menu").unwrap();
        menu.event(Trigger::new(EventKind::Quit), |_| quit());
        assert!(matches!(
            game.check_quit_handlers(),
            Err(Error::DuplicateQuitHandler { count: 2 })
        ));
    }

    #[test]
    fn test_no_quit_handler_is_allowed() {
        let game = Game::<()>::new(EngineConfig::default().with_quit(false)).unwrap();
        assert_eq!(game.quit_handler_count(), 0);
        assert!(game.check_quit_handlers().is_ok());
        assert_eq!(game.dispatch(&EventRecord::quit()).unwrap(), Outcome::Continue);
    }

    #[test]
    fn test_switch_signal_is_applied() {
        let game = game();
        let menu = game.create_interface("menu").unwrap();
        let play = game.create_interface("play").unwrap();
        menu.activate();
        menu.event(Trigger::new(EventKind::KeyPress), |_| switch_interface("play"));

        let record = EventRecord::key_press(crate::input::KeyCode::Enter);
        assert_eq!(game.dispatch(&record).unwrap(), Outcome::Switched);
        assert!(!menu.is_active());
        assert!(play.is_active());
    }

    #[test]
    fn test_global_before_interfaces() {
        let game = game();
        let menu = game.create_interface("menu").unwrap();
        menu.activate();
        game.frame(|out: &mut Vec<String>| {
            out.push("global".into());
            Ok(())
        });
        menu.frame(|out: &mut Vec<String>| {
            out.push("menu".into());
            Ok(())
        });
        let mut out = Vec::new();
        assert_eq!(game.render(&mut out).unwrap(), Outcome::Continue);
        assert_eq!(out, ["global", "menu"]);
    }

    #[test]
    fn test_handler_error_is_returned() {
        let game = game();
        game.event(Trigger::new(EventKind::User(1)), |_| {
            Err(anyhow::anyhow!("broken").into())
        });
        let result = game.dispatch(&EventRecord::user(1));
        assert!(matches!(result, Err(Error::Handler(_))));
    }
}
