//! Control signals raised by handlers and interpreted at the loop boundary

use crate::error::Error;

/// A recognized, non-error request to change the flow of the main loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Stop the main loop
    Quit,
    /// Deactivate every interface, then activate the named one
    Switch(String),
}

/// Anything that unwinds a dispatch or render pass
///
/// Signals are expected and handled by [`Game`](super::Game); errors end the
/// run and are handed back to the caller of `run`.
#[derive(Debug)]
pub enum Interrupt {
    Signal(Signal),
    Error(Error),
}

/// What every event handler and frame callback returns
pub type HandlerResult = Result<(), Interrupt>;

impl From<Signal> for Interrupt {
    fn from(signal: Signal) -> Self {
        Interrupt::Signal(signal)
    }
}

impl From<Error> for Interrupt {
    fn from(error: Error) -> Self {
        Interrupt::Error(error)
    }
}

impl From<anyhow::Error> for Interrupt {
    fn from(error: anyhow::Error) -> Self {
        Interrupt::Error(Error::Handler(error))
    }
}

/// Raises the quit signal
///
/// ```
/// use interface_manager::engine::{HandlerResult, quit};
///
/// fn on_escape(_args: &[interface_manager::input::Value]) -> HandlerResult {
///     quit()
/// }
/// ```
pub fn quit() -> HandlerResult {
    Err(Signal::Quit.into())
}

/// Raises the switch-interface signal for `name`
pub fn switch_interface(name: impl Into<String>) -> HandlerResult {
    Err(Signal::Switch(name.into()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_raises_signal() {
        assert!(matches!(quit(), Err(Interrupt::Signal(Signal::Quit))));
    }

    #[test]
    fn test_switch_carries_target() {
        match switch_interface("menu") {
            Err(Interrupt::Signal(Signal::Switch(name))) => assert_eq!(name, "menu"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_anyhow_error_becomes_handler_error() {
        let interrupt: Interrupt = anyhow::anyhow!("boom").into();
        assert!(matches!(interrupt, Interrupt::Error(Error::Handler(_))));
    }
}
