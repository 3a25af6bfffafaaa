//! Crate-wide error type

use thiserror::Error;

use crate::input::EventKind;

/// Errors raised by interface construction, dispatch, and the main loop
#[derive(Debug, Error)]
pub enum Error {
    /// Lookup of an interface name that was never created
    #[error("interface '{0}' does not exist")]
    InterfaceNotFound(String),

    /// A second interface was created with a name that is already taken
    #[error("interface '{0}' already exists")]
    InterfaceExists(String),

    /// The child already belongs to another interface
    #[error("interface '{child}' is already a subinterface of '{parent}'")]
    DuplicateChild { child: String, parent: String },

    /// Registering the child would close a cycle in the interface tree
    #[error("interface '{child}' cannot be registered under '{parent}', which it contains")]
    CyclicChild { child: String, parent: String },

    /// A predicate or declared parameter names an attribute the record lacks
    #[error("{kind:?} event has no attribute '{attribute}'")]
    AttributeMismatch { kind: EventKind, attribute: String },

    /// More than one quit handler is registered across the whole system
    #[error("found {count} quit handlers, exactly one is allowed")]
    DuplicateQuitHandler { count: usize },

    #[error("class {0} is not registered on this interface")]
    ClassNotRegistered(&'static str),

    #[error("an instance of {0} is already borrowed")]
    InstanceBusy(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error("failed to install interrupt handler: {0}")]
    InterruptHandler(#[from] ctrlc::Error),

    /// An application handler failed with something other than a signal
    #[error("handler failed: {0:#}")]
    Handler(anyhow::Error),

    #[error("backend failed: {0:#}")]
    Backend(anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
