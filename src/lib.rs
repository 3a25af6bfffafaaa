//! Interface Manager
//!
//! Interface activation hierarchy and event dispatch engine for
//! frame-stepped interactive applications.

/// Build-time information (rustc, target, timestamps)
pub mod build_info;

/// Engine configuration profiles
pub mod config;

/// Main loop, control signals and backends
pub mod engine;

mod error;

/// Setup diagnostics
pub mod health;

/// Event records, triggers, handler registries and instance tracking
pub mod input;

/// Interfaces, the interface registry and groups
pub mod interface;

/// Environment interrupts (Ctrl+C)
pub mod interrupt;

/// Tracing subscriber setup
pub mod logging;

pub use config::EngineConfig;
pub use engine::{Game, HandlerResult, Outcome, quit, switch_interface};
pub use error::{Error, Result};
pub use interface::{Group, Interface, Registry};
