//! Main loop, control signals and backends
//!
//! ```text
//! Backend::poll → Game::dispatch (global, then top-level interfaces)
//!                     ↓ Signal::Quit / Signal::Switch settled here
//!               → Game::render (same order) → Backend::flip → FrameClock::tick
//! ```

mod backend;
mod clock;
mod headless;
mod runner;
mod signal;
mod surface;
mod terminal;

pub use backend::Backend;
pub use clock::FrameClock;
pub use headless::HeadlessBackend;
pub use runner::{Game, Outcome};
pub use signal::{HandlerResult, Interrupt, Signal, quit, switch_interface};
pub use surface::TextSurface;
pub use terminal::TerminalBackend;
