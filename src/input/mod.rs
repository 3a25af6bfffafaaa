//! Input handling system
//!
//! Provides the event side of the engine:
//! - Event records: a kind tag plus ordered, named attributes
//! - Triggers that select records by kind and attribute predicates
//! - Handler registries that run matching handlers in registration order
//! - Instance tracking, so method handlers fire once per live instance
//!
//! # Architecture
//!
//! ```text
//! Raw Input (crossterm) → InputCollector → EventRecord
//!                                              ↓
//!                                     Interface tree (active only)
//!                                              ↓
//!                                      HandlerRegistry
//!                                  (Trigger match → callback,
//!                                   per tracked instance for
//!                                   method handlers)
//! ```
//!
//! # Usage
//!
//! ```
//! use interface_manager::input::{EventKind, EventRecord, MouseButton, Trigger};
//!
//! let record = EventRecord::click(MouseButton::Left, (10, 10));
//! let trigger: Trigger = Trigger::new(EventKind::Click)
//!     .eq("button", MouseButton::Left)
//!     .param("pos");
//! assert!(trigger.matches(&record, &()).unwrap());
//! ```

mod collector;
mod events;
mod handler;
mod predicate;
mod tracker;

pub use collector::InputCollector;
pub use events::{EventKind, EventRecord, KeyCode, Modifiers, MouseButton, Value};
pub use handler::{FreeCallback, Handler, HandlerRegistry, MethodCallback};
pub use predicate::{Predicate, Trigger};
pub use tracker::{ClassHandle, Instance, InstanceTracker};
