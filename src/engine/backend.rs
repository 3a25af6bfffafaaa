//! Surface and event source the main loop runs against

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::input::EventRecord;

/// Platform side of the main loop
///
/// The engine never constructs a backend or its surface; it only polls,
/// forwards the surface to frame callbacks, flips, and tears down.
pub trait Backend {
    /// Surface handed to frame callbacks
    type Surface: 'static;

    /// Every event pending since the last poll, in arrival order
    fn poll(&mut self) -> anyhow::Result<Vec<EventRecord>>;

    fn surface(&mut self) -> &mut Self::Surface;

    /// Presents the frame drawn onto the surface
    fn flip(&mut self) -> anyhow::Result<()>;

    /// Releases the platform resources
    ///
    /// [`Game::run`](super::Game::run) calls this exactly once per run, on
    /// every exit path.
    fn teardown(&mut self);
}

/// Scoped owner of a running backend; tears it down when dropped
pub(crate) struct TeardownGuard<'a, B: Backend> {
    backend: &'a mut B,
}

impl<'a, B: Backend> TeardownGuard<'a, B> {
    pub(crate) fn new(backend: &'a mut B) -> Self {
        Self { backend }
    }
}

impl<B: Backend> Deref for TeardownGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: Backend> DerefMut for TeardownGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: Backend> Drop for TeardownGuard<'_, B> {
    fn drop(&mut self) {
        debug!("Tearing down backend");
        self.backend.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::HeadlessBackend;

    #[test]
    fn test_guard_tears_down_once_on_drop() {
        let mut backend = HeadlessBackend::new(4, 2);
        {
            let mut guard = TeardownGuard::new(&mut backend);
            guard.flip().unwrap();
        }
        assert_eq!(backend.teardowns(), 1);
        assert_eq!(backend.flips(), 1);
    }

    #[test]
    fn test_guard_tears_down_on_panic() {
        let mut backend = HeadlessBackend::new(4, 2);
        let result: std::thread::Result<()> = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = TeardownGuard::new(&mut backend);
            panic!("handler exploded");
        }));
        assert!(result.is_err());
        assert_eq!(backend.teardowns(), 1);
    }
}
