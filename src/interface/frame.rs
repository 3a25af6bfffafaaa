//! Per-frame render callbacks

use std::any::type_name;
use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::engine::HandlerResult;
use crate::error::Error;
use crate::input::InstanceTracker;

type FreeFrame<S> = Rc<dyn Fn(&mut S) -> HandlerResult>;

trait MethodFrame<S> {
    fn render(&self, surface: &mut S, tracker: &InstanceTracker) -> HandlerResult;
}

struct BoundFrame<T, S> {
    callback: Rc<dyn Fn(&mut T, &mut S) -> HandlerResult>,
}

impl<T: 'static, S> MethodFrame<S> for BoundFrame<T, S> {
    fn render(&self, surface: &mut S, tracker: &InstanceTracker) -> HandlerResult {
        for instance in tracker.instances_of::<T>() {
            let mut receiver = instance
                .try_borrow_mut()
                .map_err(|_| Error::InstanceBusy(type_name::<T>()))?;
            (self.callback)(&mut receiver, surface)?;
        }
        Ok(())
    }
}

/// Frame callbacks of one interface
///
/// Free callbacks run first, in registration order; method callbacks follow,
/// each once per live instance of its class.
pub struct FrameCallbacks<S> {
    free: RefCell<Vec<FreeFrame<S>>>,
    methods: RefCell<Vec<Rc<dyn MethodFrame<S>>>>,
}

impl<S: 'static> FrameCallbacks<S> {
    pub fn new() -> Self {
        Self {
            free: RefCell::new(Vec::new()),
            methods: RefCell::new(Vec::new()),
        }
    }

    pub fn push(&self, callback: FreeFrame<S>) {
        self.free.borrow_mut().push(callback);
    }

    pub fn push_method<T: 'static>(&self, callback: Rc<dyn Fn(&mut T, &mut S) -> HandlerResult>) {
        trace!(class = type_name::<T>(), "Registered method frame");
        self.methods.borrow_mut().push(Rc::new(BoundFrame { callback }));
    }

    pub fn len(&self) -> usize {
        self.free.borrow().len() + self.methods.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs every callback against `surface`; the first signal stops the pass
    pub fn run(&self, surface: &mut S, tracker: &InstanceTracker) -> HandlerResult {
        let free = self.free.borrow().clone();
        for callback in free {
            callback(surface)?;
        }
        let methods = self.methods.borrow().clone();
        for frame in methods {
            frame.render(surface, tracker)?;
        }
        Ok(())
    }
}

impl<S: 'static> Default for FrameCallbacks<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ClassHandle;

    struct Sprite {
        glyph: char,
    }

    #[test]
    fn test_free_frames_run_before_method_frames() {
        let tracker = Rc::new(InstanceTracker::new());
        let class = ClassHandle::<Sprite>::new(vec![tracker.clone()]);
        let _a = class.spawn(Sprite { glyph: 'a' });
        let _b = class.spawn(Sprite { glyph: 'b' });

        let frames = FrameCallbacks::<String>::new();
        frames.push_method::<Sprite>(Rc::new(|sprite: &mut Sprite, out: &mut String| {
            out.push(sprite.glyph);
            Ok(())
        }));
        frames.push(Rc::new(|out: &mut String| {
            out.push('#');
            Ok(())
        }));

        let mut out = String::new();
        frames.run(&mut out, &tracker).unwrap();
        assert_eq!(out, "#ab");
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn test_signal_stops_frame_pass() {
        let frames = FrameCallbacks::<Vec<u8>>::new();
        frames.push(Rc::new(|_: &mut Vec<u8>| crate::engine::quit()));
        frames.push(Rc::new(|out: &mut Vec<u8>| {
            out.push(1);
            Ok(())
        }));
        let mut out = Vec::new();
        assert!(frames.run(&mut out, &InstanceTracker::new()).is_err());
        assert!(out.is_empty());
    }
}
