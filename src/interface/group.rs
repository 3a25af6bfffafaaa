//! Registration fan-out across several interfaces

use std::rc::Rc;

use tracing::debug;

use super::{Interface, Registry};
use crate::engine::HandlerResult;
use crate::error::Result;
use crate::input::{ClassHandle, Trigger, Value};

/// A named set of interfaces that share registrations
///
/// Each registration call adds one independent entry to every member. A group
/// has no activation state of its own: an entry fires wherever its member
/// interface is active. Member names are resolved when a registration call is
/// made, and all of them must exist at that point.
pub struct Group<S> {
    name: String,
    members: Vec<String>,
    registry: Registry<S>,
}

impl<S: 'static> Group<S> {
    pub fn new<I, N>(registry: &Registry<S>, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut group = Self {
            name: name.into(),
            members: Vec::new(),
            registry: registry.clone(),
        };
        for member in members {
            group.add(member);
        }
        group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Adds a member; adding a name twice is a no-op
    pub fn add(&mut self, member: impl Into<String>) {
        let member = member.into();
        if !self.members.contains(&member) {
            self.members.push(member);
        }
    }

    /// Removes a member, returning whether it was one
    ///
    /// Entries already forwarded to that interface stay in place.
    pub fn remove(&mut self, member: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != member);
        self.members.len() != before
    }

    /// Members that resolve and are currently active
    pub fn active_members(&self) -> Vec<Interface<S>> {
        self.members
            .iter()
            .filter_map(|name| self.registry.get_interface(name).ok())
            .filter(|i| i.is_active())
            .collect()
    }

    /// Resolves every member; nothing is registered if any name is unknown
    fn resolve(&self) -> Result<Vec<Interface<S>>> {
        self.members
            .iter()
            .map(|name| self.registry.get_interface(name))
            .collect()
    }

    /// Registers a free-function handler on every member
    ///
    /// # Errors
    /// Returns [`crate::Error::InterfaceNotFound`] if a member does not exist.
    pub fn event<F>(&self, trigger: Trigger, callback: F) -> Result<()>
    where
        F: Fn(&[Value]) -> HandlerResult + 'static,
    {
        let callback: Rc<dyn Fn(&[Value]) -> HandlerResult> = Rc::new(callback);
        let members = self.resolve()?;
        for member in &members {
            member.event_shared(trigger.clone(), Rc::clone(&callback));
        }
        debug!(group = %self.name, kind = ?trigger.kind(), members = members.len(), "Registered group handler");
        Ok(())
    }

    /// Registers a method handler for class `T` on every member
    pub fn method_event<T, F>(&self, trigger: Trigger<T>, callback: F) -> Result<()>
    where
        T: 'static,
        F: Fn(&mut T, &[Value]) -> HandlerResult + 'static,
    {
        let callback: Rc<dyn Fn(&mut T, &[Value]) -> HandlerResult> = Rc::new(callback);
        for member in self.resolve()? {
            member.method_event_shared(trigger.clone(), Rc::clone(&callback));
        }
        Ok(())
    }

    /// Registers a frame callback on every member
    pub fn frame<F>(&self, callback: F) -> Result<()>
    where
        F: Fn(&mut S) -> HandlerResult + 'static,
    {
        let callback: Rc<dyn Fn(&mut S) -> HandlerResult> = Rc::new(callback);
        for member in self.resolve()? {
            member.frame_shared(Rc::clone(&callback));
        }
        Ok(())
    }

    pub fn method_frame<T, F>(&self, callback: F) -> Result<()>
    where
        T: 'static,
        F: Fn(&mut T, &mut S) -> HandlerResult + 'static,
    {
        let callback: Rc<dyn Fn(&mut T, &mut S) -> HandlerResult> = Rc::new(callback);
        for member in self.resolve()? {
            member.method_frame_shared(Rc::clone(&callback));
        }
        Ok(())
    }

    /// Registers class `T` on every member
    ///
    /// Instances spawned through the returned handle are tracked by all of
    /// them.
    pub fn register_cls<T: 'static>(&self) -> Result<ClassHandle<T>> {
        let trackers = self.resolve()?.iter().map(Interface::tracker_rc).collect();
        Ok(ClassHandle::new(trackers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::input::{EventKind, EventRecord};
    use std::cell::RefCell;

    fn setup() -> (Registry<()>, Interface<()>, Interface<()>) {
        let registry = Registry::new();
        let a = registry.create_interface("a").unwrap();
        let b = registry.create_interface("b").unwrap();
        (registry, a, b)
    }

    #[test]
    fn test_group_handler_fires_only_on_active_members() {
        let (registry, a, b) = setup();
        let group = Group::new(&registry, "g", ["a", "b"]);
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        group
            .event(Trigger::new(EventKind::Quit), move |_| {
                *counter.borrow_mut() += 1;
                Ok(())
            })
            .unwrap();
        a.activate();

        for member in [&a, &b] {
            member.dispatch_event(&EventRecord::quit()).unwrap();
        }
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(a.count_handlers(EventKind::Quit), 1);
        assert_eq!(b.count_handlers(EventKind::Quit), 1);
        assert_eq!(group.active_members(), vec![a]);
    }

    #[test]
    fn test_unknown_member_registers_nothing() {
        let (registry, a, _) = setup();
        let group = Group::new(&registry, "g", ["a", "ghost"]);
        let result = group.event(Trigger::new(EventKind::Quit), |_| Ok(()));
        assert!(matches!(result, Err(Error::InterfaceNotFound(name)) if name == "ghost"));
        assert_eq!(a.count_handlers(EventKind::Quit), 0);
    }

    #[test]
    fn test_membership_edits() {
        let (registry, _, _) = setup();
        let mut group = Group::new(&registry, "g", ["a"]);
        group.add("b");
        group.add("a");
        assert_eq!(group.members(), ["a", "b"]);
        assert!(group.remove("a"));
        assert!(!group.remove("a"));
        assert_eq!(group.members(), ["b"]);
    }

    #[test]
    fn test_group_class_is_tracked_by_every_member() {
        struct Token;
        let (registry, a, b) = setup();
        let group = Group::new(&registry, "g", ["a", "b"]);
        let tokens = group.register_cls::<Token>().unwrap();
        let _token = tokens.spawn(Token);
        assert_eq!(a.tracker().live_count::<Token>(), 1);
        assert_eq!(b.tracker().live_count::<Token>(), 1);
    }
}
