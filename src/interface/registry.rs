//! Process-wide interface registry

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::Interface;
use crate::error::{Error, Result};

/// Name → interface map, in creation order
///
/// Cloning yields another handle to the same registry. Interfaces are never
/// removed; names stay unique for the registry's lifetime.
pub struct Registry<S> {
    interfaces: Rc<RefCell<IndexMap<String, Interface<S>>>>,
}

impl<S: 'static> Registry<S> {
    pub fn new() -> Self {
        Self {
            interfaces: Rc::new(RefCell::new(IndexMap::new())),
        }
    }

    /// Creates and registers an inactive interface
    ///
    /// # Errors
    /// Returns [`Error::InterfaceExists`] if the name is taken.
    pub fn create_interface(&self, name: impl Into<String>) -> Result<Interface<S>> {
        let name = name.into();
        let mut interfaces = self.interfaces.borrow_mut();
        if interfaces.contains_key(&name) {
            return Err(Error::InterfaceExists(name));
        }
        let interface = Interface::new(name.clone());
        interfaces.insert(name, interface.clone());
        debug!(interface = %interface.name(), "Created interface");
        Ok(interface)
    }

    /// Looks up an interface by name
    ///
    /// # Errors
    /// Returns [`Error::InterfaceNotFound`] for an unknown name.
    pub fn get_interface(&self, name: &str) -> Result<Interface<S>> {
        self.interfaces
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.interfaces.borrow().contains_key(name)
    }

    pub fn activate_interface(&self, name: &str) -> Result<()> {
        self.get_interface(name)?.activate();
        Ok(())
    }

    pub fn deactivate_interface(&self, name: &str) -> Result<()> {
        self.get_interface(name)?.deactivate();
        Ok(())
    }

    /// Deactivates every interface, then activates `name` if it exists
    ///
    /// Returns whether the target was found. An unknown target leaves
    /// nothing active.
    pub fn switch_to(&self, name: &str) -> bool {
        for interface in self.interfaces() {
            interface.deactivate();
        }
        match self.get_interface(name) {
            Ok(target) => {
                target.activate();
                debug!(interface = %name, "Switched interface");
                true
            }
            Err(_) => {
                warn!(interface = %name, "Switch target not found, no interface is active");
                false
            }
        }
    }

    /// Snapshot of every interface, in creation order
    pub fn interfaces(&self) -> Vec<Interface<S>> {
        self.interfaces.borrow().values().cloned().collect()
    }

    /// Interfaces with no parent, in creation order
    pub fn top_level(&self) -> Vec<Interface<S>> {
        self.interfaces
            .borrow()
            .values()
            .filter(|i| i.parent().is_none())
            .cloned()
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.interfaces.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.interfaces.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.borrow().is_empty()
    }
}

impl<S: 'static> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for Registry<S> {
    fn clone(&self) -> Self {
        Self {
            interfaces: Rc::clone(&self.interfaces),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_returns_same_interface() {
        let registry = Registry::<()>::new();
        let created = registry.create_interface("x").unwrap();
        let found = registry.get_interface(created.name()).unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let registry = Registry::<()>::new();
        registry.create_interface("x").unwrap();
        assert!(matches!(
            registry.create_interface("x"),
            Err(Error::InterfaceExists(name)) if name == "x"
        ));
    }

    #[test]
    fn test_unknown_name() {
        let registry = Registry::<()>::new();
        assert!(matches!(
            registry.get_interface("nope"),
            Err(Error::InterfaceNotFound(_))
        ));
        assert!(registry.activate_interface("nope").is_err());
    }

    #[test]
    fn test_switch_activates_only_target() {
        let registry = Registry::<()>::new();
        let menu = registry.create_interface("menu").unwrap();
        let play = registry.create_interface("play").unwrap();
        let hud = registry.create_interface("hud").unwrap();
        play.register_interface(&hud).unwrap();
        menu.activate();
        hud.activate();

        assert!(registry.switch_to("play"));
        assert!(!menu.is_active());
        assert!(!hud.is_active());
        assert!(play.is_active());
    }

    #[test]
    fn test_switch_to_unknown_deactivates_everything() {
        let registry = Registry::<()>::new();
        let menu = registry.create_interface("menu").unwrap();
        menu.activate();
        assert!(!registry.switch_to("missing"));
        assert!(registry.interfaces().iter().all(|i| !i.is_active()));
    }

    #[test]
    fn test_top_level_excludes_children() {
        let registry = Registry::<()>::new();
        let play = registry.create_interface("play").unwrap();
        let pause = registry.create_interface("pause").unwrap();
        registry.create_interface("menu").unwrap();
        play.register_interface(&pause).unwrap();

        let names: Vec<String> = registry
            .top_level()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(names, ["play", "menu"]);
        assert_eq!(registry.len(), 3);
    }
}
