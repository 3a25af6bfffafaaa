//! Handler triggers: event kind, attribute predicates, declared parameters

use std::fmt;
use std::rc::Rc;

use super::events::{EventKind, EventRecord, Value};
use crate::error::Result;

/// A test over one attribute of an event record
///
/// `T` is the receiver type of a method handler. Free handlers use `()`, so a
/// [`Predicate::Bound`] test on a free handler receives `&()`.
pub enum Predicate<T> {
    /// The attribute must equal this value
    Equals(Value),
    /// The attribute must pass this test
    Test(Rc<dyn Fn(&Value) -> bool>),
    /// The attribute must pass this test against the bound instance
    Bound(Rc<dyn Fn(&T, &Value) -> bool>),
}

impl<T> Predicate<T> {
    pub fn evaluate(&self, receiver: &T, value: &Value) -> bool {
        match self {
            Predicate::Equals(expected) => expected == value,
            Predicate::Test(test) => test(value),
            Predicate::Bound(test) => test(receiver, value),
        }
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Predicate::Equals(v) => Predicate::Equals(v.clone()),
            Predicate::Test(f) => Predicate::Test(Rc::clone(f)),
            Predicate::Bound(f) => Predicate::Bound(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
            Predicate::Test(_) => f.write_str("Test(..)"),
            Predicate::Bound(_) => f.write_str("Bound(..)"),
        }
    }
}

/// When a handler fires and what it receives
///
/// ```
/// use interface_manager::input::{EventKind, MouseButton, Trigger};
///
/// let trigger: Trigger = Trigger::new(EventKind::Click)
///     .eq("button", MouseButton::Left)
///     .param("pos");
/// assert_eq!(trigger.declared_params(), ["pos"]);
/// ```
pub struct Trigger<T = ()> {
    kind: EventKind,
    predicates: Vec<(String, Predicate<T>)>,
    params: Vec<String>,
}

impl<T> Trigger<T> {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            predicates: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Requires `attribute` to equal `value`
    pub fn eq(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates
            .push((attribute.into(), Predicate::Equals(value.into())));
        self
    }

    /// Requires `test(attribute)` to hold
    pub fn test(
        mut self,
        attribute: impl Into<String>,
        test: impl Fn(&Value) -> bool + 'static,
    ) -> Self {
        self.predicates
            .push((attribute.into(), Predicate::Test(Rc::new(test))));
        self
    }

    /// Requires `test(instance, attribute)` to hold for the bound instance
    pub fn bound(
        mut self,
        attribute: impl Into<String>,
        test: impl Fn(&T, &Value) -> bool + 'static,
    ) -> Self {
        self.predicates
            .push((attribute.into(), Predicate::Bound(Rc::new(test))));
        self
    }

    /// Passes `attribute` to the handler, after any previously declared ones
    pub fn param(mut self, attribute: impl Into<String>) -> Self {
        self.params.push(attribute.into());
        self
    }

    pub fn params<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.extend(attributes.into_iter().map(Into::into));
        self
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn predicates(&self) -> impl Iterator<Item = (&str, &Predicate<T>)> {
        self.predicates.iter().map(|(k, p)| (k.as_str(), p))
    }

    pub fn declared_params(&self) -> &[String] {
        &self.params
    }

    /// Checks every predicate against `record`, in declaration order
    ///
    /// All predicate attributes are resolved before any test runs, so a
    /// missing attribute is reported even if an earlier test would fail.
    ///
    /// # Errors
    /// Returns [`crate::Error::AttributeMismatch`] for a missing attribute.
    pub fn matches(&self, record: &EventRecord, receiver: &T) -> Result<bool> {
        if record.kind() != self.kind {
            return Ok(false);
        }
        let values = self
            .predicates
            .iter()
            .map(|(name, _)| record.require(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(self
            .predicates
            .iter()
            .zip(values)
            .all(|((_, predicate), value)| predicate.evaluate(receiver, value)))
    }

    /// Builds the positional argument list from the declared parameters
    ///
    /// # Errors
    /// Returns [`crate::Error::AttributeMismatch`] for a missing attribute.
    pub fn arguments(&self, record: &EventRecord) -> Result<Vec<Value>> {
        self.params
            .iter()
            .map(|name| record.require(name).cloned())
            .collect()
    }
}

impl<T> Clone for Trigger<T> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            predicates: self.predicates.clone(),
            params: self.params.clone(),
        }
    }
}

impl<T> fmt::Debug for Trigger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("kind", &self.kind)
            .field("predicates", &self.predicates)
            .field("params", &self.params)
            .finish()
    }
}
