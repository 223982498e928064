//! Reactive objects.
//!
//! An [`Object`] is a shared, insertion-ordered property bag. Each property
//! is backed by a slot that decides what reads and writes do:
//!
//! - a plain slot stores a value and nothing else,
//! - a reactive slot additionally owns a [`Dep`] that reads subscribe to and
//!   writes notify,
//! - a computed slot runs a getter on every read and rejects writes.
//!
//! Plain slots become reactive when the [`Observer`](crate::Observer) walks
//! the object.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use vellum_carton::{FxHashMap, String};

use crate::dep::Dep;
use crate::errors::{ReactiveError, ReactiveResult};
use crate::observer::observe;
use crate::value::Value;

/// Getter backing a computed property. Receives the object it is read from.
pub type Getter = Rc<dyn Fn(&Object) -> Value>;

#[derive(Clone)]
enum Slot {
    Plain(Value),
    Reactive { value: Value, dep: Rc<Dep> },
    Computed(Getter),
}

pub(crate) struct Property {
    key: String,
    slot: RefCell<Slot>,
}

impl Property {
    fn new(key: String, slot: Slot) -> Self {
        Self {
            key,
            slot: RefCell::new(slot),
        }
    }

    /// Turn a plain slot into a reactive one. Returns false if the slot was
    /// already reactive or computed.
    pub(crate) fn make_reactive(&self) -> bool {
        let mut slot = self.slot.borrow_mut();
        match &*slot {
            Slot::Plain(value) => {
                *slot = Slot::Reactive {
                    value: value.clone(),
                    dep: Rc::new(Dep::new()),
                };
                true
            }
            _ => false,
        }
    }

    /// Stored value without subscribing. `None` for computed slots.
    pub(crate) fn peek(&self) -> Option<Value> {
        match &*self.slot.borrow() {
            Slot::Plain(value) | Slot::Reactive { value, .. } => Some(value.clone()),
            Slot::Computed(_) => None,
        }
    }

    fn read(&self, owner: &Object) -> Value {
        // Clone out first so the getter or a subscriber can touch this slot.
        let slot = self.slot.borrow().clone();
        match slot {
            Slot::Plain(value) => value,
            Slot::Reactive { value, dep } => {
                dep.depend();
                value
            }
            Slot::Computed(getter) => getter(owner),
        }
    }

    fn write(&self, value: Value) -> ReactiveResult<()> {
        let dep = match &*self.slot.borrow() {
            Slot::Plain(_) => None,
            Slot::Computed(_) => {
                return Err(ReactiveError::ReadOnly {
                    key: self.key.clone(),
                })
            }
            Slot::Reactive { value: current, dep } => {
                if current.strict_eq(&value) {
                    return Ok(());
                }
                Some(dep.clone())
            }
        };

        let Some(dep) = dep else {
            *self.slot.borrow_mut() = Slot::Plain(value);
            return Ok(());
        };

        observe(&value);
        if let Slot::Reactive { value: current, .. } = &mut *self.slot.borrow_mut() {
            *current = value;
        }
        tracing::trace!(key = %self.key, "reactive property changed");
        dep.notify()
    }
}

#[derive(Default)]
struct Properties {
    entries: Vec<Rc<Property>>,
    index: FxHashMap<String, usize>,
}

/// Shared handle to a keyed data object.
///
/// Cloning the handle shares the same properties; equality between values
/// holding objects is identity of this handle.
#[derive(Clone, Default)]
pub struct Object {
    inner: Rc<RefCell<Properties>>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an object from JSON. Anything but a JSON object yields an empty
    /// object.
    pub fn from_json(json: serde_json::Value) -> Self {
        match Value::from(json) {
            Value::Object(obj) => obj,
            _ => Self::new(),
        }
    }

    fn property(&self, key: &str) -> Option<Rc<Property>> {
        let props = self.inner.borrow();
        props.index.get(key).map(|&i| props.entries[i].clone())
    }

    fn insert(&self, key: &str, slot: Slot) {
        let mut props = self.inner.borrow_mut();
        let property = Rc::new(Property::new(key.into(), slot));
        match props.index.get(key).copied() {
            Some(i) => props.entries[i] = property,
            None => {
                let i = props.entries.len();
                props.index.insert(key.into(), i);
                props.entries.push(property);
            }
        }
    }

    /// Read a property, subscribing the current evaluator if it is reactive.
    ///
    /// Missing keys read as `Undefined`.
    pub fn get(&self, key: &str) -> Value {
        match self.property(key) {
            Some(property) => property.read(self),
            None => Value::Undefined,
        }
    }

    /// Write a property.
    ///
    /// A missing key is added as a plain (non-reactive) property. A reactive
    /// property notifies its subscribers when the new value is strictly
    /// unequal to the stored one.
    pub fn set(&self, key: &str, value: Value) -> ReactiveResult<()> {
        match self.property(key) {
            Some(property) => property.write(value),
            None => {
                self.insert(key, Slot::Plain(value));
                Ok(())
            }
        }
    }

    /// Install a getter-only property, replacing any existing one.
    pub fn define_computed<F>(&self, key: &str, getter: F)
    where
        F: Fn(&Object) -> Value + 'static,
    {
        self.insert(key, Slot::Computed(Rc::new(getter)));
    }

    pub fn has(&self, key: &str) -> bool {
        self.inner.borrow().index.contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|p| p.key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Whether a property has been instrumented
    pub fn is_reactive(&self, key: &str) -> bool {
        self.property(key).is_some_and(|p| {
            let slot = p.slot.borrow();
            matches!(&*slot, Slot::Reactive { .. })
        })
    }

    /// Number of live watchers subscribed to a reactive property
    pub fn subscriber_count(&self, key: &str) -> usize {
        let Some(property) = self.property(key) else {
            return 0;
        };
        let slot = property.slot.borrow();
        match &*slot {
            Slot::Reactive { dep, .. } => dep.len(),
            _ => 0,
        }
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }

    pub(crate) fn properties(&self) -> Vec<Rc<Property>> {
        self.inner.borrow().entries.clone()
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let obj = Object::new();
        for (key, value) in iter {
            obj.insert(&key, Slot::Plain(value));
        }
        obj
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("keys", &self.keys())
            .finish()
    }
}
