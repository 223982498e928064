//! Watchers: one binding's interest in one expression.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use vellum_carton::String;

use crate::errors::{ReactiveError, ReactiveResult};
use crate::evaluator::{untracked, EvaluatorGuard};
use crate::object::Object;
use crate::resolver::resolve_get;
use crate::value::Value;

pub type CallbackResult = Result<(), Box<dyn std::error::Error>>;

/// Change callback, invoked with the newly resolved value.
pub type Callback = Box<dyn Fn(&Value) -> CallbackResult>;

/// Caches the value of a dotted path and reports when it changes.
///
/// Subscriptions are made once, while the watcher is constructed. Later
/// updates re-resolve the path without subscribing again.
pub struct Watcher {
    root: Object,
    expression: String,
    callback: Callback,
    value: RefCell<Value>,
}

impl Watcher {
    /// Create a watcher and evaluate `expression` once as the current
    /// evaluator, subscribing it to every reactive property on the path.
    ///
    /// The callback is not called for this first evaluation.
    pub fn new<F>(root: &Object, expression: &str, callback: F) -> Rc<Self>
    where
        F: Fn(&Value) -> CallbackResult + 'static,
    {
        let watcher = Rc::new(Self {
            root: root.clone(),
            expression: expression.into(),
            callback: Box::new(callback),
            value: RefCell::new(Value::Undefined),
        });

        let value = {
            let _guard = EvaluatorGuard::enter(watcher.clone());
            resolve_get(root, expression)
        };
        *watcher.value.borrow_mut() = value;
        watcher
    }

    /// Re-resolve the expression and run the callback if the value changed.
    ///
    /// The cached value is replaced before the callback runs.
    pub fn update(&self) -> ReactiveResult<()> {
        untracked(|| {
            let value = resolve_get(&self.root, &self.expression);
            if value.strict_eq(&self.value.borrow()) {
                return Ok(());
            }
            tracing::trace!(expression = %self.expression, %value, "watcher changed");
            *self.value.borrow_mut() = value.clone();
            (self.callback)(&value).map_err(|source| ReactiveError::Callback {
                expression: self.expression.clone(),
                source,
            })
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The last resolved value
    pub fn value(&self) -> Value {
        self.value.borrow().clone()
    }
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("expression", &self.expression)
            .field("value", &*self.value.borrow())
            .finish()
    }
}
