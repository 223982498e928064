//! Pulse - The reactivity engine for Vellum.
//!
//! Data lives in [`Object`]s whose properties are reactive cells. While a
//! [`Watcher`] evaluates its expression, every reactive property it reads
//! records the watcher in that property's [`Dep`]; writing a different value
//! later notifies those watchers synchronously, in subscription order.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use vellum_pulse::{observe, Object, Value, Watcher};
//!
//! let data = Object::from_json(serde_json::json!({ "a": { "b": 1 } }));
//! observe(&Value::Object(data.clone()));
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = seen.clone();
//! let _watcher = Watcher::new(&data, "a.b", move |value| {
//!     log.borrow_mut().push(value.to_string());
//!     Ok(())
//! });
//!
//! vellum_pulse::resolve_set(&data, "a.b", Value::from(2)).unwrap();
//! assert_eq!(*seen.borrow(), vec!["2".to_string()]);
//! ```

pub mod dep;
pub mod errors;
pub mod evaluator;
pub mod object;
pub mod observer;
pub mod resolver;
pub mod value;
pub mod watcher;

pub use dep::Dep;
pub use errors::{ReactiveError, ReactiveResult};
pub use evaluator::{untracked, EvaluatorGuard};
pub use object::{Getter, Object};
pub use observer::{observe, Observer};
pub use resolver::{resolve_get, resolve_set};
pub use value::{Array, Value};
pub use watcher::{Callback, CallbackResult, Watcher};
