//! Dependency sets.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::errors::ReactiveResult;
use crate::evaluator;
use crate::watcher::Watcher;

/// Subscribers of one reactive property.
///
/// Subscribers are held weakly and kept in insertion order. The same watcher
/// may appear more than once; each occurrence is notified.
#[derive(Default)]
pub struct Dep {
    subs: RefCell<Vec<Weak<Watcher>>>,
}

impl Dep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, watcher: &Rc<Watcher>) {
        tracing::trace!(expression = watcher.expression(), "subscribe");
        self.subs.borrow_mut().push(Rc::downgrade(watcher));
    }

    /// Subscribe the watcher currently evaluating, if any
    pub fn depend(&self) {
        if let Some(watcher) = evaluator::current() {
            self.subscribe(&watcher);
        }
    }

    /// Run `update` on every live subscriber, in subscription order.
    ///
    /// Stops at the first failing subscriber.
    pub fn notify(&self) -> ReactiveResult<()> {
        let subs = self.subs.borrow().clone();
        tracing::trace!(subscribers = subs.len(), "notify");
        for watcher in subs.iter().filter_map(Weak::upgrade) {
            watcher.update()?;
        }
        Ok(())
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.subs
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dep").field("subscribers", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::EvaluatorGuard;
    use crate::object::Object;
    use crate::value::Value;

    fn recording(
        root: &Object,
        name: &'static str,
        log: &Rc<RefCell<Vec<String>>>,
    ) -> Rc<Watcher> {
        let log = log.clone();
        Watcher::new(root, "a", move |v| {
            log.borrow_mut().push(format!("{name}={v}"));
            Ok(())
        })
    }

    #[test]
    fn test_depend_without_evaluator_is_noop() {
        let dep = Dep::new();
        dep.depend();
        assert!(dep.is_empty());
    }

    #[test]
    fn test_depend_records_current_evaluator() {
        let root = Object::new();
        let watcher = Watcher::new(&root, "x", |_| Ok(()));
        let dep = Dep::new();
        {
            let _guard = EvaluatorGuard::enter(watcher.clone());
            dep.depend();
            dep.depend();
        }
        assert_eq!(dep.len(), 2);
    }

    #[test]
    fn test_notify_in_subscription_order() {
        let root = Object::new();
        root.set("a", Value::from(1)).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = recording(&root, "first", &log);
        let second = recording(&root, "second", &log);

        // `a` is a plain property, so only the explicit notify reaches the watchers.
        let dep = Dep::new();
        dep.subscribe(&second);
        dep.subscribe(&first);
        root.set("a", Value::from(2)).unwrap();
        dep.notify().unwrap();

        assert_eq!(*log.borrow(), vec!["second=2", "first=2"]);
    }

    #[test]
    fn test_dead_subscribers_are_skipped() {
        let root = Object::new();
        let dep = Dep::new();
        let watcher = Watcher::new(&root, "a", |_| Err("unreachable".into()));
        dep.subscribe(&watcher);
        drop(watcher);

        assert!(dep.is_empty());
        dep.notify().unwrap();
    }
}
