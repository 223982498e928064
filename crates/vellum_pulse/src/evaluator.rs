//! The current-evaluator slot.
//!
//! Reactive reads subscribe whichever watcher occupies this thread-local
//! slot. It is only written through [`EvaluatorGuard`], which restores the
//! previous occupant when dropped.

use std::cell::RefCell;
use std::rc::Rc;

use crate::watcher::Watcher;

thread_local! {
    static CURRENT: RefCell<Option<Rc<Watcher>>> = const { RefCell::new(None) };
}

/// Scoped occupancy of the current-evaluator slot.
#[must_use = "the evaluator is released as soon as the guard is dropped"]
pub struct EvaluatorGuard {
    previous: Option<Rc<Watcher>>,
}

impl EvaluatorGuard {
    /// Make `watcher` the current evaluator until the guard is dropped
    pub fn enter(watcher: Rc<Watcher>) -> Self {
        Self::install(Some(watcher))
    }

    /// Empty the slot until the guard is dropped
    pub fn suspend() -> Self {
        Self::install(None)
    }

    fn install(next: Option<Rc<Watcher>>) -> Self {
        let previous = CURRENT.with(|slot| slot.replace(next));
        Self { previous }
    }
}

impl Drop for EvaluatorGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// The watcher currently evaluating, if any
pub fn current() -> Option<Rc<Watcher>> {
    CURRENT.with(|slot| slot.borrow().clone())
}

/// Run `f` with no current evaluator, so its reads subscribe nothing
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let _guard = EvaluatorGuard::suspend();
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;

    fn watcher(expr: &str) -> Rc<Watcher> {
        Watcher::new(&Object::new(), expr, |_| Ok(()))
    }

    #[test]
    fn test_slot_empty_by_default() {
        assert!(current().is_none());
    }

    #[test]
    fn test_guards_nest_and_restore() {
        let outer = watcher("outer");
        let inner = watcher("inner");
        {
            let _a = EvaluatorGuard::enter(outer.clone());
            {
                let _b = EvaluatorGuard::enter(inner.clone());
                assert!(Rc::ptr_eq(&current().unwrap(), &inner));
            }
            assert!(Rc::ptr_eq(&current().unwrap(), &outer));
        }
        assert!(current().is_none());
    }

    #[test]
    fn test_untracked_hides_and_restores() {
        let w = watcher("w");
        let _guard = EvaluatorGuard::enter(w.clone());
        assert!(untracked(current).is_none());
        assert!(Rc::ptr_eq(&current().unwrap(), &w));
    }

    #[test]
    fn test_slot_released_on_panic() {
        let w = watcher("w");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = EvaluatorGuard::enter(w.clone());
            panic!("evaluation failed");
        }));
        assert!(result.is_err());
        assert!(current().is_none());
    }
}
