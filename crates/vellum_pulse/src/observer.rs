//! Recursive instrumentation of data.

use vellum_carton::FxHashSet;

use crate::object::Object;
use crate::value::{Array, Value};

/// Walks a value graph and makes every plain property reactive.
///
/// Objects and arrays are visited once per walk, so shared and cyclic data is
/// handled. Walking already-reactive data changes nothing.
#[derive(Debug, Default)]
pub struct Observer {
    visited: FxHashSet<usize>,
    instrumented: usize,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of properties made reactive so far
    pub fn instrumented(&self) -> usize {
        self.instrumented
    }

    pub fn observe(&mut self, value: &Value) {
        match value {
            Value::Object(obj) => self.walk_object(obj),
            Value::Array(arr) => self.walk_array(arr),
            _ => {}
        }
    }

    fn walk_object(&mut self, obj: &Object) {
        if !self.visited.insert(obj.addr()) {
            return;
        }
        for property in obj.properties() {
            if property.make_reactive() {
                self.instrumented += 1;
            }
            // Computed slots have nothing stored to descend into.
            if let Some(value) = property.peek() {
                self.observe(&value);
            }
        }
    }

    fn walk_array(&mut self, arr: &Array) {
        if !self.visited.insert(arr.addr()) {
            return;
        }
        for item in arr.to_vec() {
            self.observe(&item);
        }
    }
}

/// Make `value` and everything reachable from it reactive
pub fn observe(value: &Value) {
    let mut observer = Observer::new();
    observer.observe(value);
    if observer.instrumented > 0 {
        tracing::trace!(properties = observer.instrumented, "observed");
    }
}
