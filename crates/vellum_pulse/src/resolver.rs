//! Dotted-path access into data.
//!
//! Paths are split on `.` with no further syntax. Empty segments, such as
//! the ones produced by a leading or trailing dot, are looked up as literal
//! empty keys.

use crate::errors::{ReactiveError, ReactiveResult};
use crate::object::Object;
use crate::value::Value;

fn walk<'a>(root: &Object, segments: impl Iterator<Item = &'a str>) -> Value {
    segments.fold(Value::Object(root.clone()), |value, segment| {
        value.get_key(segment)
    })
}

/// Read the value at `path`. A missing segment anywhere yields `Undefined`.
pub fn resolve_get(root: &Object, path: &str) -> Value {
    walk(root, path.split('.'))
}

/// Assign `value` at `path`.
///
/// Every segment but the last is read as in [`resolve_get`]; the last is
/// written on whatever that reaches. Arrays accept numeric segments, which
/// are written without notifying anyone.
pub fn resolve_set(root: &Object, path: &str, value: Value) -> ReactiveResult<()> {
    let (target, last) = match path.rsplit_once('.') {
        Some((parent, last)) => (walk(root, parent.split('.')), last),
        None => (Value::Object(root.clone()), path),
    };

    match &target {
        Value::Object(obj) => obj.set(last, value),
        Value::Array(arr) => match last.parse::<usize>() {
            Ok(index) => {
                arr.set(index, value);
                Ok(())
            }
            Err(_) => Err(not_an_object(path, last)),
        },
        _ => Err(not_an_object(path, last)),
    }
}

fn not_an_object(path: &str, segment: &str) -> ReactiveError {
    ReactiveError::NotAnObject {
        path: path.into(),
        segment: segment.into(),
    }
}
