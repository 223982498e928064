//! DOM update primitives.
//!
//! Each updater applies a value to a node unconditionally; deciding whether
//! anything changed is the watcher's job.

use vellum_carton::{String, ToCompactString};
use vellum_pulse::Value;
use vellum_relief::{Dom, DomResult, NodeId};

/// String form assigned to nullable DOM properties: `null` becomes empty.
fn dom_string(value: &Value) -> String {
    match value {
        Value::Null => String::default(),
        _ => value.to_compact_string(),
    }
}

/// Replace a node's text content
pub fn update_text(dom: &Dom, node: NodeId, value: &Value) -> DomResult<()> {
    dom.borrow_mut().set_text_content(node, &dom_string(value))
}

/// Replace a node's children with the parsed markup of `value`
pub fn update_html(dom: &Dom, node: NodeId, value: &Value) -> DomResult<()> {
    let markup = dom_string(value);
    let mut doc = dom.borrow_mut();
    doc.clear_children(node)?;
    let errors = vellum_armature::parse_into(&mut doc, node, &markup)?;
    for error in &errors {
        tracing::warn!(node = %node, %error, "html content did not parse cleanly");
    }
    Ok(())
}

/// Assign a form control's live value
pub fn update_value(dom: &Dom, node: NodeId, value: &Value) -> DomResult<()> {
    dom.borrow_mut().set_value(node, dom_string(value))
}
