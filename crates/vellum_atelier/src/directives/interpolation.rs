//! `{{ expr }}` interpolation inside text.
//!
//! Every interpolation in a text node gets its own watcher, but all of them
//! render through the same template: whichever one changes, the whole text
//! is substituted again from current data.

use std::rc::Rc;

use regex::{Captures, Regex};
use vellum_carton::String;
use vellum_pulse::{resolve_get, Object, Value};
use vellum_relief::{DomResult, NodeId, WeakDom};

use super::BindContext;
use crate::errors::CompileResult;
use crate::updater::update_text;

struct TextTemplate {
    dom: WeakDom,
    data: Object,
    node: NodeId,
    source: String,
    pattern: Regex,
}

impl TextTemplate {
    fn substitute(&self) -> std::string::String {
        self.pattern
            .replace_all(&self.source, |caps: &Captures<'_>| {
                resolve_get(&self.data, caps[1].trim()).to_string()
            })
            .into_owned()
    }

    fn render(&self) -> DomResult<()> {
        let Some(dom) = self.dom.upgrade() else {
            return Ok(());
        };
        update_text(&dom, self.node, &Value::from(self.substitute()))
    }
}

/// Bind every interpolation found in `content` to `node`, then render once.
pub fn bind_interpolation(
    ctx: &mut BindContext<'_>,
    node: NodeId,
    content: &str,
    pattern: &Regex,
) -> CompileResult<()> {
    let template = Rc::new(TextTemplate {
        dom: ctx.dom.downgrade(),
        data: ctx.data.clone(),
        node,
        source: content.into(),
        pattern: pattern.clone(),
    });

    for caps in pattern.captures_iter(content) {
        let expression = caps[1].trim();
        tracing::debug!(node = %node, expression, "bind interpolation");
        let template = template.clone();
        ctx.watch(node, expression, move |_| Ok(template.render()?))?;
    }

    template.render()?;
    Ok(())
}
