//! `v-model`: two-way binding between a form control and a path.

use vellum_pulse::{resolve_get, resolve_set, Value};

use super::{BindContext, Binding, Directive};
use crate::errors::CompileResult;
use crate::updater::update_value;

#[derive(Debug, Default, Clone, Copy)]
pub struct ModelDirective;

impl Directive for ModelDirective {
    fn bind(&self, ctx: &mut BindContext<'_>, binding: &Binding<'_>) -> CompileResult<()> {
        let node = binding.node;
        let expression = binding.expression;
        tracing::debug!(node = %node, expression, "bind v-model");

        // Watcher and listener both live inside the document, so neither may own it.
        let weak = ctx.dom.downgrade();
        let render = weak.clone();
        ctx.watch(node, expression, move |value| match render.upgrade() {
            Some(dom) => Ok(update_value(&dom, node, value)?),
            None => Ok(()),
        })?;

        let data = ctx.data.clone();
        let path = vellum_carton::String::from(expression);
        ctx.dom.add_event_listener(node, "input", move |event| {
            let Some(dom) = weak.upgrade() else {
                return Ok(());
            };
            let value = dom.borrow().value(event.target())?;
            resolve_set(&data, &path, Value::from(value))?;
            Ok(())
        })?;

        update_value(ctx.dom, node, &resolve_get(ctx.data, expression))?;
        Ok(())
    }
}
