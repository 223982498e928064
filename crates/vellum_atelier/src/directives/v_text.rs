//! `v-text`: one-way binding of an element's text.

use vellum_pulse::resolve_get;

use super::{BindContext, Binding, Directive};
use crate::errors::CompileResult;
use crate::updater::update_text;

#[derive(Debug, Default, Clone, Copy)]
pub struct TextDirective;

impl Directive for TextDirective {
    fn bind(&self, ctx: &mut BindContext<'_>, binding: &Binding<'_>) -> CompileResult<()> {
        let node = binding.node;
        tracing::debug!(node = %node, expression = binding.expression, "bind v-text");

        let weak = ctx.dom.downgrade();
        ctx.watch(node, binding.expression, move |value| match weak.upgrade() {
            Some(dom) => Ok(update_text(&dom, node, value)?),
            None => Ok(()),
        })?;
        update_text(ctx.dom, node, &resolve_get(ctx.data, binding.expression))?;
        Ok(())
    }
}
