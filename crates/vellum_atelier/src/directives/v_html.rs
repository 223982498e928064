//! `v-html`: one-way binding of an element's markup.

use vellum_pulse::resolve_get;

use super::{BindContext, Binding, Directive};
use crate::errors::CompileResult;
use crate::updater::update_html;

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlDirective;

impl Directive for HtmlDirective {
    fn bind(&self, ctx: &mut BindContext<'_>, binding: &Binding<'_>) -> CompileResult<()> {
        let node = binding.node;
        tracing::debug!(node = %node, expression = binding.expression, "bind v-html");

        let weak = ctx.dom.downgrade();
        ctx.watch(node, binding.expression, move |value| match weak.upgrade() {
            Some(dom) => Ok(update_html(&dom, node, value)?),
            None => Ok(()),
        })?;
        update_html(ctx.dom, node, &resolve_get(ctx.data, binding.expression))?;
        Ok(())
    }
}
