//! `v-on:<event>`: call a view-model method when an event fires.

use vellum_carton::String;

use super::{BindContext, Binding, Directive};
use crate::errors::{CompileError, CompileResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct OnDirective;

impl Directive for OnDirective {
    fn bind(&self, ctx: &mut BindContext<'_>, binding: &Binding<'_>) -> CompileResult<()> {
        let Some(event) = binding.arg else {
            return Err(CompileError::MissingEventName {
                name: binding.attribute.into(),
                tag: binding.tag.into(),
            });
        };
        let defined = ctx.methods.has_method(binding.expression);
        tracing::debug!(
            node = %binding.node,
            event,
            method = binding.expression,
            defined,
            "bind v-on"
        );

        let methods = ctx.methods.clone();
        let method = String::from(binding.expression);
        ctx.dom
            .add_event_listener(binding.node, event, move |e| methods.invoke(&method, e))?;
        Ok(())
    }
}
