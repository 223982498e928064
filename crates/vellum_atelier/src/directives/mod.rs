//! Directive dispatch.
//!
//! A directive attribute `v-<name>[:<arg>]` is resolved by name against a
//! [`DirectiveRegistry`]. The handler found there wires the element to its
//! expression, usually by installing a [`Watcher`] and rendering once.
//! A name with no handler is a hard error.

mod interpolation;
mod v_html;
mod v_model;
mod v_on;
mod v_text;

use std::fmt;
use std::rc::Rc;

use vellum_carton::{FxHashMap, String};
use vellum_pulse::{CallbackResult, Object, Value, Watcher};
use vellum_relief::{Dom, Event, ListenerResult, NodeId};

use crate::errors::{CompileError, CompileResult};

pub use interpolation::bind_interpolation;
pub use v_html::HtmlDirective;
pub use v_model::ModelDirective;
pub use v_on::OnDirective;
pub use v_text::TextDirective;

/// Receiver of `v-on` handlers.
///
/// Method names are looked up when the event fires, not at compile time.
/// `invoke` reports a missing method as [`CompileError::UnknownMethod`].
pub trait MethodHost {
    /// Whether `name` is defined right now. Only reported when a handler is
    /// bound; a missing method does not fail compilation.
    fn has_method(&self, name: &str) -> bool;

    fn invoke(&self, name: &str, event: &Event) -> ListenerResult;
}

/// Host with no methods at all
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMethods;

impl MethodHost for NoMethods {
    fn has_method(&self, _name: &str) -> bool {
        false
    }

    fn invoke(&self, name: &str, _event: &Event) -> ListenerResult {
        Err(CompileError::UnknownMethod { name: name.into() }.into())
    }
}

/// Everything a directive handler may touch while binding.
pub struct BindContext<'c> {
    pub dom: &'c Dom,
    pub data: &'c Object,
    pub methods: &'c Rc<dyn MethodHost>,
    watchers: Vec<Rc<Watcher>>,
}

impl<'c> BindContext<'c> {
    pub fn new(dom: &'c Dom, data: &'c Object, methods: &'c Rc<dyn MethodHost>) -> Self {
        Self {
            dom,
            data,
            methods,
            watchers: Vec::new(),
        }
    }

    /// Create a watcher on the data root, owned by `node`.
    ///
    /// The document keeps the watcher alive until `node` is freed, so the
    /// callback should only hold the document weakly.
    pub fn watch<F>(
        &mut self,
        node: NodeId,
        expression: &str,
        callback: F,
    ) -> CompileResult<Rc<Watcher>>
    where
        F: Fn(&Value) -> CallbackResult + 'static,
    {
        let watcher = Watcher::new(self.data, expression, callback);
        self.dom.borrow_mut().retain(node, watcher.clone())?;
        self.watchers.push(watcher.clone());
        Ok(watcher)
    }

    pub fn watchers(&self) -> &[Rc<Watcher>] {
        &self.watchers
    }

    pub fn into_watchers(self) -> Vec<Rc<Watcher>> {
        self.watchers
    }
}

/// One directive occurrence, as written on an element.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    pub node: NodeId,
    /// Full attribute name, e.g. `v-on:click`
    pub attribute: &'a str,
    pub tag: &'a str,
    /// Trimmed attribute value
    pub expression: &'a str,
    /// Text after the `:`, if any
    pub arg: Option<&'a str>,
}

/// Behavior behind a directive name.
pub trait Directive {
    fn bind(&self, ctx: &mut BindContext<'_>, binding: &Binding<'_>) -> CompileResult<()>;
}

/// Directive name to handler table.
#[derive(Clone)]
pub struct DirectiveRegistry {
    handlers: FxHashMap<String, Rc<dyn Directive>>,
}

impl DirectiveRegistry {
    /// A registry with no directives
    pub fn empty() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// `model`, `html`, `text` and `on`
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("model", ModelDirective);
        registry.register("html", HtmlDirective);
        registry.register("text", TextDirective);
        registry.register("on", OnDirective);
        registry
    }

    /// Add or replace a handler
    pub fn register(&mut self, name: &str, directive: impl Directive + 'static) {
        self.handlers.insert(name.into(), Rc::new(directive));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Find the handler for `name`, failing with [`CompileError::UnknownDirective`]
    pub fn resolve(&self, name: &str, binding: &Binding<'_>) -> CompileResult<Rc<dyn Directive>> {
        self.handlers
            .get(name)
            .cloned()
            .ok_or_else(|| CompileError::UnknownDirective {
                name: binding.attribute.into(),
                tag: binding.tag.into(),
            })
    }
}

impl Default for DirectiveRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("DirectiveRegistry")
            .field("directives", &names)
            .finish()
    }
}
