//! Template compiler.
//!
//! Compiling a mounted root:
//!
//! 1. moves the root's children into a detached fragment,
//! 2. walks the fragment depth-first, dispatching directive attributes on
//!    elements and binding interpolations in every other node,
//! 3. appends the fragment back under the root in one step.
//!
//! Nodes are discovered exactly once. Anything inserted afterwards is never
//! scanned, except for markup that a directive inserts into an element
//! before its children are walked.

use std::rc::Rc;

use regex::Regex;
use vellum_carton::{SmallVec, String};
use vellum_pulse::{Object, Watcher};
use vellum_relief::{Dom, NodeId};

use crate::directives::{
    bind_interpolation, BindContext, Binding, DirectiveRegistry, MethodHost, NoMethods,
};
use crate::errors::CompileResult;
use crate::options::CompilerOptions;

/// Binds a DOM subtree to a data root.
pub struct Compiler {
    dom: Dom,
    data: Object,
    methods: Rc<dyn MethodHost>,
    registry: DirectiveRegistry,
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(dom: &Dom, data: &Object) -> Self {
        Self {
            dom: dom.clone(),
            data: data.clone(),
            methods: Rc::new(NoMethods),
            registry: DirectiveRegistry::with_builtins(),
            options: CompilerOptions::default(),
        }
    }

    pub fn with_methods(mut self, methods: Rc<dyn MethodHost>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_registry(mut self, registry: DirectiveRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry_mut(&mut self) -> &mut DirectiveRegistry {
        &mut self.registry
    }

    /// Compile everything under `root`, returning the watchers the bindings
    /// created.
    ///
    /// Each watcher is owned by the node it renders into and lives as long as
    /// that node; the returned list does not need to be kept. On error the
    /// walk stops where it failed, and the root's original children stay
    /// detached.
    pub fn compile(&self, root: NodeId) -> CompileResult<Vec<Rc<Watcher>>> {
        let pattern = self.options.interpolation()?;
        let fragment = self.node_to_fragment(root)?;

        let mut ctx = BindContext::new(&self.dom, &self.data, &self.methods);
        self.compile_children(&mut ctx, &pattern, fragment)?;
        self.dom.borrow_mut().append_child(root, fragment)?;

        let watchers = ctx.into_watchers();
        tracing::debug!(root = %root, watchers = watchers.len(), "compiled");
        Ok(watchers)
    }

    fn node_to_fragment(&self, root: NodeId) -> CompileResult<NodeId> {
        let mut doc = self.dom.borrow_mut();
        doc.node(root)?;
        let fragment = doc.create_fragment();
        while let Some(child) = doc.first_child(root) {
            doc.append_child(fragment, child)?;
        }
        Ok(fragment)
    }

    fn compile_children(
        &self,
        ctx: &mut BindContext<'_>,
        pattern: &Regex,
        parent: NodeId,
    ) -> CompileResult<()> {
        let children = self.dom.borrow().children(parent)?.to_vec();
        for child in children {
            let is_element = self.dom.borrow().is_element(child);
            if is_element {
                self.compile_element(ctx, child)?;
                self.compile_children(ctx, pattern, child)?;
            } else {
                self.compile_text(ctx, pattern, child)?;
            }
        }
        Ok(())
    }

    fn compile_element(&self, ctx: &mut BindContext<'_>, node: NodeId) -> CompileResult<()> {
        let (tag, attributes): (String, Vec<(String, String)>) = {
            let doc = self.dom.borrow();
            let el = doc.element(node)?;
            let attributes = el
                .attributes
                .iter()
                .map(|attr| (attr.name.clone(), attr.value.clone()))
                .collect();
            (el.tag.clone(), attributes)
        };

        for (name, value) in &attributes {
            let Some(directive) = self.options.directive_name(name) else {
                continue;
            };
            let parts: SmallVec<[&str; 2]> = directive.split(':').take(2).collect();
            let binding = Binding {
                node,
                attribute: name,
                tag: &tag,
                expression: value.trim(),
                arg: parts.get(1).copied().filter(|arg| !arg.is_empty()),
            };
            let handler = self.registry.resolve(parts[0], &binding)?;
            handler.bind(ctx, &binding)?;
        }
        Ok(())
    }

    fn compile_text(
        &self,
        ctx: &mut BindContext<'_>,
        pattern: &Regex,
        node: NodeId,
    ) -> CompileResult<()> {
        let content = self.dom.borrow().text_content(node)?;
        if pattern.is_match(&content) {
            bind_interpolation(ctx, node, &content, pattern)?;
        }
        Ok(())
    }
}

/// Compile `root` with the built-in directives and default options
pub fn compile(dom: &Dom, data: &Object, root: NodeId) -> CompileResult<Vec<Rc<Watcher>>> {
    Compiler::new(dom, data).compile(root)
}
