//! Atelier - The template compiler workshop for Vellum.
//!
//! Walks a DOM subtree once, dispatching `v-*` directive attributes through a
//! [`DirectiveRegistry`] and binding `{{ }}` interpolations in text. Every
//! binding becomes a [`vellum_pulse::Watcher`] that pushes data changes into
//! the DOM through the primitives in [`updater`].
//!
//! ```
//! use vellum_atelier::compile;
//! use vellum_pulse::{observe, resolve_set, Object, Value};
//! use vellum_relief::Dom;
//!
//! let dom = Dom::new();
//! let root = {
//!     let mut doc = dom.borrow_mut();
//!     let app = doc.create_element("div");
//!     vellum_armature::parse_into(&mut doc, app, "<span>{{a.b}}</span>").unwrap();
//!     app
//! };
//! let data = Object::from_json(serde_json::json!({ "a": { "b": 1 } }));
//! observe(&Value::Object(data.clone()));
//!
//! let _watchers = compile(&dom, &data, root).unwrap();
//! assert_eq!(dom.borrow().text_content(root).unwrap(), "1");
//!
//! resolve_set(&data, "a.b", Value::from(2)).unwrap();
//! assert_eq!(dom.borrow().text_content(root).unwrap(), "2");
//! ```

pub mod compiler;
pub mod directives;
pub mod errors;
pub mod options;
pub mod updater;

pub use compiler::{compile, Compiler};
pub use directives::{
    BindContext, Binding, Directive, DirectiveRegistry, HtmlDirective, MethodHost,
    ModelDirective, NoMethods, OnDirective, TextDirective,
};
pub use errors::{CompileError, CompileResult};
pub use options::CompilerOptions;
