//! # Vellum
//!
//! A small reactive view-model binding engine. Data mutations re-render the
//! DOM nodes bound to them, and user input on bound nodes writes back into
//! the data, with no virtual DOM in between.
//!
//! ```
//! use vellum::{relief::Dom, ViewModel, ViewModelOptions};
//!
//! let dom = Dom::new();
//! {
//!     let mut doc = dom.borrow_mut();
//!     let body = doc.root();
//!     vellum::armature::parse_into(&mut doc, body, r#"<div id="app">{{ a.b }}</div>"#).unwrap();
//! }
//!
//! let vm = ViewModel::new(
//!     &dom,
//!     ViewModelOptions::new()
//!         .el("#app")
//!         .data(serde_json::json!({ "a": { "b": 1 } })),
//! )
//! .unwrap();
//!
//! vm.set("a.b", 2).unwrap();
//! let app = vm.el().unwrap();
//! assert_eq!(dom.borrow().text_content(app).unwrap(), "2");
//! ```
//!
//! ## Crates
//!
//! - [`carton`] - Shared utilities and re-exports
//! - [`relief`] - In-memory DOM and event dispatch
//! - [`armature`] - HTML parser
//! - [`pulse`] - Dependency-tracking reactivity
//! - [`atelier`] - Directives and the template compiler

/// Shared utilities and re-exports.
pub use vellum_carton as carton;

/// In-memory DOM and event dispatch.
pub use vellum_relief as relief;

/// HTML parser.
pub use vellum_armature as armature;

/// Dependency-tracking reactivity.
pub use vellum_pulse as pulse;

/// Directives and the template compiler.
pub use vellum_atelier as atelier;

pub mod config;
pub mod errors;
pub mod options;
pub mod view_model;

pub use config::{load_config, VellumConfig};
pub use errors::{VellumError, VellumResult};
pub use options::{ComputedFn, MethodFn, MountTarget, ViewModelOptions};
pub use view_model::ViewModel;
