//! Construction options for a view-model.

use std::fmt;
use std::rc::Rc;

use vellum_atelier::CompilerOptions;
use vellum_carton::String;
use vellum_pulse::{Object, Value};
use vellum_relief::{Event, ListenerResult, NodeId};

use crate::view_model::ViewModel;

/// Computed property getter, evaluated on every read.
pub type ComputedFn = Rc<dyn Fn(&ViewModel) -> Value>;

/// Event handler bound to the view-model.
pub type MethodFn = Rc<dyn Fn(&ViewModel, &Event) -> ListenerResult>;

/// Where a view-model mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountTarget {
    /// `#id`, `.class` or a tag name, matched against the whole document
    Selector(String),
    Node(NodeId),
}

impl From<&str> for MountTarget {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.into())
    }
}

impl From<NodeId> for MountTarget {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// `el`, `data`, `computed` and `methods`, plus compiler settings.
///
/// ```
/// use vellum::ViewModelOptions;
///
/// let options = ViewModelOptions::new()
///     .el("#app")
///     .data(serde_json::json!({ "first": "Ada", "last": "Lovelace" }))
///     .computed("full", |vm| {
///         format!("{} {}", vm.get("first"), vm.get("last")).into()
///     })
///     .method("reset", |vm, _event| {
///         vm.set("first", "")?;
///         Ok(())
///     });
/// assert!(options.el.is_some());
/// ```
#[derive(Default)]
pub struct ViewModelOptions {
    pub el: Option<MountTarget>,
    pub data: Object,
    /// Installed in this order
    pub computed: Vec<(String, ComputedFn)>,
    pub methods: Vec<(String, MethodFn)>,
    pub compiler: CompilerOptions,
}

impl ViewModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn el(mut self, target: impl Into<MountTarget>) -> Self {
        self.el = Some(target.into());
        self
    }

    /// Data root, from JSON or an existing object
    pub fn data(mut self, data: impl Into<Value>) -> Self {
        self.data = match data.into() {
            Value::Object(obj) => obj,
            other => {
                tracing::warn!(data = %other, "view-model data must be an object; using an empty one");
                Object::new()
            }
        };
        self
    }

    pub fn computed<F>(mut self, name: &str, getter: F) -> Self
    where
        F: Fn(&ViewModel) -> Value + 'static,
    {
        self.computed.push((name.into(), Rc::new(getter)));
        self
    }

    pub fn method<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&ViewModel, &Event) -> ListenerResult + 'static,
    {
        self.methods.push((name.into(), Rc::new(handler)));
        self
    }

    pub fn compiler(mut self, options: CompilerOptions) -> Self {
        self.compiler = options;
        self
    }
}

fn names<T>(entries: &[(String, T)]) -> Vec<&str> {
    entries.iter().map(|(name, _)| name.as_str()).collect()
}

impl fmt::Debug for ViewModelOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModelOptions")
            .field("el", &self.el)
            .field("data", &self.data)
            .field("computed", &names(&self.computed))
            .field("methods", &names(&self.methods))
            .field("compiler", &self.compiler)
            .finish()
    }
}
