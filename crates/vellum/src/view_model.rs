//! The view-model composition root.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use vellum_atelier::{CompileError, Compiler, MethodHost};
use vellum_carton::{FxHashMap, String};
use vellum_pulse::{observe, resolve_get, resolve_set, Object, Value, Watcher};
use vellum_relief::{Dom, Event, ListenerResult, NodeId};

use crate::errors::{VellumError, VellumResult};
use crate::options::{MethodFn, MountTarget, ViewModelOptions};

struct Inner {
    dom: Dom,
    el: Option<NodeId>,
    data: Object,
    methods: FxHashMap<String, MethodFn>,
    bindings: RefCell<Vec<Weak<Watcher>>>,
}

/// A data object bound to a DOM subtree.
///
/// Cloning shares the same view-model. Bindings belong to the DOM nodes they
/// render into, so they outlive the view-model as long as the document and
/// the data are alive.
#[derive(Clone)]
pub struct ViewModel {
    inner: Rc<Inner>,
}

impl ViewModel {
    /// Build a view-model and, when `el` is set, mount it.
    ///
    /// Mounting makes the data reactive, installs the computed properties on
    /// the data root, and compiles the subtree under `el`. Without `el` the
    /// data is left untouched and nothing is compiled.
    pub fn new(dom: &Dom, options: ViewModelOptions) -> VellumResult<Self> {
        let ViewModelOptions {
            el,
            data,
            computed,
            methods,
            compiler,
        } = options;

        let el = el.map(|target| resolve_mount(dom, &target)).transpose()?;
        let vm = Self {
            inner: Rc::new(Inner {
                dom: dom.clone(),
                el,
                data,
                methods: methods.into_iter().collect(),
                bindings: RefCell::new(Vec::new()),
            }),
        };

        let Some(root) = el else {
            tracing::debug!("no mount target, skipping compilation");
            return Ok(vm);
        };

        let data = &vm.inner.data;
        observe(&Value::Object(data.clone()));

        for (name, getter) in computed {
            let weak = Rc::downgrade(&vm.inner);
            data.define_computed(&name, move |_| match weak.upgrade() {
                Some(inner) => getter(&ViewModel { inner }),
                None => Value::Undefined,
            });
        }

        let host: Rc<dyn MethodHost> = Rc::new(MethodDispatch(Rc::downgrade(&vm.inner)));
        let bindings = Compiler::new(dom, data)
            .with_methods(host)
            .with_options(compiler)
            .compile(root)?;
        tracing::debug!(root = %root, bindings = bindings.len(), "mounted");
        *vm.inner.bindings.borrow_mut() = bindings.iter().map(Rc::downgrade).collect();
        Ok(vm)
    }

    /// Read a dotted path from the data root
    pub fn get(&self, path: &str) -> Value {
        resolve_get(&self.inner.data, path)
    }

    /// Write a dotted path on the data root
    pub fn set(&self, path: &str, value: impl Into<Value>) -> VellumResult<()> {
        resolve_set(&self.inner.data, path, value.into())?;
        Ok(())
    }

    pub fn data(&self) -> &Object {
        &self.inner.data
    }

    pub fn dom(&self) -> &Dom {
        &self.inner.dom
    }

    /// The mounted root, if any
    pub fn el(&self) -> Option<NodeId> {
        self.inner.el
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.el.is_some()
    }

    /// Number of watchers created by compilation that are still alive
    pub fn binding_count(&self) -> usize {
        self.inner
            .bindings
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    pub fn method(&self, name: &str) -> Option<MethodFn> {
        self.inner.methods.get(name).cloned()
    }

    /// Call a method with this view-model bound as its receiver
    pub fn call(&self, name: &str, event: &Event) -> ListenerResult {
        let Some(method) = self.method(name) else {
            return Err(CompileError::UnknownMethod { name: name.into() }.into());
        };
        method(self, event)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ViewModel) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("el", &self.inner.el)
            .field("data", &self.inner.data)
            .field("bindings", &self.binding_count())
            .finish()
    }
}

fn resolve_mount(dom: &Dom, target: &MountTarget) -> VellumResult<NodeId> {
    let doc = dom.borrow();
    match target {
        MountTarget::Node(node) => {
            doc.node(*node)?;
            Ok(*node)
        }
        MountTarget::Selector(selector) => {
            doc.query_selector(selector)
                .ok_or_else(|| VellumError::MountNotFound {
                    selector: selector.clone(),
                })
        }
    }
}

/// Method receiver handed to the compiler. Holds the view-model weakly, since
/// the listeners it serves are owned by the document.
struct MethodDispatch(Weak<Inner>);

impl MethodHost for MethodDispatch {
    fn has_method(&self, name: &str) -> bool {
        self.0
            .upgrade()
            .is_some_and(|inner| inner.methods.contains_key(name))
    }

    fn invoke(&self, name: &str, event: &Event) -> ListenerResult {
        match self.0.upgrade() {
            Some(inner) => ViewModel { inner }.call(name, event),
            None => {
                tracing::trace!(method = name, "view-model dropped, ignoring event");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(markup: &str) -> Dom {
        let dom = Dom::new();
        {
            let mut doc = dom.borrow_mut();
            let body = doc.root();
            vellum_armature::parse_into(&mut doc, body, markup).unwrap();
        }
        dom
    }

    #[test]
    fn test_without_el_nothing_is_observed() {
        let dom = page("<p>{{ a }}</p>");
        let vm = ViewModel::new(
            &dom,
            ViewModelOptions::new()
                .data(json!({ "a": 1 }))
                .computed("c", |_| Value::Null),
        )
        .unwrap();

        assert!(!vm.is_mounted());
        assert!(!vm.data().is_reactive("a"));
        assert!(!vm.data().has("c"));
        insta::assert_snapshot!(dom.borrow().inner_html(dom.borrow().root()).unwrap(), @"<p>{{ a }}</p>");
    }

    #[test]
    fn test_mount_by_selector_and_node() {
        let dom = page(r#"<main class="shell"><div id="app">{{ a }}</div></main>"#);
        let vm = ViewModel::new(
            &dom,
            ViewModelOptions::new().el("#app").data(json!({ "a": 1 })),
        )
        .unwrap();
        assert_eq!(vm.binding_count(), 1);

        let shell = dom.borrow().query_selector(".shell").unwrap();
        let again = ViewModel::new(
            &dom,
            ViewModelOptions::new().el(shell).data(json!({ "a": 2 })),
        )
        .unwrap();
        assert_eq!(again.el(), Some(shell));
    }

    #[test]
    fn test_missing_mount_target() {
        let dom = page("<div></div>");
        let err = ViewModel::new(&dom, ViewModelOptions::new().el("#nope")).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"Mount target '#nope' not found");
    }

    #[test]
    fn test_proxy_get_set() {
        let dom = page(r#"<div id="app"></div>"#);
        let vm = ViewModel::new(
            &dom,
            ViewModelOptions::new()
                .el("#app")
                .data(json!({ "user": { "name": "ann" } })),
        )
        .unwrap();

        vm.set("user.name", "bo").unwrap();
        assert_eq!(vm.get("user.name"), Value::from("bo"));
        assert!(vm.set("user.name.first", "x").is_err());
    }

    #[test]
    fn test_call_binds_receiver() {
        let dom = page(r#"<div id="app"></div>"#);
        let vm = ViewModel::new(
            &dom,
            ViewModelOptions::new()
                .el("#app")
                .data(json!({ "count": 0 }))
                .method("bump", |vm, _| {
                    let next = vm.get("count").as_f64().unwrap_or(0.0) + 1.0;
                    vm.set("count", next)?;
                    Ok(())
                }),
        )
        .unwrap();

        let event = Event::new("click", vm.el().unwrap());
        vm.call("bump", &event).unwrap();
        vm.call("bump", &event).unwrap();
        assert_eq!(vm.get("count"), Value::from(2));
        assert!(vm.call("nope", &event).is_err());
        assert!(vm.method("bump").is_some());
    }

    #[test]
    fn test_bindings_live_with_the_document() {
        let dom = page(r#"<div id="app">{{ a }}</div>"#);
        let vm = ViewModel::new(
            &dom,
            ViewModelOptions::new().el("#app").data(json!({ "a": 1 })),
        )
        .unwrap();
        let data = vm.data().clone();
        assert_eq!(data.subscriber_count("a"), 1);

        drop(vm);
        data.set("a", Value::from(2)).unwrap();
        let app = dom.borrow().query_selector("#app").unwrap();
        assert_eq!(dom.borrow().text_content(app).unwrap(), "2");

        drop(dom);
        assert_eq!(data.subscriber_count("a"), 0);
    }

    #[test]
    fn test_binding_count_tracks_replaced_content() {
        let dom = page(r#"<div id="app"><div v-html="markup"></div></div>"#);
        let vm = ViewModel::new(
            &dom,
            ViewModelOptions::new()
                .el("#app")
                .data(json!({ "markup": "<b>{{ a }}</b>", "a": 1 })),
        )
        .unwrap();
        assert_eq!(vm.binding_count(), 2);

        vm.set("markup", "plain").unwrap();
        assert_eq!(vm.binding_count(), 1);
    }
}
