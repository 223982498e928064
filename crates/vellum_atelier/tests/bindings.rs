//! Binding behavior tests.
//!
//! Each test mounts markup under an `<div id="app">`, observes the data,
//! compiles, and then drives changes from either side.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use vellum_atelier::{compile, CompileError, Compiler, MethodHost};
use vellum_pulse::{observe, resolve_get, resolve_set, Object, Value, Watcher};
use vellum_relief::{Dom, Event, ListenerResult, NodeId};

struct App {
    dom: Dom,
    data: Object,
    root: NodeId,
}

impl App {
    fn new(markup: &str, data: serde_json::Value) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let dom = Dom::new();
        let root = {
            let mut doc = dom.borrow_mut();
            let app = doc.create_element("div");
            doc.set_attribute(app, "id", "app").unwrap();
            let body = doc.root();
            doc.append_child(body, app).unwrap();
            vellum_armature::parse_into(&mut doc, app, markup).unwrap();
            app
        };
        let data = Object::from_json(data);
        observe(&Value::Object(data.clone()));
        Self { dom, data, root }
    }

    fn compile(&self) -> Vec<Rc<Watcher>> {
        compile(&self.dom, &self.data, self.root).unwrap()
    }

    fn find(&self, selector: &str) -> NodeId {
        self.dom.borrow().query_selector(selector).unwrap()
    }

    fn html(&self) -> String {
        self.dom.borrow().inner_html(self.root).unwrap()
    }
}

mod interpolation {
    use super::*;

    #[test]
    fn renders_and_follows_nested_path() {
        let app = App::new("<span>{{a.b}}</span>", json!({ "a": { "b": 1 } }));
        let _watchers = app.compile();
        let span = app.find("span");
        assert_eq!(app.dom.borrow().text_content(span).unwrap(), "1");

        resolve_set(&app.data, "a.b", Value::from(2)).unwrap();
        assert_eq!(app.dom.borrow().text_content(span).unwrap(), "2");
    }

    #[test]
    fn combined_text_uses_all_current_values() {
        let app = App::new("<p>{{a}}-{{b}}</p>", json!({ "a": "x", "b": "y" }));
        let _watchers = app.compile();

        resolve_set(&app.data, "b", Value::from("z")).unwrap();
        insta::assert_snapshot!(app.html(), @"<p>x-z</p>");
    }

    #[test]
    fn surrounding_text_is_preserved() {
        let app = App::new(
            "<p>Hello, {{ user.name }}! You have {{count}} new messages.</p>",
            json!({ "user": { "name": "Ann" }, "count": 3 }),
        );
        let _watchers = app.compile();
        insta::assert_snapshot!(app.html(), @"<p>Hello, Ann! You have 3 new messages.</p>");

        resolve_set(&app.data, "count", Value::from(4)).unwrap();
        insta::assert_snapshot!(app.html(), @"<p>Hello, Ann! You have 4 new messages.</p>");
    }

    #[test]
    fn replacing_an_object_rerenders() {
        let app = App::new("<p>{{ user.name }}</p>", json!({ "user": { "name": "Ann" } }));
        let _watchers = app.compile();

        resolve_set(&app.data, "user", Value::from(json!({ "name": "Bo" }))).unwrap();
        insta::assert_snapshot!(app.html(), @"<p>Bo</p>");
    }

    #[test]
    fn replacement_object_is_not_subscribed() {
        let app = App::new("<p>{{ user.name }}</p>", json!({ "user": { "name": "Ann" } }));
        let _watchers = app.compile();
        resolve_set(&app.data, "user", Value::from(json!({ "name": "Bo" }))).unwrap();

        // Watchers subscribe only while they are constructed, so the new
        // object's properties are reactive but have no subscribers yet.
        let user = resolve_get(&app.data, "user");
        let user = user.as_object().unwrap();
        assert!(user.is_reactive("name"));
        assert_eq!(user.subscriber_count("name"), 0);

        resolve_set(&app.data, "user.name", Value::from("Cy")).unwrap();
        insta::assert_snapshot!(app.html(), @"<p>Bo</p>");
    }

    #[test]
    fn escaped_output() {
        let app = App::new("<p>{{ snippet }}</p>", json!({ "snippet": "<b>&</b>" }));
        let _watchers = app.compile();
        insta::assert_snapshot!(app.html(), @"<p>&lt;b&gt;&amp;&lt;/b&gt;</p>");
    }

    #[test]
    fn array_writes_are_invisible() {
        let app = App::new("<p>{{ list.0 }}</p>", json!({ "list": ["a"] }));
        let _watchers = app.compile();

        resolve_set(&app.data, "list.0", Value::from("b")).unwrap();
        insta::assert_snapshot!(app.html(), @"<p>a</p>");
    }
}

mod model {
    use super::*;

    #[test]
    fn two_way_binding() {
        let app = App::new(r#"<input v-model="name">"#, json!({ "name": "x" }));
        let _watchers = app.compile();
        let input = app.find("input");
        assert_eq!(app.dom.borrow().value(input).unwrap(), "x");

        app.dom.input(input, "y").unwrap();
        assert_eq!(resolve_get(&app.data, "name"), Value::from("y"));

        resolve_set(&app.data, "name", Value::from("z")).unwrap();
        assert_eq!(app.dom.borrow().value(input).unwrap(), "z");
    }

    #[test]
    fn input_updates_other_bindings() {
        let app = App::new(
            r#"<input v-model="form.title"><h1>{{ form.title }}</h1>"#,
            json!({ "form": { "title": "draft" } }),
        );
        let _watchers = app.compile();

        app.dom.input(app.find("input"), "final").unwrap();
        insta::assert_snapshot!(app.html(), @r#"<input v-model="form.title"><h1>final</h1>"#);
    }

    #[test]
    fn textarea() {
        let app = App::new(r#"<textarea v-model="body"></textarea>"#, json!({ "body": "hi" }));
        let _watchers = app.compile();
        let textarea = app.find("textarea");
        assert_eq!(app.dom.borrow().value(textarea).unwrap(), "hi");
    }
}

mod html {
    use super::*;

    #[test]
    fn repeated_updates_do_not_grow_the_document() {
        let app = App::new(
            r#"<div v-html="content"></div>"#,
            json!({ "content": "<em>0</em>" }),
        );
        let _watchers = app.compile();
        let before = app.dom.borrow().len();

        for n in 1..=200 {
            let markup = format!("<em>{n}</em>");
            resolve_set(&app.data, "content", Value::from(markup)).unwrap();
        }
        assert_eq!(app.dom.borrow().len(), before);
        insta::assert_snapshot!(app.html(), @r#"<div v-html="content"><em>200</em></div>"#);
    }

    #[test]
    fn renders_markup_and_follows_changes() {
        let app = App::new(
            r#"<div v-html="content"></div>"#,
            json!({ "content": "<em>one</em>" }),
        );
        let _watchers = app.compile();
        insta::assert_snapshot!(app.html(), @r#"<div v-html="content"><em>one</em></div>"#);

        resolve_set(&app.data, "content", Value::from("<ul><li>two</li></ul>")).unwrap();
        insta::assert_snapshot!(app.html(), @r#"<div v-html="content"><ul><li>two</li></ul></div>"#);
    }
}

mod text {
    use super::*;

    #[test]
    fn repeated_updates_do_not_grow_the_document() {
        let app = App::new(r#"<p v-text="n"></p>"#, json!({ "n": 0 }));
        let _watchers = app.compile();
        let before = app.dom.borrow().len();

        for n in 1..=1000 {
            resolve_set(&app.data, "n", Value::from(n)).unwrap();
        }
        assert_eq!(app.dom.borrow().len(), before);
        insta::assert_snapshot!(app.html(), @r#"<p v-text="n">1000</p>"#);
    }

    #[test]
    fn binds_text_content() {
        let app = App::new(
            r#"<span v-text="msg">placeholder</span>"#,
            json!({ "msg": "<hello>" }),
        );
        let _watchers = app.compile();
        insta::assert_snapshot!(app.html(), @r#"<span v-text="msg">&lt;hello&gt;</span>"#);

        resolve_set(&app.data, "msg", Value::Null).unwrap();
        insta::assert_snapshot!(app.html(), @r#"<span v-text="msg"></span>"#);
    }
}

mod on {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
        lookups: RefCell<Vec<String>>,
    }

    impl MethodHost for Recorder {
        fn has_method(&self, name: &str) -> bool {
            self.lookups.borrow_mut().push(name.to_string());
            matches!(name, "greet" | "fail")
        }

        fn invoke(&self, name: &str, event: &Event) -> ListenerResult {
            if !matches!(name, "greet" | "fail") {
                return Err(CompileError::UnknownMethod { name: name.into() }.into());
            }
            if name == "fail" {
                return Err("method failed".into());
            }
            self.calls
                .borrow_mut()
                .push(format!("{name}({}@{})", event.kind(), event.target()));
            Ok(())
        }
    }

    fn compile_with(app: &App, host: &Rc<Recorder>) -> Vec<Rc<Watcher>> {
        Compiler::new(&app.dom, &app.data)
            .with_methods(host.clone())
            .compile(app.root)
            .unwrap()
    }

    #[test]
    fn click_invokes_method_with_event() {
        let app = App::new(r#"<button v-on:click="greet">Hi</button>"#, json!({}));
        let host = Rc::new(Recorder::default());
        let watchers = compile_with(&app, &host);
        assert!(watchers.is_empty());

        let button = app.find("button");
        app.dom.click(button).unwrap();
        assert_eq!(*host.calls.borrow(), vec![format!("greet(click@{button})")]);
    }

    #[test]
    fn bubbled_event_keeps_original_target() {
        let app = App::new(
            r#"<ul v-on:click="greet"><li><a>link</a></li></ul>"#,
            json!({}),
        );
        let host = Rc::new(Recorder::default());
        let _watchers = compile_with(&app, &host);

        let link = app.find("a");
        app.dom.click(link).unwrap();
        assert_eq!(*host.calls.borrow(), vec![format!("greet(click@{link})")]);
    }

    #[test]
    fn binding_looks_up_methods_without_calling_them() {
        let app = App::new(
            r#"<button v-on:click="greet"></button><a v-on:click="missing"></a>"#,
            json!({}),
        );
        let host = Rc::new(Recorder::default());
        let _watchers = compile_with(&app, &host);

        assert_eq!(*host.lookups.borrow(), vec!["greet", "missing"]);
        assert!(host.calls.borrow().is_empty());
    }

    #[test]
    fn unknown_method_fails_when_fired() {
        let app = App::new(r#"<button v-on:click="missing"></button>"#, json!({}));
        let host = Rc::new(Recorder::default());
        let _watchers = compile_with(&app, &host);

        let err = app.dom.click(app.find("button")).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"Listener for 'click' failed: Method 'missing' is not defined");
    }

    #[test]
    fn method_error_propagates() {
        let app = App::new(r#"<button v-on:click="fail"></button>"#, json!({}));
        let host = Rc::new(Recorder::default());
        let _watchers = compile_with(&app, &host);
        assert!(app.dom.click(app.find("button")).is_err());
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_directive_fails_compilation() {
        let app = App::new(r#"<div v-foo="x"></div>"#, json!({ "x": 1 }));
        let err = compile(&app.dom, &app.data, app.root).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"Unknown directive 'v-foo' on <div>");
    }

    #[test]
    fn failing_render_stops_notification() {
        let app = App::new("<p>{{ a }}</p>", json!({ "a": 1 }));
        let _watchers = app.compile();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let _later = Watcher::new(&app.data, "a", move |v| {
            s.borrow_mut().push(v.to_string());
            Ok(())
        });

        resolve_set(&app.data, "a", Value::from(2)).unwrap();
        assert_eq!(*seen.borrow(), vec!["2"]);

        let _failing = Watcher::new(&app.data, "a", |_| Err("boom".into()));
        let _last = {
            let s = seen.clone();
            Watcher::new(&app.data, "a", move |v| {
                s.borrow_mut().push(format!("last:{v}"));
                Ok(())
            })
        };
        let err = resolve_set(&app.data, "a", Value::from(3)).unwrap_err();
        assert!(matches!(err, vellum_pulse::ReactiveError::Callback { .. }));
        assert_eq!(*seen.borrow(), vec!["2", "3"]);
        insta::assert_snapshot!(app.html(), @"<p>3</p>");
    }
}
