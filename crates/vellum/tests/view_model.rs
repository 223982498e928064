//! End-to-end view-model tests.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use vellum::atelier::CompileError;
use vellum::pulse::Value;
use vellum::relief::{Dom, NodeId};
use vellum::{ViewModel, ViewModelOptions, VellumError};

fn page(markup: &str) -> Dom {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let dom = Dom::new();
    {
        let mut doc = dom.borrow_mut();
        let body = doc.root();
        vellum::armature::parse_into(&mut doc, body, markup).unwrap();
    }
    dom
}

fn find(dom: &Dom, selector: &str) -> NodeId {
    dom.borrow().query_selector(selector).unwrap()
}

fn html(vm: &ViewModel) -> String {
    vm.dom().borrow().inner_html(vm.el().unwrap()).unwrap()
}

#[test]
fn interpolation_follows_data() {
    let dom = page(r#"<div id="app"><span>{{a.b}}</span></div>"#);
    let vm = ViewModel::new(
        &dom,
        ViewModelOptions::new()
            .el("#app")
            .data(json!({ "a": { "b": 1 } })),
    )
    .unwrap();
    let span = find(&dom, "span");
    assert_eq!(dom.borrow().text_content(span).unwrap(), "1");

    vm.set("a.b", 2).unwrap();
    assert_eq!(dom.borrow().text_content(span).unwrap(), "2");
}

#[test]
fn model_round_trip() {
    let dom = page(r#"<div id="app"><input v-model="name"></div>"#);
    let vm = ViewModel::new(
        &dom,
        ViewModelOptions::new().el("#app").data(json!({ "name": "x" })),
    )
    .unwrap();
    let input = find(&dom, "input");
    assert_eq!(dom.borrow().value(input).unwrap(), "x");

    dom.input(input, "y").unwrap();
    assert_eq!(vm.get("name"), Value::from("y"));

    vm.set("name", "z").unwrap();
    assert_eq!(dom.borrow().value(input).unwrap(), "z");
}

#[test]
fn click_calls_method_bound_to_view_model() {
    let dom = page(r#"<div id="app"><button v-on:click="greet">{{ greeting }}</button></div>"#);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let vm = ViewModel::new(
        &dom,
        ViewModelOptions::new()
            .el("#app")
            .data(json!({ "greeting": "hi", "name": "Ann" }))
            .method("greet", move |vm, event| {
                log.borrow_mut()
                    .push(format!("{} {} via {}", vm.get("greeting"), vm.get("name"), event.kind()));
                vm.set("greeting", "bye")?;
                Ok(())
            }),
    )
    .unwrap();
    // Only the interpolation creates a watcher.
    assert_eq!(vm.binding_count(), 1);

    dom.click(find(&dom, "button")).unwrap();
    assert_eq!(*seen.borrow(), vec!["hi Ann via click"]);
    insta::assert_snapshot!(html(&vm), @r#"<button v-on:click="greet">bye</button>"#);
}

#[test]
fn unknown_directive_fails_mount() {
    let dom = page(r#"<div id="app"><p v-foo="x"></p></div>"#);
    let err = ViewModel::new(&dom, ViewModelOptions::new().el("#app").data(json!({ "x": 1 })))
        .unwrap_err();
    assert!(matches!(
        err,
        VellumError::Compile(CompileError::UnknownDirective { .. })
    ));
}

#[test]
fn combined_interpolations_rerender_together() {
    let dom = page(r#"<div id="app">{{a}}-{{b}}</div>"#);
    let vm = ViewModel::new(
        &dom,
        ViewModelOptions::new()
            .el("#app")
            .data(json!({ "a": 1, "b": 2 })),
    )
    .unwrap();
    assert_eq!(vm.binding_count(), 2);

    vm.set("b", 3).unwrap();
    insta::assert_snapshot!(html(&vm), @"1-3");
}

#[test]
fn computed_property_renders_and_tracks_its_inputs() {
    let dom = page(r#"<div id="app"><h1>{{ fullName }}</h1><input v-model="first"></div>"#);
    let vm = ViewModel::new(
        &dom,
        ViewModelOptions::new()
            .el("#app")
            .data(json!({ "first": "Ada", "last": "Lovelace" }))
            .computed("fullName", |vm| {
                format!("{} {}", vm.get("first"), vm.get("last")).into()
            }),
    )
    .unwrap();
    insta::assert_snapshot!(html(&vm), @r#"<h1>Ada Lovelace</h1><input v-model="first">"#);

    dom.input(find(&dom, "input"), "Grace").unwrap();
    insta::assert_snapshot!(html(&vm), @r#"<h1>Grace Lovelace</h1><input v-model="first">"#);

    let err = vm.set("fullName", "x").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Cannot assign to computed property 'fullName'");
}

#[test]
fn html_and_text_directives() {
    let dom = page(r#"<div id="app"><article v-html="body"></article><span v-text="title"></span></div>"#);
    let vm = ViewModel::new(
        &dom,
        ViewModelOptions::new()
            .el("#app")
            .data(json!({ "body": "<p>first</p>", "title": "T" })),
    )
    .unwrap();
    insta::assert_snapshot!(html(&vm), @r#"<article v-html="body"><p>first</p></article><span v-text="title">T</span>"#);

    vm.set("body", "<p>second</p><hr>").unwrap();
    vm.set("title", "<T>").unwrap();
    insta::assert_snapshot!(html(&vm), @r#"<article v-html="body"><p>second</p><hr></article><span v-text="title">&lt;T&gt;</span>"#);
}

#[test]
fn later_properties_are_not_reactive() {
    let dom = page(r#"<div id="app">{{ extra }}</div>"#);
    let vm = ViewModel::new(&dom, ViewModelOptions::new().el("#app").data(json!({}))).unwrap();
    insta::assert_snapshot!(html(&vm), @"undefined");

    vm.set("extra", "now").unwrap();
    insta::assert_snapshot!(html(&vm), @"undefined");
}

#[test]
fn custom_compiler_options() {
    let dom = page(r#"<div id="app"><b data-text="x"></b>${ x }</div>"#);
    let compiler = serde_json::from_value(json!({
        "delimiters": ["${", "}"],
        "directivePrefix": "data-"
    }))
    .unwrap();
    let vm = ViewModel::new(
        &dom,
        ViewModelOptions::new()
            .el("#app")
            .data(json!({ "x": "ok" }))
            .compiler(compiler),
    )
    .unwrap();
    insta::assert_snapshot!(html(&vm), @r#"<b data-text="x">ok</b>ok"#);
}
