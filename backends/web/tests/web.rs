//! Browser tests, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use std::{cell::Cell, rc::Rc};

use trellis_core::{BoundaryMode, Handler, RenderHost, namespace};
use trellis_web::WebHost;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn builds_elements_under_the_mount_point() {
    let mut host = WebHost::new(None).unwrap();
    host.clear().unwrap();
    let div = host.create_element("div").unwrap();
    host.set_data(div, "state", "box").unwrap();
    let span = host.create_element("span").unwrap();
    host.set_text_content(span, "hi").unwrap();
    host.append_child(div, span).unwrap();
    host.append_child(host.root(), div).unwrap();

    assert_eq!(
        host.dom_element(div).unwrap().outer_html(),
        r#"<div data-state="box"><span>hi</span></div>"#
    );
    assert_eq!(host.parent(div), Some(host.root()));
    assert_eq!(host.data(div, "state").as_deref(), Some("box"));

    host.detach(div).unwrap();
    host.detach(div).unwrap();
    assert_eq!(host.parent(div), None);
}

#[wasm_bindgen_test]
fn svg_elements_get_the_svg_namespace() {
    let mut host = WebHost::new(None).unwrap();
    let svg = host.create_element_ns(namespace::SVG, "svg").unwrap();
    host.set_attribute_ns(svg, None, "viewBox", "0 0 10 10").unwrap();
    let element = host.dom_element(svg).unwrap();
    assert_eq!(element.namespace_uri().as_deref(), Some(namespace::SVG));
    assert_eq!(element.get_attribute("viewBox").as_deref(), Some("0 0 10 10"));
}

#[wasm_bindgen_test]
fn listeners_fire_until_removed() {
    let mut host = WebHost::new(None).unwrap();
    let button = host.create_element("button").unwrap();
    host.append_child(host.root(), button).unwrap();
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let handler = Handler::new(move |_| counter.set(counter.get() + 1));

    let listener = host.add_listener(button, "click", &handler, None).unwrap();
    let element: HtmlElement = host.dom_element(button).unwrap().clone().unchecked_into();
    element.click();
    host.remove_listener(button, "click", listener).unwrap();
    element.click();

    assert_eq!(hits.get(), 1);
}

#[wasm_bindgen_test]
fn boundaries_attach_to_supported_hosts() {
    let mut host = WebHost::new(None).unwrap();
    let section = host.create_element("section").unwrap();
    let boundary = host.attach_boundary(section, BoundaryMode::Open).unwrap();
    let inner = host.create_element("p").unwrap();
    host.append_child(boundary, inner).unwrap();
    assert_eq!(host.dom_element(section).unwrap().inner_html(), "");

    let button = host.create_element("button").unwrap();
    assert!(host.attach_boundary(button, BoundaryMode::Open).is_err());
}

#[wasm_bindgen_test]
fn parent_lookup_follows_moves_and_removals() {
    let mut host = WebHost::new(None).unwrap();
    let first = host.create_element("div").unwrap();
    let second = host.create_element("div").unwrap();
    let item = host.create_element("p").unwrap();
    host.append_child(first, item).unwrap();
    assert_eq!(host.parent(item), Some(first));

    host.append_child(second, item).unwrap();
    assert_eq!(host.parent(item), Some(second));

    // content replacement removes children behind the host's back
    host.set_text_content(second, "gone").unwrap();
    assert_eq!(host.parent(item), None);
}

#[wasm_bindgen_test]
fn released_nodes_are_dropped_with_their_listeners() {
    let mut host = WebHost::new(None).unwrap();
    let button = host.create_element("button").unwrap();
    host.append_child(host.root(), button).unwrap();
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let handler = Handler::new(move |_| counter.set(counter.get() + 1));
    host.add_listener(button, "click", &handler, None).unwrap();
    let element: HtmlElement = host.dom_element(button).unwrap().clone().unchecked_into();

    assert!(host.release(button));
    element.click();

    assert_eq!(hits.get(), 0);
    assert!(element.parent_node().is_none());
    assert!(!host.contains(button));
    assert!(host.node(button).is_none());
    assert!(!host.release(button));
    assert!(!host.release(host.root()));
}
