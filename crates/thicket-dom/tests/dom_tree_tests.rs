//! Tests for DOM tree construction, mutation, shadow roots, and events.

use std::cell::RefCell;
use std::rc::Rc;

use thicket_dom::{
    Attribute, DomTree, ElementData, Event, EventKind, HTML_NAMESPACE, NodeId, NodeType,
    SVG_NAMESPACE, ShadowRootMode,
};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::html(tag)))
}

// ========== construction ==========

#[test]
fn test_html_element_is_lowercased() {
    let element = ElementData::html("DIV");
    assert_eq!(element.local_name, "div");
    assert_eq!(element.namespace.as_deref(), Some(HTML_NAMESPACE));
    assert!(element.prefix.is_none());
}

#[test]
fn test_prefixed_element_splits_qualified_name() {
    let element = ElementData::new(Some(SVG_NAMESPACE), "svg:rect");
    assert_eq!(element.local_name, "rect");
    assert_eq!(element.prefix.as_deref(), Some("svg"));
    assert!(!element.is_html());
}

#[test]
fn test_attribute_qualified_name() {
    let plain = Attribute::new("href", "#a");
    assert_eq!(plain.qualified_name(), "href");

    let namespaced = Attribute::namespaced("http://www.w3.org/1999/xlink", "xlink:href", "#b");
    assert_eq!(namespaced.local_name, "href");
    assert_eq!(namespaced.qualified_name(), "xlink:href");
}

#[test]
fn test_set_attribute_replaces_value() {
    let mut element = ElementData::html("input").with_attr("type", "text");
    element.set_attribute("type", "email");
    assert_eq!(element.get_attribute("type"), Some("email"));
    assert_eq!(element.attrs.len(), 1);

    element.remove_attribute("type");
    assert!(!element.has_attribute("type"));
}

#[test]
fn test_classes_split_on_whitespace() {
    let element = ElementData::html("p").with_attr("class", " a  b\tc ");
    assert_eq!(element.classes().collect::<Vec<_>>(), vec!["a", "b", "c"]);
}

#[test]
fn test_append_html_and_text() {
    let mut tree = DomTree::new();
    let html = tree.append_html(NodeId::ROOT, "html", &[]);
    let body = tree.append_html(html, "body", &[("id", "main")]);
    let _ = tree.append_text(body, "hello ");
    let span = tree.append_html(body, "span", &[]);
    let _ = tree.append_text(span, "world");

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.as_element(body).and_then(ElementData::id), Some("main"));
    assert_eq!(tree.text_content(body), "hello world");
}

// ========== mutation ==========

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.parent(b), None);
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, c);

    let b = alloc_element(&mut tree, "b");
    tree.insert_before(parent, b, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let existing = alloc_element(&mut tree, "b");
    tree.append_child(parent, existing);

    let new_child = alloc_element(&mut tree, "a");
    tree.insert_before(parent, new_child, existing);

    assert_eq!(tree.children(parent), &[new_child, existing]);
    assert_eq!(tree.prev_sibling(new_child), None);
    assert_eq!(tree.prev_sibling(existing), Some(new_child));
}

#[test]
fn test_ancestors_walk_to_document() {
    let mut tree = DomTree::new();
    let html = tree.append_html(NodeId::ROOT, "html", &[]);
    let body = tree.append_html(html, "body", &[]);
    let p = tree.append_html(body, "p", &[]);

    assert_eq!(tree.ancestors(p).collect::<Vec<_>>(), vec![body, html, NodeId::ROOT]);
    assert!(tree.is_descendant_of(p, html));
    assert!(!tree.is_descendant_of(html, p));
}

// ========== shadow roots ==========

#[test]
fn test_attach_shadow_records_host() {
    let mut tree = DomTree::new();
    let host = tree.append_html(NodeId::ROOT, "div", &[("id", "host")]);
    let shadow = tree.attach_shadow(host, ShadowRootMode::Open).unwrap();

    assert_eq!(tree.host(shadow), Some(host));
    assert_eq!(tree.shadow_root(host), Some(shadow));
    assert_eq!(tree.parent(shadow), None);

    // Attaching twice returns the same root.
    assert_eq!(tree.attach_shadow(host, ShadowRootMode::Closed), Some(shadow));
}

#[test]
fn test_attach_shadow_on_text_fails() {
    let mut tree = DomTree::new();
    let text = tree.append_text(NodeId::ROOT, "x");
    assert_eq!(tree.attach_shadow(text, ShadowRootMode::Open), None);
}

// ========== events ==========

#[test]
fn test_listener_receives_events_until_guard_dropped() {
    let mut tree = DomTree::new();
    let button = tree.append_html(NodeId::ROOT, "button", &[]);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&seen);
    let guard = tree.add_event_listener(Rc::new(move |event: &Event| {
        sink.borrow_mut().push(event.event_type());
    }));

    tree.dispatch_event(&Event::new(EventKind::MouseDown, button).with_buttons(1));
    assert_eq!(tree.listeners().len(), 1);

    drop(guard);
    assert!(tree.listeners().is_empty());
    tree.dispatch_event(&Event::new(EventKind::MouseUp, button));

    assert_eq!(*seen.borrow(), vec!["mousedown"]);
}

#[test]
fn test_focus_fires_blur_then_focus() {
    let mut tree = DomTree::new();
    let a = tree.append_html(NodeId::ROOT, "input", &[]);
    let b = tree.append_html(NodeId::ROOT, "input", &[]);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&seen);
    let _guard = tree.add_event_listener(Rc::new(move |event: &Event| {
        sink.borrow_mut().push((event.kind, event.target));
    }));

    tree.focus(a);
    tree.focus(b);
    assert_eq!(tree.active_element(), Some(b));
    assert_eq!(
        *seen.borrow(),
        vec![
            (EventKind::Focus, a),
            (EventKind::Blur, a),
            (EventKind::Focus, b),
        ]
    );
}

#[test]
fn test_form_state_overrides() {
    let mut tree = DomTree::new();
    let input = tree.append_html(NodeId::ROOT, "input", &[("type", "checkbox")]);
    tree.set_checked(input, true);
    tree.set_indeterminate(input, true);
    tree.set_value(input, "on");

    let state = &tree.as_element(input).unwrap().form_state;
    assert_eq!(state.checked, Some(true));
    assert!(state.indeterminate);
    assert_eq!(state.value.as_deref(), Some("on"));
}
