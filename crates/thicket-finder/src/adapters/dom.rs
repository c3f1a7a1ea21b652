//! `Tree` for the `thicket-dom` arena.

use std::rc::Rc;

use thicket_dom::{DomTree, EventKind, ListenerGuard, NodeId, NodeType};

use crate::tree::{AttrView, EventHandler, NodeKind, Subscription, Tree, UiEvent, UiEventKind};

const fn ui_event_kind(kind: EventKind) -> UiEventKind {
    match kind {
        EventKind::MouseOver => UiEventKind::MouseOver,
        EventKind::MouseOut => UiEventKind::MouseOut,
        EventKind::MouseDown => UiEventKind::MouseDown,
        EventKind::MouseUp => UiEventKind::MouseUp,
        EventKind::Focus => UiEventKind::Focus,
        EventKind::Blur => UiEventKind::Blur,
        EventKind::KeyDown => UiEventKind::KeyDown,
        EventKind::KeyUp => UiEventKind::KeyUp,
    }
}

impl Tree for DomTree {
    type Node = NodeId;

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.get(node).map(|n| &n.node_type) {
            Some(NodeType::Document) => NodeKind::Document,
            Some(NodeType::DocumentFragment) => NodeKind::DocumentFragment,
            Some(NodeType::ShadowRoot { .. }) => NodeKind::ShadowRoot,
            Some(NodeType::Element(_)) => NodeKind::Element,
            Some(NodeType::Text(_)) => NodeKind::Text,
            Some(NodeType::Comment(_)) => NodeKind::Comment,
            None => NodeKind::Other,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        DomTree::parent(self, node)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        DomTree::first_child(self, node)
    }

    fn last_child(&self, node: NodeId) -> Option<NodeId> {
        DomTree::last_child(self, node)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        DomTree::next_sibling(self, node)
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        DomTree::prev_sibling(self, node)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.as_text(node)
    }

    fn local_name(&self, node: NodeId) -> Option<&str> {
        self.as_element(node).map(|element| element.local_name.as_str())
    }

    fn namespace_uri(&self, node: NodeId) -> Option<&str> {
        self.as_element(node).and_then(|element| element.namespace.as_deref())
    }

    fn prefix(&self, node: NodeId) -> Option<&str> {
        self.as_element(node).and_then(|element| element.prefix.as_deref())
    }

    fn attributes(&self, node: NodeId) -> Vec<AttrView<'_>> {
        self.as_element(node)
            .map(|element| {
                element
                    .attrs
                    .iter()
                    .map(|attr| AttrView {
                        local_name: &attr.local_name,
                        prefix: attr.prefix.as_deref(),
                        namespace: attr.namespace.as_deref(),
                        value: &attr.value,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn owner_document(&self, node: NodeId) -> Option<NodeId> {
        (node != NodeId::ROOT).then_some(NodeId::ROOT)
    }

    fn host(&self, node: NodeId) -> Option<NodeId> {
        DomTree::host(self, node)
    }

    fn is_html_document(&self, _node: NodeId) -> bool {
        self.is_html()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.as_element(node).and_then(|element| element.get_attribute(name))
    }

    fn document_element(&self, _node: NodeId) -> Option<NodeId> {
        DomTree::document_element(self)
    }

    fn active_element(&self, _node: NodeId) -> Option<NodeId> {
        DomTree::active_element(self)
    }

    fn target_element(&self, _node: NodeId) -> Option<NodeId> {
        self.target()
    }

    fn document_url(&self, _node: NodeId) -> Option<&str> {
        self.url()
    }

    fn checked(&self, node: NodeId) -> bool {
        self.as_element(node).is_some_and(|element| {
            element
                .form_state
                .checked
                .unwrap_or_else(|| element.has_attribute("checked"))
        })
    }

    fn indeterminate(&self, node: NodeId) -> bool {
        self.as_element(node)
            .is_some_and(|element| element.form_state.indeterminate)
    }

    fn selected(&self, node: NodeId) -> bool {
        self.as_element(node).is_some_and(|element| {
            element
                .form_state
                .selected
                .unwrap_or_else(|| element.has_attribute("selected"))
        })
    }

    fn value(&self, node: NodeId) -> String {
        let Some(element) = self.as_element(node) else {
            return String::new();
        };
        if let Some(value) = &element.form_state.value {
            return value.clone();
        }
        if element.is_html() && element.local_name == "textarea" {
            return self.text_content(node);
        }
        element.get_attribute("value").unwrap_or_default().to_string()
    }

    fn is_defined(&self, node: NodeId) -> bool {
        self.as_element(node)
            .is_some_and(|element| element.defined.unwrap_or(!element.local_name.contains('-')))
    }

    fn subscribe(&self, _node: NodeId, handler: EventHandler<NodeId>) -> Option<Subscription> {
        let guard: ListenerGuard = self.add_event_listener(Rc::new(move |event| {
            let ui_event = UiEvent {
                kind: ui_event_kind(event.kind),
                target: event.target,
                buttons: event.buttons,
                key: event.key.clone(),
                trusted: event.is_trusted,
            };
            handler(&ui_event);
        }));
        Some(Subscription::new(guard))
    }
}
