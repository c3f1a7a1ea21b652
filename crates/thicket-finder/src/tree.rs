//! The capabilities the Finder needs from a host tree.
//!
//! The engine has no built-in notion of a DOM. A host hands it a [`Tree`],
//! a set of navigation and query primitives over an opaque, copyable node
//! handle. Only the structural primitives are required; everything else has
//! a default expressed in terms of them that a host may override with a
//! faster or more accurate native version.

use std::any::Any;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use strum_macros::{Display, IntoStaticStr};

use crate::walk;

/// [Infra § Namespaces](https://infra.spec.whatwg.org/#html-namespace)
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// [§ 4.4 nodeType](https://dom.spec.whatwg.org/#dom-node-nodetype)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `DOCUMENT_NODE`
    Document,
    /// `DOCUMENT_FRAGMENT_NODE` (not a shadow root)
    DocumentFragment,
    /// A document fragment that is a shadow root.
    ShadowRoot,
    /// `ELEMENT_NODE`
    Element,
    /// `TEXT_NODE` or `CDATA_SECTION_NODE`
    Text,
    /// `COMMENT_NODE`
    Comment,
    /// Doctypes, processing instructions.
    Other,
}

/// A borrowed view of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrView<'a> {
    /// Local name.
    pub local_name: &'a str,
    /// Namespace prefix.
    pub prefix: Option<&'a str>,
    /// Namespace URI.
    pub namespace: Option<&'a str>,
    /// Value.
    pub value: &'a str,
}

impl AttrView<'_> {
    /// Whether this attribute's qualified name (`prefix:local`) equals `name`.
    pub fn has_qualified_name(&self, name: &str) -> bool {
        match self.prefix {
            Some(prefix) => name
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix(':'))
                .is_some_and(|local| local == self.local_name),
            None => self.local_name == name,
        }
    }
}

/// UI event types that drive interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum UiEventKind {
    /// `mouseover`
    MouseOver,
    /// `mouseout`
    MouseOut,
    /// `mousedown`
    MouseDown,
    /// `mouseup`
    MouseUp,
    /// `focus`
    Focus,
    /// `blur`
    Blur,
    /// `keydown`
    KeyDown,
    /// `keyup`
    KeyUp,
}

/// A UI event as seen by the interaction tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent<N> {
    /// Event type.
    pub kind: UiEventKind,
    /// Event target.
    pub target: N,
    /// `MouseEvent.buttons` bitmask.
    pub buttons: u16,
    /// `KeyboardEvent.key`.
    pub key: Option<String>,
    /// `Event.isTrusted`.
    pub trusted: bool,
}

impl<N> UiEvent<N> {
    /// A trusted event with no buttons or key.
    pub const fn new(kind: UiEventKind, target: N) -> Self {
        Self {
            kind,
            target,
            buttons: 0,
            key: None,
            trusted: true,
        }
    }

    /// Set the buttons bitmask.
    #[must_use]
    pub const fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = buttons;
        self
    }

    /// Set the key value.
    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Whether the primary pointer button is held.
    pub const fn primary_button(&self) -> bool {
        self.buttons & 1 != 0
    }
}

/// Callback the Finder registers through [`Tree::subscribe`].
pub type EventHandler<N> = Rc<dyn Fn(&UiEvent<N>)>;

/// A live event registration. Dropping it unregisters the handler.
pub struct Subscription {
    _guard: Box<dyn Any>,
}

impl Subscription {
    /// Wrap whatever host value keeps the registration alive.
    pub fn new(guard: impl Any) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}

/// Host tree capabilities.
///
/// [§ 4.2 Node tree](https://dom.spec.whatwg.org/#node-trees)
///
/// Shadow roots are expected to have no parent; [`Tree::host`] links them to
/// their host element. Lookup methods returning several nodes must return them
/// in tree order.
pub trait Tree {
    /// Opaque node handle.
    type Node: Copy + Eq + Hash + fmt::Debug + 'static;

    /// The kind of `node`.
    fn kind(&self, node: Self::Node) -> NodeKind;
    /// [parent](https://dom.spec.whatwg.org/#concept-tree-parent)
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    /// [first child](https://dom.spec.whatwg.org/#concept-tree-first-child)
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;
    /// [last child](https://dom.spec.whatwg.org/#concept-tree-last-child)
    fn last_child(&self, node: Self::Node) -> Option<Self::Node>;
    /// [next sibling](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    /// [previous sibling](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    fn prev_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    /// Data of a text node.
    fn text(&self, node: Self::Node) -> Option<&str>;
    /// Local name of an element.
    fn local_name(&self, node: Self::Node) -> Option<&str>;
    /// Namespace URI of an element.
    fn namespace_uri(&self, node: Self::Node) -> Option<&str>;
    /// Namespace prefix of an element.
    fn prefix(&self, node: Self::Node) -> Option<&str>;
    /// Attribute list of an element, in order.
    fn attributes(&self, node: Self::Node) -> Vec<AttrView<'_>>;
    /// [ownerDocument](https://dom.spec.whatwg.org/#dom-node-ownerdocument):
    /// `None` for a document itself.
    fn owner_document(&self, node: Self::Node) -> Option<Self::Node>;
    /// The host element of a shadow root.
    fn host(&self, node: Self::Node) -> Option<Self::Node>;

    /// "A document whose type is "html" is known as an HTML document."
    fn is_html_document(&self, node: Self::Node) -> bool {
        self.document_element(node)
            .is_some_and(|root| self.namespace_uri(root) == Some(HTML_NAMESPACE))
    }

    /// [get an attribute by name](https://dom.spec.whatwg.org/#concept-element-attributes-get-by-name)
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str> {
        self.attributes(node)
            .into_iter()
            .find(|attr| attr.has_qualified_name(name))
            .map(|attr| attr.value)
    }

    /// The element's ID.
    fn element_id(&self, node: Self::Node) -> Option<&str> {
        self.attribute(node, "id")
    }

    /// `classList.contains(class_name)`.
    fn has_class(&self, node: Self::Node, class_name: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
    }

    /// The document element of the document `node` belongs to.
    fn document_element(&self, node: Self::Node) -> Option<Self::Node> {
        let document = match self.kind(node) {
            NodeKind::Document => node,
            _ => self.owner_document(node)?,
        };
        walk::element_children(self, document).next()
    }

    /// The focused element of `node`'s document, if the host tracks it.
    fn active_element(&self, _node: Self::Node) -> Option<Self::Node> {
        None
    }

    /// The target element (URL fragment) of `node`'s document.
    fn target_element(&self, _node: Self::Node) -> Option<Self::Node> {
        None
    }

    /// The URL of `node`'s document.
    fn document_url(&self, _node: Self::Node) -> Option<&str> {
        None
    }

    /// Checkedness of a checkbox or radio button.
    fn checked(&self, node: Self::Node) -> bool {
        self.attribute(node, "checked").is_some()
    }

    /// The `indeterminate` IDL attribute of a checkbox.
    fn indeterminate(&self, _node: Self::Node) -> bool {
        false
    }

    /// Selectedness of an `option`.
    fn selected(&self, node: Self::Node) -> bool {
        self.attribute(node, "selected").is_some()
    }

    /// The current value of a form control.
    fn value(&self, node: Self::Node) -> String {
        if self.local_name(node) == Some("textarea") {
            return walk::text_content(self, node);
        }
        self.attribute(node, "value").unwrap_or_default().to_string()
    }

    /// Whether the element is defined (non-custom, or an upgraded custom element).
    fn is_defined(&self, node: Self::Node) -> bool {
        self.local_name(node).is_some_and(|name| !name.contains('-'))
    }

    /// Descendant elements of `root` whose ID is `id`.
    fn elements_by_id(&self, root: Self::Node, id: &str) -> Vec<Self::Node> {
        walk::descendant_elements(self, root)
            .filter(|&node| self.element_id(node) == Some(id))
            .collect()
    }

    /// Descendant elements of `root` carrying class `class_name`.
    fn elements_by_class_name(&self, root: Self::Node, class_name: &str) -> Vec<Self::Node> {
        walk::descendant_elements(self, root)
            .filter(|&node| self.has_class(node, class_name))
            .collect()
    }

    /// Descendant elements of `root` with the given local name, compared
    /// ASCII case-insensitively for HTML elements in HTML documents.
    fn elements_by_tag_name(&self, root: Self::Node, local_name: &str) -> Vec<Self::Node> {
        let html = self.is_html_document(root);
        walk::descendant_elements(self, root)
            .filter(|&node| {
                self.local_name(node).is_some_and(|name| {
                    if html && self.namespace_uri(node) == Some(HTML_NAMESPACE) {
                        name.eq_ignore_ascii_case(local_name)
                    } else {
                        name == local_name
                    }
                })
            })
            .collect()
    }

    /// Register `handler` for UI events reaching `node`'s document.
    ///
    /// Hosts without events return `None`; interaction pseudo-classes then
    /// rely on [`Tree::active_element`] and the `event` option only.
    fn subscribe(&self, _node: Self::Node, _handler: EventHandler<Self::Node>) -> Option<Subscription> {
        None
    }
}
