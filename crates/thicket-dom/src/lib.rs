//! DOM tree implementation used as the reference host for thicket.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), with just enough of
//! [HTML](https://html.spec.whatwg.org/) (form state, focus, the target
//! element) for selector matching.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Document
//! fragments and shadow roots live in the same arena as the document; a shadow
//! root has no parent and records its host instead.

pub mod events;

use std::borrow::Cow;
use std::rc::Rc;

pub use events::{Event, EventKind, EventListeners, Listener, ListenerGuard, PRIMARY_BUTTON};

/// [Infra § Namespaces](https://infra.spec.whatwg.org/#html-namespace)
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
/// [Infra § Namespaces](https://infra.spec.whatwg.org/#svg-namespace)
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
/// [Infra § Namespaces](https://infra.spec.whatwg.org/#xml-namespace)
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
}

/// [§ 4.8 Interface ShadowRoot](https://dom.spec.whatwg.org/#interface-shadowroot)
/// "Shadow roots have an associated mode ("open" or "closed")."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowRootMode {
    /// `open`
    Open,
    /// `closed`
    Closed,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.7 Interface DocumentFragment](https://dom.spec.whatwg.org/#interface-documentfragment)
    DocumentFragment,
    /// [§ 4.8 Interface ShadowRoot](https://dom.spec.whatwg.org/#interface-shadowroot)
    /// "A shadow root's host is an element."
    ShadowRoot {
        /// The element this shadow root is attached to.
        host: NodeId,
        /// Encapsulation mode.
        mode: ShadowRootMode,
    },
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.11 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.14 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// "Attr nodes are simply known as attributes. They have a namespace (null or
/// a non-empty string), namespace prefix (null or a non-empty string), local
/// name (a non-empty string), value (a string), and element (null or an element)."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Local name, e.g. `href` for `xlink:href`.
    pub local_name: String,
    /// Namespace prefix, e.g. `xlink`.
    pub prefix: Option<String>,
    /// Namespace URI.
    pub namespace: Option<String>,
    /// Attribute value.
    pub value: String,
}

impl Attribute {
    /// An attribute in no namespace.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            local_name: name.to_string(),
            prefix: None,
            namespace: None,
            value: value.to_string(),
        }
    }

    /// A namespaced attribute from a qualified name such as `xlink:href`.
    #[must_use]
    pub fn namespaced(namespace: &str, qualified_name: &str, value: &str) -> Self {
        let (prefix, local_name) = split_qualified_name(qualified_name);
        Self {
            local_name: local_name.to_string(),
            prefix: prefix.map(str::to_string),
            namespace: Some(namespace.to_string()),
            value: value.to_string(),
        }
    }

    /// "An attribute's qualified name is its local name if its namespace
    /// prefix is null, and its namespace prefix, followed by ":", followed
    /// by its local name, otherwise."
    #[must_use]
    pub fn qualified_name(&self) -> Cow<'_, str> {
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{prefix}:{}", self.local_name)),
            None => Cow::Borrowed(&self.local_name),
        }
    }
}

fn split_qualified_name(qualified_name: &str) -> (Option<&str>, &str) {
    match qualified_name.split_once(':') {
        Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => (Some(prefix), local),
        _ => (None, qualified_name),
    }
}

/// Live form-control state that can diverge from content attributes.
///
/// [§ 4.10.5.4 Common input element APIs](https://html.spec.whatwg.org/multipage/input.html#common-input-element-apis)
/// "The checkedness of an input element is a boolean state... the dirty
/// checkedness flag..." `None` means "not dirty, follow the attribute".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Checkedness, once it has been set through the IDL attribute.
    pub checked: Option<bool>,
    /// Selectedness of an `option`, once set.
    pub selected: Option<bool>,
    /// The `indeterminate` IDL attribute.
    pub indeterminate: bool,
    /// The current value, once it diverges from the `value` attribute.
    pub value: Option<String>,
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name, custom
/// element state, custom element definition, is value."
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "An element's local name"
    pub local_name: String,
    /// "An element's namespace"
    pub namespace: Option<String>,
    /// "An element's namespace prefix"
    pub prefix: Option<String>,
    /// "An element has an associated attribute list"
    pub attrs: Vec<Attribute>,
    /// "An element has an associated shadow root (null or a shadow root)."
    pub shadow_root: Option<NodeId>,
    /// Whether a custom element definition has been registered for this element.
    pub defined: Option<bool>,
    /// Live form-control state.
    pub form_state: FormState,
}

impl ElementData {
    /// An element in the HTML namespace. The tag name is ASCII-lowercased,
    /// as the HTML parser does.
    #[must_use]
    pub fn html(tag_name: &str) -> Self {
        Self::new(Some(HTML_NAMESPACE), &tag_name.to_ascii_lowercase())
    }

    /// An element with an explicit namespace and qualified name (`svg:rect`).
    #[must_use]
    pub fn new(namespace: Option<&str>, qualified_name: &str) -> Self {
        let (prefix, local_name) = split_qualified_name(qualified_name);
        Self {
            local_name: local_name.to_string(),
            namespace: namespace.map(str::to_string),
            prefix: prefix.map(str::to_string),
            attrs: Vec::new(),
            shadow_root: None,
            defined: None,
            form_state: FormState::default(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// [§ 4.9 get an attribute by name](https://dom.spec.whatwg.org/#concept-element-attributes-get-by-name)
    ///
    /// "Return the first attribute in element's attribute list whose qualified
    /// name is `qualifiedName`; otherwise null."
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.qualified_name() == name)
            .map(|attr| attr.value.as_str())
    }

    /// Whether an attribute with this qualified name exists.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Set (or replace) an attribute in no namespace.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self
            .attrs
            .iter_mut()
            .find(|attr| attr.namespace.is_none() && attr.local_name == name)
        {
            Some(attr) => attr.value = value.to_string(),
            None => self.attrs.push(Attribute::new(name, value)),
        }
    }

    /// Remove an attribute in no namespace.
    pub fn remove_attribute(&mut self, name: &str) {
        self.attrs
            .retain(|attr| attr.namespace.is_some() || attr.local_name != name);
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// Returns the class names from the class attribute, in order.
    ///
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Whether this element is in the HTML namespace.
    pub fn is_html(&self) -> bool {
        self.namespace.as_deref() == Some(HTML_NAMESPACE)
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree. A tree is a finite hierarchical
/// tree structure."
#[derive(Debug)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
    /// "A document whose type is "html" is known as an HTML document."
    html: bool,
    /// "Each document has an associated URL."
    url: Option<String>,
    /// [§ 6.6.3 The focused area](https://html.spec.whatwg.org/multipage/interaction.html#focused-area-of-the-document)
    active_element: Option<NodeId>,
    /// [§ 7.4.6.3 The indicated part of the document](https://html.spec.whatwg.org/multipage/browsing-the-web.html#target-element)
    target: Option<NodeId>,
    listeners: Rc<EventListeners>,
}

impl DomTree {
    /// Create a new HTML document with just the Document node.
    pub fn new() -> Self {
        Self::with_document_type(true)
    }

    /// Create a new XML document with just the Document node.
    pub fn new_xml() -> Self {
        Self::with_document_type(false)
    }

    fn with_document_type(html: bool) -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        DomTree {
            nodes: vec![document],
            html,
            url: None,
            active_element: None,
            target: None,
            listeners: Rc::new(EventListeners::default()),
        }
    }

    /// Get the root document node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Whether this is an HTML document.
    pub fn is_html(&self) -> bool {
        self.html
    }

    /// The document URL.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Set the document URL.
    pub fn set_url(&mut self, url: &str) {
        self.url = Some(url.to_string());
    }

    /// Get a node by its ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`, updating all relationships.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// [§ 4.2.1 Pre-insert](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// Inserts `child` into `parent` immediately before `reference`. Falls back
    /// to appending when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == reference)
        else {
            self.append_child(parent, child);
            return;
        };

        let prev = self.nodes[reference.0].prev_sibling;
        self.nodes[parent.0].children.insert(index, child);

        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.prev_sibling = prev;
        node.next_sibling = Some(reference);

        self.nodes[reference.0].prev_sibling = Some(child);
        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = Some(child);
        }
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detaches `child` from `parent`, relinking its former siblings.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let prev = self.nodes[child.0].prev_sibling;
        let next = self.nodes[child.0].next_sibling;
        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = next;
        }
        if let Some(next_id) = next {
            self.nodes[next_id.0].prev_sibling = prev;
        }
        self.nodes[parent.0].children.retain(|&id| id != child);

        let node = &mut self.nodes[child.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Allocate an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, element: ElementData) -> NodeId {
        let id = self.alloc(NodeType::Element(element));
        self.append_child(parent, id);
        id
    }

    /// Allocate an HTML element with attributes and append it to `parent`.
    pub fn append_html(&mut self, parent: NodeId, tag_name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let element = attrs
            .iter()
            .fold(ElementData::html(tag_name), |element, (name, value)| {
                element.with_attr(name, value)
            });
        self.append_element(parent, element)
    }

    /// Allocate a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.alloc(NodeType::Text(text.to_string()));
        self.append_child(parent, id);
        id
    }

    /// [§ 4.5 createDocumentFragment()](https://dom.spec.whatwg.org/#dom-document-createdocumentfragment)
    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeType::DocumentFragment)
    }

    /// [§ 4.9 attachShadow()](https://dom.spec.whatwg.org/#dom-element-attachshadow)
    ///
    /// Returns the existing shadow root if `host` already has one, and `None`
    /// if `host` is not an element.
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> Option<NodeId> {
        if let Some(existing) = self.as_element(host)?.shadow_root {
            return Some(existing);
        }
        let root = self.alloc(NodeType::ShadowRoot { host, mode });
        if let Some(element) = self.as_element_mut(host) {
            element.shadow_root = Some(root);
        }
        Some(root)
    }

    /// The shadow root attached to `host`, if any.
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.as_element(host).and_then(|element| element.shadow_root)
    }

    /// The host of a shadow root.
    pub fn host(&self, shadow_root: NodeId) -> Option<NodeId> {
        match self.get(shadow_root).map(|n| &n.node_type) {
            Some(NodeType::ShadowRoot { host, .. }) => Some(*host),
            _ => None,
        }
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Get element data if this node is an element.
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// "The descendant text content of a node node is the concatenation of the
    /// data of all the Text node descendants of node, in tree order."
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for &child in self.children(id) {
            match self.get(child).map(|n| &n.node_type) {
                Some(NodeType::Text(text)) => out.push_str(text),
                Some(NodeType::Element(_)) => self.collect_text(child, out),
                _ => {}
            }
        }
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;

        self.children(html)
            .iter()
            .find(|&&id| {
                self.as_element(id)
                    .is_some_and(|e| e.local_name == "body" || e.local_name == "frameset")
            })
            .copied()
    }

    /// The currently focused element.
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    /// [§ 6.6.4 Focus update steps](https://html.spec.whatwg.org/multipage/interaction.html#focus-update-steps)
    ///
    /// Moves focus to `node`, firing `blur` on the previously focused element
    /// and `focus` on the new one.
    pub fn focus(&mut self, node: NodeId) {
        if self.active_element == Some(node) {
            return;
        }
        self.blur();
        self.active_element = Some(node);
        self.dispatch_event(&Event::new(EventKind::Focus, node));
    }

    /// Clear focus, firing `blur` on the previously focused element.
    pub fn blur(&mut self) {
        if let Some(previous) = self.active_element.take() {
            self.dispatch_event(&Event::new(EventKind::Blur, previous));
        }
    }

    /// The target element (the element indicated by the URL fragment).
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Set the target element.
    pub fn set_target(&mut self, node: Option<NodeId>) {
        self.target = node;
    }

    /// Set the checkedness of an input (the `checked` IDL attribute).
    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(element) = self.as_element_mut(node) {
            element.form_state.checked = Some(checked);
        }
    }

    /// Set the selectedness of an option.
    pub fn set_selected(&mut self, node: NodeId, selected: bool) {
        if let Some(element) = self.as_element_mut(node) {
            element.form_state.selected = Some(selected);
        }
    }

    /// Set the `indeterminate` IDL attribute.
    pub fn set_indeterminate(&mut self, node: NodeId, indeterminate: bool) {
        if let Some(element) = self.as_element_mut(node) {
            element.form_state.indeterminate = indeterminate;
        }
    }

    /// Set the current value of a form control.
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.as_element_mut(node) {
            element.form_state.value = Some(value.to_string());
        }
    }

    /// The listener registry for document-level UI events.
    pub fn listeners(&self) -> &Rc<EventListeners> {
        &self.listeners
    }

    /// Register a document-level event listener.
    #[must_use = "dropping the guard unregisters the listener"]
    pub fn add_event_listener(&self, listener: Listener) -> ListenerGuard {
        self.listeners.add(listener)
    }

    /// [§ 2.9 Dispatching events](https://dom.spec.whatwg.org/#concept-event-dispatch)
    ///
    /// All listeners are registered on the document, so dispatch is a single
    /// pass over the registry.
    pub fn dispatch_event(&self, event: &Event) {
        self.listeners.dispatch(event);
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
