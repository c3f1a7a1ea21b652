//! Simple-selector matching.

use crate::branch::{
    AttributeLeaf, AttributeOperator, CaseSensitivity, Leaf, NamespaceConstraint, PseudoClass,
    TypeLeaf,
};
use crate::context::MatchContext;
use crate::tree::{AttrView, HTML_NAMESPACE, NodeKind, Tree};
use crate::walk;

/// [HTML § 4.16.2 Case-sensitivity of selectors](https://html.spec.whatwg.org/multipage/semantics-other.html#case-sensitivity-of-selectors)
///
/// "Attribute selectors on an HTML element in an HTML document must treat the
/// values of attributes with the following names as ASCII case-insensitive"
const CASE_INSENSITIVE_ATTRIBUTES: &[&str] = &[
    "accept",
    "accept-charset",
    "align",
    "alink",
    "axis",
    "bgcolor",
    "charset",
    "checked",
    "clear",
    "codetype",
    "color",
    "compact",
    "declare",
    "defer",
    "dir",
    "direction",
    "disabled",
    "enctype",
    "face",
    "frame",
    "hreflang",
    "http-equiv",
    "lang",
    "language",
    "link",
    "media",
    "method",
    "multiple",
    "nohref",
    "noresize",
    "noshade",
    "nowrap",
    "readonly",
    "rel",
    "rev",
    "rules",
    "scope",
    "scrolling",
    "selected",
    "shape",
    "target",
    "text",
    "type",
    "valign",
    "valuetype",
    "vlink",
];

/// Prefixes resolvable without an in-scope `xmlns:` declaration.
const WELL_KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("html", HTML_NAMESPACE),
    ("math", "http://www.w3.org/1998/Math/MathML"),
    ("svg", "http://www.w3.org/2000/svg"),
    ("xlink", "http://www.w3.org/1999/xlink"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("xmlns", "http://www.w3.org/2000/xmlns/"),
];

impl<T: Tree + ?Sized> MatchContext<'_, T> {
    /// AND every leaf of a compound selector against `node`.
    pub(crate) fn match_leaves(&self, leaves: &[Leaf], node: T::Node) -> bool {
        match self.tree.kind(node) {
            NodeKind::Element => leaves.iter().all(|leaf| self.match_leaf(leaf, node)),
            // A shadow root only stands in for its host in `:host` selectors.
            NodeKind::ShadowRoot => leaves.iter().all(|leaf| {
                matches!(
                    leaf,
                    Leaf::Pseudo(PseudoClass::Host(_) | PseudoClass::HostContext(_))
                ) && self.match_leaf(leaf, node)
            }),
            _ => false,
        }
    }

    pub(crate) fn match_leaf(&self, leaf: &Leaf, node: T::Node) -> bool {
        match leaf {
            Leaf::Type(type_leaf) => self.match_type(type_leaf, node),
            Leaf::Class(class_name) => self.tree.has_class(node, class_name),
            Leaf::Id(id) => self.tree.element_id(node) == Some(id.as_str()),
            Leaf::Attribute(attribute) => self.match_attribute(attribute, node),
            Leaf::Pseudo(pseudo) => self.match_pseudo(pseudo, node),
            Leaf::PseudoElement(_) | Leaf::Unknown(_) => false,
        }
    }

    /// Whether `node` is an HTML element in an HTML document, where names
    /// compare ASCII case-insensitively.
    pub(crate) fn is_html_element(&self, node: T::Node) -> bool {
        self.tree.namespace_uri(node) == Some(HTML_NAMESPACE) && self.tree.is_html_document(node)
    }

    /// Whether `node` is the HTML element `name`.
    pub(crate) fn is_html(&self, node: T::Node, name: &str) -> bool {
        self.tree.namespace_uri(node) == Some(HTML_NAMESPACE)
            && self
                .tree
                .local_name(node)
                .is_some_and(|local| local.eq_ignore_ascii_case(name))
    }

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    fn match_type(&self, leaf: &TypeLeaf, node: T::Node) -> bool {
        if let Some(expected) = &leaf.local_name {
            let Some(local) = self.tree.local_name(node) else {
                return false;
            };
            let same = if self.is_html_element(node) {
                local.eq_ignore_ascii_case(expected)
            } else {
                local == expected
            };
            if !same {
                return false;
            }
        }

        // [§ 5.3](https://www.w3.org/TR/selectors-4/#type-nmsp) "if no default
        // namespace is declared: E elements in any namespace".
        match &leaf.namespace {
            NamespaceConstraint::Default | NamespaceConstraint::Any => true,
            NamespaceConstraint::None => self.tree.namespace_uri(node).is_none(),
            NamespaceConstraint::Prefix(prefix) => {
                self.tree.prefix(node) == Some(prefix.as_str())
                    || self
                        .lookup_namespace(node, prefix)
                        .is_some_and(|uri| self.tree.namespace_uri(node) == Some(uri))
            }
        }
    }

    /// [§ 4.4 locate a namespace](https://dom.spec.whatwg.org/#locate-a-namespace)
    /// through `xmlns:prefix` declarations, then well-known prefixes.
    fn lookup_namespace(&self, node: T::Node, prefix: &str) -> Option<&str> {
        walk::inclusive_ancestors(self.tree, node)
            .filter(|&ancestor| walk::is_element(self.tree, ancestor))
            .find_map(|ancestor| {
                self.tree
                    .attributes(ancestor)
                    .into_iter()
                    .find(|attr| attr.prefix == Some("xmlns") && attr.local_name == prefix)
                    .map(|attr| attr.value)
            })
            .or_else(|| {
                WELL_KNOWN_PREFIXES
                    .iter()
                    .find(|(known, _)| *known == prefix)
                    .map(|(_, uri)| *uri)
            })
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn match_attribute(&self, leaf: &AttributeLeaf, node: T::Node) -> bool {
        let case_insensitive = match leaf.case {
            CaseSensitivity::AsciiInsensitive => true,
            CaseSensitivity::Sensitive => false,
            CaseSensitivity::Default => {
                self.is_html_element(node)
                    && CASE_INSENSITIVE_ATTRIBUTES.contains(&leaf.local_name.as_str())
            }
        };

        self.tree
            .attributes(node)
            .iter()
            .filter(|attr| self.attribute_name_matches(leaf, attr, node))
            .any(|attr| operator_matches(&leaf.operator, attr.value, case_insensitive))
    }

    fn attribute_name_matches(&self, leaf: &AttributeLeaf, attr: &AttrView<'_>, node: T::Node) -> bool {
        match &leaf.namespace {
            // A bare name matches the qualified name, or the local part of a
            // namespaced attribute.
            NamespaceConstraint::Default => {
                attr.has_qualified_name(&leaf.local_name) || attr.local_name == leaf.local_name
            }
            NamespaceConstraint::Any => attr.local_name == leaf.local_name,
            NamespaceConstraint::None => attr.namespace.is_none() && attr.local_name == leaf.local_name,
            NamespaceConstraint::Prefix(prefix) => {
                attr.local_name == leaf.local_name
                    && (attr.prefix == Some(prefix.as_str())
                        || attr.namespace.is_some_and(|uri| {
                            self.lookup_namespace(node, prefix) == Some(uri)
                        }))
            }
        }
    }
}

/// [§ 6.1](https://www.w3.org/TR/selectors-4/#attribute-representation) and
/// [§ 6.2 Substring matching attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-substrings)
pub(crate) fn operator_matches(operator: &AttributeOperator, value: &str, case_insensitive: bool) -> bool {
    let fold = |s: &str| {
        if case_insensitive {
            s.to_ascii_lowercase()
        } else {
            s.to_string()
        }
    };
    let actual = fold(value);

    match operator {
        AttributeOperator::Exists => true,
        AttributeOperator::Equals(expected) => actual == fold(expected),
        // "If "val" contains whitespace, it will never represent anything
        // (since the words are separated by spaces). Also if "val" is the empty
        // string, it will never represent anything."
        AttributeOperator::Includes(expected) => {
            !expected.is_empty()
                && !expected.contains(|c: char| c.is_ascii_whitespace())
                && actual.split_ascii_whitespace().any(|word| word == fold(expected))
        }
        AttributeOperator::DashMatch(expected) => {
            let expected = fold(expected);
            actual == expected
                || actual
                    .strip_prefix(&expected)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        // "If "val" is the empty string then the selector does not represent
        // anything."
        AttributeOperator::Prefix(expected) => !expected.is_empty() && actual.starts_with(&fold(expected)),
        AttributeOperator::Suffix(expected) => !expected.is_empty() && actual.ends_with(&fold(expected)),
        AttributeOperator::Substring(expected) => !expected.is_empty() && actual.contains(&fold(expected)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(operator: AttributeOperator, value: &str) -> bool {
        operator_matches(&operator, value, false)
    }

    #[test]
    fn test_includes_operator() {
        assert!(op(AttributeOperator::Includes("b".into()), "a b c"));
        assert!(!op(AttributeOperator::Includes("b c".into()), "a b c"));
        assert!(!op(AttributeOperator::Includes(String::new()), "a b c"));
    }

    #[test]
    fn test_dash_match_operator() {
        assert!(op(AttributeOperator::DashMatch("en".into()), "en"));
        assert!(op(AttributeOperator::DashMatch("en".into()), "en-US"));
        assert!(!op(AttributeOperator::DashMatch("en".into()), "english"));
    }

    #[test]
    fn test_substring_operators_reject_empty_value() {
        assert!(!op(AttributeOperator::Prefix(String::new()), "abc"));
        assert!(!op(AttributeOperator::Suffix(String::new()), "abc"));
        assert!(!op(AttributeOperator::Substring(String::new()), "abc"));
        assert!(op(AttributeOperator::Substring("b".into()), "abc"));
    }

    #[test]
    fn test_case_folding() {
        let equals = AttributeOperator::Equals("TEXT".into());
        assert!(!operator_matches(&equals, "text", false));
        assert!(operator_matches(&equals, "text", true));
    }
}
