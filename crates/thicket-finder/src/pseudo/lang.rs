//! Linguistic pseudo-classes: `:lang()` and `:dir()`.

use crate::branch::TextDirection;
use crate::context::MatchContext;
use crate::tree::{NodeKind, Tree};
use crate::walk;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Elements skipped when looking for the first strong character.
const AUTO_DIRECTION_SKIPPED: &[&str] = &["bdi", "script", "style", "textarea"];

impl<T: Tree + ?Sized> MatchContext<'_, T> {
    /// [§ 8.2 The Language Pseudo-class: `:lang()`](https://www.w3.org/TR/selectors-4/#the-lang-pseudo)
    pub(super) fn match_lang(&self, ranges: &[String], node: T::Node) -> bool {
        let Some(language) = self.content_language(node) else {
            return false;
        };
        ranges.iter().any(|range| {
            if range.is_empty() || language.is_empty() {
                range.is_empty() && language.is_empty()
            } else {
                extended_filter(range, language)
            }
        })
    }

    /// [HTML § 3.2.6.2 The lang and xml:lang attributes](https://html.spec.whatwg.org/multipage/dom.html#language)
    ///
    /// "the nearest ancestor element (including the element itself) that has
    /// a lang attribute in the XML namespace set or is an HTML element and
    /// has a lang in no namespace attribute set"
    fn content_language(&self, node: T::Node) -> Option<&str> {
        std::iter::once(node)
            .chain(walk::flat_element_ancestors(self.tree, node))
            .filter(|&element| walk::is_element(self.tree, element))
            .find_map(|element| {
                let attributes = self.tree.attributes(element);
                attributes
                    .iter()
                    .find(|attr| {
                        attr.local_name == "lang"
                            && (attr.namespace == Some(XML_NAMESPACE) || attr.prefix == Some("xml"))
                    })
                    .or_else(|| {
                        attributes
                            .iter()
                            .find(|attr| attr.namespace.is_none() && attr.has_qualified_name("lang"))
                    })
                    .map(|attr| attr.value.trim())
            })
    }

    /// [HTML § 3.2.6.4 The dir attribute](https://html.spec.whatwg.org/multipage/dom.html#the-directionality)
    pub(super) fn directionality(&self, node: T::Node) -> TextDirection {
        if self.tree.kind(node) == NodeKind::ShadowRoot {
            return self
                .tree
                .host(node)
                .map_or(TextDirection::Ltr, |host| self.directionality(host));
        }

        let dir = self.tree.attribute(node, "dir").map(str::to_ascii_lowercase);
        match dir.as_deref() {
            Some("ltr") => TextDirection::Ltr,
            Some("rtl") => TextDirection::Rtl,
            Some("auto") => self.auto_direction(node).unwrap_or(TextDirection::Ltr),
            _ if self.is_html(node, "bdi") => self.auto_direction(node).unwrap_or(TextDirection::Ltr),
            _ => self
                .tree
                .parent(node)
                .filter(|&parent| {
                    matches!(self.tree.kind(parent), NodeKind::Element | NodeKind::ShadowRoot)
                })
                .map_or(TextDirection::Ltr, |parent| self.directionality(parent)),
        }
    }

    /// The direction of the first strong character in the element's value or
    /// text.
    fn auto_direction(&self, node: T::Node) -> Option<TextDirection> {
        if self.is_html(node, "textarea") || self.is_html(node, "input") {
            return first_strong(&self.tree.value(node));
        }
        self.auto_direction_of_children(node)
    }

    fn auto_direction_of_children(&self, node: T::Node) -> Option<TextDirection> {
        walk::children(self.tree, node).find_map(|child| match self.tree.kind(child) {
            NodeKind::Text => self.tree.text(child).and_then(first_strong),
            NodeKind::Element => {
                let skipped = AUTO_DIRECTION_SKIPPED.iter().any(|name| self.is_html(child, name))
                    || self.tree.attribute(child, "dir").is_some_and(|dir| {
                        ["ltr", "rtl", "auto"].iter().any(|valid| dir.eq_ignore_ascii_case(valid))
                    });
                if skipped {
                    None
                } else {
                    self.auto_direction_of_children(child)
                }
            }
            _ => None,
        })
    }
}

/// [RFC 4647 § 3.3.2 Extended Filtering](https://www.rfc-editor.org/rfc/rfc4647#section-3.3.2)
fn extended_filter(range: &str, tag: &str) -> bool {
    let range = range.to_ascii_lowercase();
    let tag = tag.to_ascii_lowercase();
    let mut range_parts = range.split('-');
    let mut tag_parts = tag.split('-');

    // "Compare the first subtag in the range to the first subtag in the tag."
    match (range_parts.next(), tag_parts.next()) {
        (Some(r), Some(t)) if r == "*" || r == t => {}
        _ => return false,
    }

    let mut tag_parts = tag_parts.peekable();
    for subtag in range_parts {
        if subtag == "*" {
            continue;
        }
        loop {
            match tag_parts.next() {
                None => return false,
                Some(t) if t == subtag => break,
                // "If the subtag currently being examined in the tag is a
                // singleton, then the match fails."
                Some(t) if t.len() == 1 => return false,
                Some(_) => {}
            }
        }
    }
    true
}

/// Bidi class of the first strongly directional character, approximated by
/// the Hebrew, Arabic, Syriac, Thaana, N'Ko and related right-to-left blocks.
fn first_strong(text: &str) -> Option<TextDirection> {
    text.chars().find_map(|c| {
        let code = u32::from(c);
        let rtl = matches!(code,
            0x0590..=0x08FF | 0xFB1D..=0xFDFF | 0xFE70..=0xFEFF | 0x1_0800..=0x1_0FFF | 0x1_E800..=0x1_EFFF);
        if rtl {
            Some(TextDirection::Rtl)
        } else if c.is_alphabetic() {
            Some(TextDirection::Ltr)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_filter_prefix() {
        assert!(extended_filter("en", "en-US"));
        assert!(extended_filter("en", "EN"));
        assert!(!extended_filter("en", "fr-CA"));
    }

    #[test]
    fn test_extended_filter_wildcard() {
        assert!(extended_filter("*-CH", "de-CH"));
        assert!(extended_filter("de-*-DE", "de-Latn-DE"));
        assert!(extended_filter("de-DE", "de-Latn-DE"));
        assert!(!extended_filter("de-DE", "de-x-DE"));
    }

    #[test]
    fn test_first_strong() {
        assert_eq!(first_strong("123 abc"), Some(TextDirection::Ltr));
        assert_eq!(first_strong("  \u{05D0}bc"), Some(TextDirection::Rtl));
        assert_eq!(first_strong("42!"), None);
    }
}
