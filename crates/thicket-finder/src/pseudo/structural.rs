//! [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)

use std::cmp::Ordering;
use std::collections::HashSet;
use std::rc::Rc;

use crate::branch::NthLeaf;
use crate::context::MatchContext;
use crate::tree::{NodeKind, Tree};
use crate::walk;

impl<T: Tree + ?Sized> MatchContext<'_, T> {
    /// [§ 14.1 `:root`](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "The :root pseudo-class represents an element that is the root of the
    /// document."
    pub(super) fn match_root(&self, node: T::Node) -> bool {
        self.tree
            .parent(node)
            .is_some_and(|parent| self.tree.kind(parent) == NodeKind::Document)
    }

    /// [§ 14.2 `:empty`](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    ///
    /// Comments and processing instructions do not count; any text does,
    /// including whitespace.
    pub(super) fn match_empty(&self, node: T::Node) -> bool {
        walk::children(self.tree, node).all(|child| match self.tree.kind(child) {
            NodeKind::Text => self.tree.text(child).is_some_and(str::is_empty),
            NodeKind::Comment | NodeKind::Other => true,
            _ => false,
        })
    }

    /// [§ 7.4 `:scope`](https://www.w3.org/TR/selectors-4/#the-scope-pseudo)
    ///
    /// The node the operation was called on; for a document, its document
    /// element.
    pub(super) fn match_scope(&self, node: T::Node) -> bool {
        match self.tree.kind(self.scope) {
            NodeKind::Document => self.tree.document_element(self.scope) == Some(node),
            _ => node == self.scope,
        }
    }

    /// [§ 14.4 Child-indexed pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index)
    pub(super) fn match_nth(&self, nth: &NthLeaf, node: T::Node) -> bool {
        let parent = self.tree.parent(node);
        let cacheable = parent.is_some()
            && !nth
                .of
                .as_deref()
                .is_some_and(|branches| branches.iter().any(|branch| branch.volatile));

        let type_key = nth.of_type.then(|| {
            (
                self.tree.local_name(node).unwrap_or_default().to_string(),
                self.tree.namespace_uri(node).map(str::to_string),
            )
        });
        let key = (nth.id, parent, type_key);

        if cacheable
            && let Some(selected) = self.caches.nth(&key)
        {
            return selected.contains(&node);
        }

        let selected = self.select_nth(nth, node, parent);
        let matched = selected.contains(&node);
        if cacheable {
            self.caches.store_nth(key, Rc::new(selected));
        }
        matched
    }

    /// Every sibling of `node` selected by `nth`.
    fn select_nth(&self, nth: &NthLeaf, node: T::Node, parent: Option<T::Node>) -> HashSet<T::Node> {
        let mut index: Vec<T::Node> = match parent {
            Some(parent) => walk::element_children(self.tree, parent).collect(),
            None => vec![node],
        };
        if nth.of_type {
            index.retain(|&sibling| self.same_type(sibling, node));
        }
        if let Some(branches) = &nth.of {
            index.retain(|&sibling| self.match_any_branch(branches, sibling));
        }
        if nth.reverse {
            index.reverse();
        }

        an_plus_b_positions(nth.a, nth.b, index.len())
            .into_iter()
            .map(|position| index[position])
            .collect()
    }

    fn same_type(&self, a: T::Node, b: T::Node) -> bool {
        self.tree.local_name(a) == self.tree.local_name(b)
            && self.tree.namespace_uri(a) == self.tree.namespace_uri(b)
    }
}

/// Zero-based positions in a list of `len` elements selected by `An+B`,
/// where `b` counts from one.
///
/// [CSS Syntax § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
/// "represents an element that has an index that is a positive integer
/// matching An+B for some non-negative integer n"
pub(crate) fn an_plus_b_positions(a: i32, b: i32, len: usize) -> Vec<usize> {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let (a, b) = (i64::from(a), i64::from(b));
    let mut positions = Vec::new();

    match a.cmp(&0) {
        Ordering::Equal => {
            if (1..=len).contains(&b) {
                positions.push(b - 1);
            }
        }
        Ordering::Greater => {
            let mut position = b;
            if position < 1 {
                // Smallest n with a*n + b >= 1.
                position += a * ((1 - position + a - 1) / a);
            }
            while position <= len {
                positions.push(position - 1);
                position += a;
            }
        }
        Ordering::Less => {
            let mut position = b;
            if position > len {
                let step = -a;
                position -= step * ((position - len + step - 1) / step);
            }
            while position >= 1 {
                positions.push(position - 1);
                position += a;
            }
        }
    }

    positions
        .into_iter()
        .filter_map(|position| usize::try_from(position).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut positions: Vec<usize>) -> Vec<usize> {
        positions.sort_unstable();
        positions
    }

    #[test]
    fn test_even_and_odd() {
        assert_eq!(an_plus_b_positions(2, 0, 10), vec![1, 3, 5, 7, 9]);
        assert_eq!(an_plus_b_positions(2, 1, 5), vec![0, 2, 4]);
    }

    #[test]
    fn test_constant_position() {
        assert_eq!(an_plus_b_positions(0, 3, 5), vec![2]);
        assert!(an_plus_b_positions(0, 3, 2).is_empty());
        assert!(an_plus_b_positions(0, 0, 5).is_empty());
    }

    #[test]
    fn test_negative_offset() {
        assert_eq!(an_plus_b_positions(3, -2, 10), vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_negative_step_selects_first_elements() {
        assert_eq!(sorted(an_plus_b_positions(-1, 3, 10)), vec![0, 1, 2]);
        assert_eq!(sorted(an_plus_b_positions(-2, 7, 4)), vec![0, 2]);
    }

    #[test]
    fn test_large_offset_is_bounded() {
        assert!(an_plus_b_positions(-1, i32::MAX, 3).len() == 3);
        assert!(an_plus_b_positions(1, i32::MIN, 0).is_empty());
    }
}
