//! [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
//!
//! Walks a [`Branch`] across its combinators, right to left when verifying a
//! candidate subject and left to right when expanding from entry nodes.

use std::collections::HashSet;

use crate::branch::{Branch, Combinator};
use crate::context::MatchContext;
use crate::finder::Direction;
use crate::tree::Tree;
use crate::walk;

impl<T: Tree + ?Sized> MatchContext<'_, T> {
    /// Nodes reachable from `node` through `combinator`.
    ///
    /// With [`Direction::Prev`] these are the nodes a left-hand compound may
    /// match when `node` matched the right-hand one; with [`Direction::Next`]
    /// the other way round.
    pub(crate) fn combined_nodes(
        &self,
        combinator: Combinator,
        node: T::Node,
        direction: Direction,
    ) -> Vec<T::Node> {
        let tree = self.tree;
        match (direction, combinator) {
            (Direction::Prev, Combinator::Descendant) => {
                walk::combinator_ancestors(tree, node).collect()
            }
            (Direction::Prev, Combinator::Child) => {
                walk::combinator_parent(tree, node).into_iter().collect()
            }
            (Direction::Prev, Combinator::NextSibling) => {
                walk::prev_element_sibling(tree, node).into_iter().collect()
            }
            (Direction::Prev, Combinator::SubsequentSibling) => {
                walk::preceding_element_siblings(tree, node).collect()
            }
            (Direction::Next, Combinator::Descendant) => walk::descendant_elements(tree, node).collect(),
            (Direction::Next, Combinator::Child) => walk::element_children(tree, node).collect(),
            (Direction::Next, Combinator::NextSibling) => {
                walk::next_element_sibling(tree, node).into_iter().collect()
            }
            (Direction::Next, Combinator::SubsequentSibling) => {
                walk::following_element_siblings(tree, node).collect()
            }
        }
    }

    /// Whether `node` matches twig `index` of `branch` together with every
    /// twig to its left.
    pub(crate) fn match_node_prev(&self, branch: &Branch, index: usize, node: T::Node) -> bool {
        let key = (branch.id, index, node);
        if !branch.volatile
            && let Some(matched) = self.caches.memo(key)
        {
            return matched;
        }

        let matched = self.match_leaves(&branch.twigs[index].leaves, node)
            && (index == 0 || self.match_left(branch, index, node));

        if !branch.volatile {
            self.caches.store_memo(key, matched);
        }
        matched
    }

    /// Whether the twigs left of `index` are satisfied, given that `node`
    /// matched twig `index`.
    pub(crate) fn match_left(&self, branch: &Branch, index: usize, node: T::Node) -> bool {
        if index == 0 {
            return true;
        }
        let Some(combinator) = branch.twigs[index].combinator else {
            return false;
        };
        self.combined_nodes(combinator, node, Direction::Prev)
            .into_iter()
            .any(|left| self.match_node_prev(branch, index - 1, left))
    }

    /// Expand `seeds`, which matched twig `index`, rightwards through the
    /// remaining twigs. Returns the nodes matching the last twig, without
    /// duplicates.
    pub(crate) fn match_node_next(
        &self,
        branch: &Branch,
        index: usize,
        seeds: Vec<T::Node>,
    ) -> Vec<T::Node> {
        let mut frontier = seeds;
        for twig in &branch.twigs[index + 1..] {
            let Some(combinator) = twig.combinator else {
                return Vec::new();
            };
            let mut seen = HashSet::new();
            let mut next = Vec::new();
            for &node in &frontier {
                for related in self.combined_nodes(combinator, node, Direction::Next) {
                    if seen.insert(related) && self.match_leaves(&twig.leaves, related) {
                        next.push(related);
                    }
                }
            }
            if next.is_empty() {
                return next;
            }
            frontier = next;
        }
        frontier
    }
}
