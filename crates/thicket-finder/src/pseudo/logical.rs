//! [§ 4 Logical Combinations](https://www.w3.org/TR/selectors-4/#logical-combination)

use crate::branch::{Branch, RelativeBranch};
use crate::context::MatchContext;
use crate::finder::Direction;
use crate::tree::Tree;

impl<T: Tree + ?Sized> MatchContext<'_, T> {
    /// Whether any branch matches with `node` as its subject. Combinators in
    /// the branch walk the whole tree, not just the scope.
    pub(crate) fn match_any_branch(&self, branches: &[Branch], node: T::Node) -> bool {
        branches
            .iter()
            .any(|branch| self.match_node_prev(branch, branch.twigs.len() - 1, node))
    }

    /// [§ 4.5 The Relational Pseudo-class: `:has()`](https://www.w3.org/TR/selectors-4/#relational)
    ///
    /// "represents an element if any of the relative selectors, when absolutized
    /// and evaluated with the element as the :scope elements, would match at
    /// least one element."
    pub(super) fn match_has(&self, relatives: &[RelativeBranch], node: T::Node) -> bool {
        relatives.iter().any(|relative| {
            let first = relative.branch.first();
            let seeds: Vec<T::Node> = self
                .combined_nodes(relative.anchor, node, Direction::Next)
                .into_iter()
                .filter(|&candidate| self.match_leaves(&first.leaves, candidate))
                .collect();
            !seeds.is_empty() && !self.match_node_next(&relative.branch, 0, seeds).is_empty()
        })
    }
}
