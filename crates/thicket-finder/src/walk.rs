//! Tree traversal helpers shared by every matching stage.
//!
//! [§ 4.2 Node tree](https://dom.spec.whatwg.org/#concept-tree-order)
//! "In tree order is preorder, depth-first traversal of a tree."

use std::cmp::Ordering;
use std::iter;

use crate::tree::{NodeKind, Tree};

pub(crate) fn is_element<T: Tree + ?Sized>(tree: &T, node: T::Node) -> bool {
    tree.kind(node) == NodeKind::Element
}

/// Children of `node`, in order.
pub(crate) fn children<T: Tree + ?Sized>(
    tree: &T,
    node: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    iter::successors(tree.first_child(node), move |&child| tree.next_sibling(child))
}

/// Children of `node` that are elements, in order.
pub(crate) fn element_children<T: Tree + ?Sized>(
    tree: &T,
    node: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    iter::successors(tree.first_child(node), move |&child| tree.next_sibling(child))
        .filter(move |&child| is_element(tree, child))
}

/// [previousElementSibling](https://dom.spec.whatwg.org/#dom-nondocumenttypechildnode-previouselementsibling)
pub(crate) fn prev_element_sibling<T: Tree + ?Sized>(tree: &T, node: T::Node) -> Option<T::Node> {
    preceding_element_siblings(tree, node).next()
}

/// [nextElementSibling](https://dom.spec.whatwg.org/#dom-nondocumenttypechildnode-nextelementsibling)
pub(crate) fn next_element_sibling<T: Tree + ?Sized>(tree: &T, node: T::Node) -> Option<T::Node> {
    following_element_siblings(tree, node).next()
}

/// Element siblings before `node`, nearest first.
pub(crate) fn preceding_element_siblings<T: Tree + ?Sized>(
    tree: &T,
    node: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    iter::successors(tree.prev_sibling(node), move |&sibling| tree.prev_sibling(sibling))
        .filter(move |&sibling| is_element(tree, sibling))
}

/// Element siblings after `node`, nearest first.
pub(crate) fn following_element_siblings<T: Tree + ?Sized>(
    tree: &T,
    node: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    iter::successors(tree.next_sibling(node), move |&sibling| tree.next_sibling(sibling))
        .filter(move |&sibling| is_element(tree, sibling))
}

/// The parent of `node` if it can take part in a combinator: an element, or
/// a shadow root standing in for its host.
pub(crate) fn combinator_parent<T: Tree + ?Sized>(tree: &T, node: T::Node) -> Option<T::Node> {
    tree.parent(node)
        .filter(|&parent| matches!(tree.kind(parent), NodeKind::Element | NodeKind::ShadowRoot))
}

/// Ancestors of `node` usable by the descendant combinator, nearest first.
pub(crate) fn combinator_ancestors<T: Tree + ?Sized>(
    tree: &T,
    node: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    iter::successors(combinator_parent(tree, node), move |&ancestor| {
        combinator_parent(tree, ancestor)
    })
}

/// `node` followed by its ancestors, nearest first, up to the root.
pub(crate) fn inclusive_ancestors<T: Tree + ?Sized>(
    tree: &T,
    node: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    iter::successors(Some(node), move |&current| tree.parent(current))
}

/// Element ancestors of `node`, crossing from a shadow root to its host.
pub(crate) fn flat_element_ancestors<T: Tree + ?Sized>(
    tree: &T,
    node: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    iter::successors(Some(node), move |&current| {
        tree.parent(current).or_else(|| tree.host(current))
    })
    .skip(1)
    .filter(move |&ancestor| is_element(tree, ancestor))
}

/// [§ 4.2 root](https://dom.spec.whatwg.org/#concept-tree-root)
pub(crate) fn root<T: Tree + ?Sized>(tree: &T, node: T::Node) -> T::Node {
    inclusive_ancestors(tree, node).last().unwrap_or(node)
}

/// Whether `node` is a strict descendant of `ancestor`.
pub(crate) fn is_descendant<T: Tree + ?Sized>(tree: &T, node: T::Node, ancestor: T::Node) -> bool {
    inclusive_ancestors(tree, node).skip(1).any(|a| a == ancestor)
}

/// The node following `node` in tree order, without leaving `root`.
fn following_in<T: Tree + ?Sized>(tree: &T, node: T::Node, root: T::Node) -> Option<T::Node> {
    if let Some(child) = tree.first_child(node) {
        return Some(child);
    }
    let mut current = node;
    loop {
        if current == root {
            return None;
        }
        if let Some(sibling) = tree.next_sibling(current) {
            return Some(sibling);
        }
        current = tree.parent(current)?;
    }
}

/// Strict descendants of `root` in tree order.
pub(crate) fn descendants<T: Tree + ?Sized>(
    tree: &T,
    root: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    iter::successors(following_in(tree, root, root), move |&node| {
        following_in(tree, node, root)
    })
}

/// Strict descendant elements of `root` in tree order.
pub(crate) fn descendant_elements<T: Tree + ?Sized>(
    tree: &T,
    root: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    descendants(tree, root).filter(move |&node| is_element(tree, node))
}

/// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
pub(crate) fn text_content<T: Tree + ?Sized>(tree: &T, node: T::Node) -> String {
    descendants(tree, node)
        .filter_map(|descendant| tree.text(descendant))
        .collect()
}

/// Compare two nodes of the same tree in tree order.
pub(crate) fn compare_tree_order<T: Tree + ?Sized>(tree: &T, a: T::Node, b: T::Node) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let mut path_to_a: Vec<T::Node> = inclusive_ancestors(tree, a).collect();
    let mut path_to_b: Vec<T::Node> = inclusive_ancestors(tree, b).collect();
    path_to_a.reverse();
    path_to_b.reverse();

    let common = path_to_a
        .iter()
        .zip(&path_to_b)
        .take_while(|(x, y)| x == y)
        .count();
    match (path_to_a.get(common), path_to_b.get(common)) {
        // `a` is an ancestor of `b`.
        (None, _) => Ordering::Less,
        (_, None) => Ordering::Greater,
        (Some(&branch_a), Some(&branch_b)) => {
            let a_first = iter::successors(tree.next_sibling(branch_a), |&s| tree.next_sibling(s))
                .any(|sibling| sibling == branch_b);
            if a_first {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
    }
}
