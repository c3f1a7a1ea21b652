//! Entry nodes: where a search starts before combinators are walked.

use crate::branch::{Leaf, NamespaceConstraint, Twig};
use crate::context::MatchContext;
use crate::finder::TargetType;
use crate::tree::Tree;
use crate::walk;

/// A host index that can enumerate the candidates of a twig directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FastPath<'l> {
    Id(&'l str),
    Class(&'l str),
    Tag(&'l str),
}

/// The cheapest index for `twig`: ID over class over a plain type name.
pub(crate) fn fast_path(twig: &Twig) -> Option<FastPath<'_>> {
    let id = twig.leaves.iter().find_map(|leaf| match leaf {
        Leaf::Id(id) => Some(FastPath::Id(id)),
        _ => None,
    });
    let class = || {
        twig.leaves.iter().find_map(|leaf| match leaf {
            Leaf::Class(class_name) => Some(FastPath::Class(class_name)),
            _ => None,
        })
    };
    let tag = || {
        twig.leaves.iter().find_map(|leaf| match leaf {
            Leaf::Type(type_leaf) => match (&type_leaf.namespace, &type_leaf.local_name) {
                (NamespaceConstraint::Default | NamespaceConstraint::Any, Some(name)) => {
                    Some(FastPath::Tag(name))
                }
                _ => None,
            },
            _ => None,
        })
    };
    id.or_else(class).or_else(tag)
}

/// Entry nodes found for one twig.
#[derive(Debug)]
pub(crate) struct EntryNodeResult<N> {
    /// Candidate nodes, in tree order.
    pub(crate) nodes: Vec<N>,
    /// Whether the twig carried more than one leaf.
    pub(crate) compound: bool,
    /// Whether every node in `nodes` already matched the whole twig. Also
    /// true when an index lookup ran and found nothing.
    pub(crate) filtered: bool,
    /// No index applied; the caller must walk the tree itself.
    pub(crate) pending: bool,
}

impl<T: Tree + ?Sized> MatchContext<'_, T> {
    /// Collect entry nodes for `twig`, searching from `node`.
    pub(crate) fn find_entry_nodes(
        &self,
        twig: &Twig,
        target: TargetType,
        node: T::Node,
    ) -> EntryNodeResult<T::Node> {
        let compound = twig.is_compound();
        let nodes = match target {
            TargetType::Itself => {
                let matched = self.match_leaves(&twig.leaves, node);
                return EntryNodeResult {
                    nodes: if matched { vec![node] } else { Vec::new() },
                    compound,
                    filtered: matched,
                    pending: false,
                };
            }
            TargetType::Lineal => {
                let nodes = walk::inclusive_ancestors(self.tree, node)
                    .take_while(|&ancestor| walk::is_element(self.tree, ancestor))
                    .filter(|&ancestor| self.match_leaves(&twig.leaves, ancestor))
                    .collect::<Vec<_>>();
                return EntryNodeResult {
                    filtered: !nodes.is_empty(),
                    nodes,
                    compound,
                    pending: false,
                };
            }
            TargetType::First | TargetType::All => match fast_path(twig) {
                Some(FastPath::Id(id)) => self.tree.elements_by_id(node, id),
                Some(FastPath::Class(class_name)) => self.tree.elements_by_class_name(node, class_name),
                Some(FastPath::Tag(name)) => self.tree.elements_by_tag_name(node, name),
                None => {
                    return EntryNodeResult {
                        nodes: Vec::new(),
                        compound,
                        filtered: false,
                        pending: true,
                    };
                }
            },
        };

        // An index hit already satisfies a single-leaf twig.
        let nodes = if compound {
            nodes
                .into_iter()
                .filter(|&candidate| self.match_leaves(&twig.leaves, candidate))
                .collect()
        } else {
            nodes
        };
        EntryNodeResult {
            nodes,
            compound,
            filtered: true,
            pending: false,
        }
    }
}
