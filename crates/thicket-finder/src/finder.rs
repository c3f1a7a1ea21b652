//! The public Finder: setup, strategy selection and the four query operations.
//!
//! [DOM § 4.2.6 Mixin ParentNode](https://dom.spec.whatwg.org/#interface-parentnode)
//! "To scope-match a selectors string selectors against a node, run these
//! steps: 1. Let s be the result of parse a selector selectors. 2. If s is
//! failure, then throw a "`SyntaxError`" `DOMException`. 3. Return the result of
//! match a selector against a tree with s and node's root using scoping root
//! node."

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use strum_macros::Display;
use thicket_selector::{SelectorList, parse_selector};

use crate::branch::{Branch, Combinator};
use crate::compiler::{CompileOptions, compile};
use crate::context::{MatchContext, SessionCaches};
use crate::entry::{FastPath, fast_path};
use crate::error::FinderError;
use crate::interaction::InteractionState;
use crate::tree::{EventHandler, NodeKind, Subscription, Tree, UiEvent};
use crate::walk;

/// What a `find` collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TargetType {
    /// The context node itself (`matches`).
    #[strum(serialize = "self")]
    Itself,
    /// The nearest inclusive ancestor (`closest`).
    Lineal,
    /// The first descendant in tree order (`querySelector`).
    First,
    /// Every descendant in tree order (`querySelectorAll`).
    All,
}

/// Which way a branch is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// From subject candidates leftwards through ancestors and earlier
    /// siblings.
    Prev,
    /// From nodes matching the leftmost twig rightwards through descendants
    /// and later siblings.
    Next,
}

/// Per-call options.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct FindOptions<N> {
    /// Report unsupported and forgiven selectors through `warn_once`.
    pub warn: bool,
    /// Unknown pseudo-classes and pseudo-elements match nothing instead of
    /// raising a syntax error.
    pub forgive: bool,
    /// Never return an error; every failure becomes a non-match.
    pub noexcept: bool,
    /// Drop cached results even when the selector and node are unchanged.
    pub invalidate: bool,
    /// A UI event to evaluate `:hover`, `:active` and focus pseudo-classes
    /// against. Ignored unless trusted.
    pub event: Option<UiEvent<N>>,
}

impl<N> Default for FindOptions<N> {
    fn default() -> Self {
        Self {
            warn: false,
            forgive: false,
            noexcept: false,
            invalidate: false,
            event: None,
        }
    }
}

/// Where the compiled selector came from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SelectorSource {
    Text(String),
    Ast(SelectorList),
}

/// Everything that decides whether a session can be reused.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionKey<N> {
    source: SelectorSource,
    node: N,
    tree: usize,
    warn: bool,
    forgive: bool,
}

/// State created by one setup and consumed by every find until the next.
struct FinderSession<N> {
    key: SessionKey<N>,
    branches: Vec<Branch>,
    caches: SessionCaches<N>,
    event: Option<UiEvent<N>>,
    /// Dropping it removes the interaction listener.
    _subscription: Option<Subscription>,
}

/// A reusable selector matcher.
///
/// The Finder keeps the compiled selector and its caches between calls made
/// with the same selector and node, and follows UI events from the tree for
/// interaction pseudo-classes.
pub struct Finder<N> {
    session: Option<FinderSession<N>>,
    interaction: Rc<RefCell<InteractionState<N>>>,
}

impl<N: Copy + Eq + std::hash::Hash + std::fmt::Debug + 'static> Default for Finder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> std::fmt::Debug for Finder<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Finder")
            .field("has_session", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl<N: Copy + Eq + std::hash::Hash + std::fmt::Debug + 'static> Finder<N> {
    /// A Finder with no session.
    pub fn new() -> Self {
        Self {
            session: None,
            interaction: Rc::new(RefCell::new(InteractionState::new())),
        }
    }

    /// A snapshot of the tracked interaction state.
    pub fn interaction_state(&self) -> InteractionState<N> {
        self.interaction.borrow().clone()
    }

    /// Compile `selector` for searches from `node`.
    ///
    /// A repeated call with the same selector, node, tree and compile options
    /// keeps the current session and its caches unless `invalidate` is set.
    pub fn setup<T: Tree<Node = N> + ?Sized>(
        &mut self,
        tree: &T,
        selector: &str,
        node: N,
        options: &FindOptions<N>,
    ) -> Result<(), FinderError> {
        self.setup_source(tree, SelectorSource::Text(selector.to_string()), node, options)
    }

    /// Like [`Finder::setup`], from an already parsed selector list.
    pub fn setup_ast<T: Tree<Node = N> + ?Sized>(
        &mut self,
        tree: &T,
        selector: &SelectorList,
        node: N,
        options: &FindOptions<N>,
    ) -> Result<(), FinderError> {
        self.setup_source(tree, SelectorSource::Ast(selector.clone()), node, options)
    }

    fn setup_source<T: Tree<Node = N> + ?Sized>(
        &mut self,
        tree: &T,
        source: SelectorSource,
        node: N,
        options: &FindOptions<N>,
    ) -> Result<(), FinderError> {
        let key = SessionKey {
            source,
            node,
            tree: std::ptr::from_ref(tree).cast::<()>() as usize,
            warn: options.warn,
            forgive: options.forgive || options.noexcept,
        };
        let event = options.event.clone().filter(|event| event.trusted);

        if let Some(session) = self.session.as_mut()
            && session.key == key
        {
            if options.invalidate {
                session.caches.clear();
            }
            session.event = event;
            return Ok(());
        }

        let (list, text) = match &key.source {
            SelectorSource::Text(text) => (
                parse_selector(text).map_err(|err| FinderError::invalid_selector(text, &err))?,
                text.clone(),
            ),
            SelectorSource::Ast(list) => (list.clone(), "(selector list)".to_string()),
        };
        let branches = compile(
            &list,
            &text,
            CompileOptions {
                warn: key.warn,
                forgive: key.forgive,
            },
        )?;

        // The old listener goes before the new one is registered.
        self.session = None;
        let interaction = Rc::clone(&self.interaction);
        let handler: EventHandler<N> = Rc::new(move |event: &UiEvent<N>| {
            if let Ok(mut state) = interaction.try_borrow_mut() {
                state.handle(event);
            }
        });
        let subscription = tree.subscribe(node, handler);

        self.session = Some(FinderSession {
            key,
            branches,
            caches: SessionCaches::default(),
            event,
            _subscription: subscription,
        });
        Ok(())
    }

    /// Run the current session. Results are in tree order without
    /// duplicates.
    pub fn find<T: Tree<Node = N> + ?Sized>(
        &self,
        tree: &T,
        target: TargetType,
    ) -> Result<Vec<N>, FinderError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| FinderError::Type("Finder has not been set up".to_string()))?;
        let interaction = self.interaction.borrow();
        let node = session.key.node;
        let ctx = MatchContext {
            tree,
            scope: node,
            caches: &session.caches,
            interaction: &interaction,
            event: session.event.as_ref(),
        };

        let found = match target {
            TargetType::Itself => {
                let matched = session.branches.iter().any(|branch| {
                    let entry = ctx.find_entry_nodes(branch.last(), target, node);
                    trace(branch, target, Direction::Prev, entry.compound, entry.pending);
                    entry.filtered && ctx.match_left(branch, branch.twigs.len() - 1, node)
                });
                if matched { vec![node] } else { Vec::new() }
            }
            TargetType::Lineal => session
                .branches
                .iter()
                .filter_map(|branch| {
                    let entry = ctx.find_entry_nodes(branch.last(), target, node);
                    trace(branch, target, Direction::Prev, entry.compound, entry.pending);
                    entry
                        .nodes
                        .into_iter()
                        .find(|&candidate| ctx.match_left(branch, branch.twigs.len() - 1, candidate))
                })
                // Every candidate is an inclusive ancestor of `node`; the
                // nearest is the deepest.
                .reduce(|nearest, candidate| {
                    if walk::is_descendant(tree, candidate, nearest) {
                        candidate
                    } else {
                        nearest
                    }
                })
                .into_iter()
                .collect(),
            TargetType::First | TargetType::All => {
                let per_branch: Vec<Vec<N>> = session
                    .branches
                    .iter()
                    .map(|branch| find_in_branch(&ctx, branch, target, node))
                    .filter(|found| !found.is_empty())
                    .collect();
                merge(tree, node, target, per_branch)
            }
        };
        Ok(found)
    }

    /// Set up, find, and apply the `noexcept` policy.
    fn run<T: Tree<Node = N> + ?Sized>(
        &mut self,
        tree: &T,
        selector: &str,
        node: N,
        options: &FindOptions<N>,
        target: TargetType,
        allowed: &[NodeKind],
    ) -> Result<Vec<N>, FinderError> {
        let result = check_node(tree, node, allowed)
            .and_then(|()| self.setup(tree, selector, node, options))
            .and_then(|()| self.find(tree, target));
        match result {
            Err(_) if options.noexcept => Ok(Vec::new()),
            other => other,
        }
    }

    /// [`Element.matches()`](https://dom.spec.whatwg.org/#dom-element-matches):
    /// whether `node` matches `selector`. A shadow root stands in for its
    /// host for `:host` selectors.
    pub fn matches<T: Tree<Node = N> + ?Sized>(
        &mut self,
        tree: &T,
        selector: &str,
        node: N,
        options: &FindOptions<N>,
    ) -> Result<bool, FinderError> {
        self.run(
            tree,
            selector,
            node,
            options,
            TargetType::Itself,
            &[NodeKind::Element, NodeKind::ShadowRoot],
        )
        .map(|found| !found.is_empty())
    }

    /// [`Element.closest()`](https://dom.spec.whatwg.org/#dom-element-closest):
    /// the nearest inclusive ancestor of `node` matching `selector`.
    pub fn closest<T: Tree<Node = N> + ?Sized>(
        &mut self,
        tree: &T,
        selector: &str,
        node: N,
        options: &FindOptions<N>,
    ) -> Result<Option<N>, FinderError> {
        self.run(tree, selector, node, options, TargetType::Lineal, &[NodeKind::Element])
            .map(|found| found.into_iter().next())
    }

    /// [`querySelector()`](https://dom.spec.whatwg.org/#dom-parentnode-queryselector):
    /// the first descendant of `node` in tree order matching `selector`.
    pub fn query_selector<T: Tree<Node = N> + ?Sized>(
        &mut self,
        tree: &T,
        selector: &str,
        node: N,
        options: &FindOptions<N>,
    ) -> Result<Option<N>, FinderError> {
        self.run(tree, selector, node, options, TargetType::First, PARENT_NODE_KINDS)
            .map(|found| found.into_iter().next())
    }

    /// [`querySelectorAll()`](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall):
    /// every descendant of `node` matching `selector`, in tree order.
    pub fn query_selector_all<T: Tree<Node = N> + ?Sized>(
        &mut self,
        tree: &T,
        selector: &str,
        node: N,
        options: &FindOptions<N>,
    ) -> Result<Vec<N>, FinderError> {
        self.run(tree, selector, node, options, TargetType::All, PARENT_NODE_KINDS)
    }
}

/// Node kinds implementing `ParentNode`.
const PARENT_NODE_KINDS: &[NodeKind] = &[
    NodeKind::Document,
    NodeKind::DocumentFragment,
    NodeKind::ShadowRoot,
    NodeKind::Element,
];

fn check_node<T: Tree + ?Sized>(tree: &T, node: T::Node, allowed: &[NodeKind]) -> Result<(), FinderError> {
    let kind = tree.kind(node);
    if allowed.contains(&kind) {
        Ok(())
    } else {
        Err(FinderError::Type(format!("Unexpected node {kind:?}")))
    }
}

/// Pick the walking direction for `branch`.
///
/// Walking forwards pays off when the leftmost twig has a cheaper index than
/// the subject, e.g. `#menu > li`.
fn choose_direction(branch: &Branch) -> Direction {
    if branch.twigs.len() < 2 {
        return Direction::Prev;
    }
    match (fast_path(branch.first()), fast_path(branch.last())) {
        (Some(FastPath::Id(_)), Some(FastPath::Id(_))) => Direction::Prev,
        (Some(FastPath::Id(_)), _) => Direction::Next,
        (Some(_), None)
            if matches!(
                branch.last().combinator,
                Some(Combinator::Child | Combinator::NextSibling | Combinator::SubsequentSibling)
            ) =>
        {
            Direction::Next
        }
        _ => Direction::Prev,
    }
}

/// Descendants of `node` matching `branch`, in tree order. Stops after the
/// first for [`TargetType::First`].
fn find_in_branch<T: Tree + ?Sized>(
    ctx: &MatchContext<'_, T>,
    branch: &Branch,
    target: TargetType,
    node: T::Node,
) -> Vec<T::Node> {
    let tree = ctx.tree;
    let last = branch.twigs.len() - 1;
    let direction = choose_direction(branch);

    match direction {
        Direction::Prev => {
            let entry = ctx.find_entry_nodes(branch.last(), target, node);
            trace(branch, target, direction, entry.compound, entry.pending);
            let candidates: Box<dyn Iterator<Item = T::Node> + '_> = if entry.pending {
                Box::new(
                    walk::descendant_elements(tree, node)
                        .filter(move |&candidate| ctx.match_leaves(&branch.last().leaves, candidate)),
                )
            } else {
                Box::new(entry.nodes.into_iter())
            };
            let mut matched = candidates.filter(|&candidate| ctx.match_left(branch, last, candidate));
            match target {
                TargetType::First => matched.next().into_iter().collect(),
                _ => matched.collect(),
            }
        }
        Direction::Next => {
            let root = walk::root(tree, node);
            let entry = ctx.find_entry_nodes(branch.first(), target, root);
            trace(branch, target, direction, entry.compound, entry.pending);
            let mut seeds = entry.nodes;
            if walk::is_element(tree, root) && ctx.match_leaves(&branch.first().leaves, root) {
                seeds.insert(0, root);
            }
            let mut found = ctx.match_node_next(branch, 0, seeds);
            found.retain(|&candidate| walk::is_descendant(tree, candidate, node));
            found.sort_by(|&a, &b| walk::compare_tree_order(tree, a, b));
            if target == TargetType::First {
                found.truncate(1);
            }
            found
        }
    }
}

/// Union per-branch results in tree order.
fn merge<T: Tree + ?Sized>(
    tree: &T,
    node: T::Node,
    target: TargetType,
    mut per_branch: Vec<Vec<T::Node>>,
) -> Vec<T::Node> {
    if per_branch.len() <= 1 {
        return per_branch.pop().unwrap_or_default();
    }
    if target == TargetType::First {
        return per_branch
            .into_iter()
            .filter_map(|found| found.into_iter().next())
            .min_by(|&a, &b| walk::compare_tree_order(tree, a, b))
            .into_iter()
            .collect();
    }
    let union: HashSet<T::Node> = per_branch.into_iter().flatten().collect();
    walk::descendants(tree, node)
        .filter(|candidate| union.contains(candidate))
        .collect()
}

#[cfg(feature = "match-trace")]
fn trace(branch: &Branch, target: TargetType, direction: Direction, compound: bool, pending: bool) {
    eprintln!(
        "[match-trace] branch {} ({} twigs): target={target} direction={direction} compound={compound} pending={pending}",
        branch.id,
        branch.twigs.len(),
    );
}

#[cfg(not(feature = "match-trace"))]
#[inline]
const fn trace(_branch: &Branch, _target: TargetType, _direction: Direction, _compound: bool, _pending: bool) {}

#[cfg(test)]
mod tests {
    use thicket_selector::parse_selector;

    use super::*;

    fn branches(selector: &str) -> Vec<Branch> {
        let list = parse_selector(selector).unwrap();
        compile(&list, selector, CompileOptions::default()).unwrap()
    }

    #[test]
    fn test_direction_for_id_anchor() {
        assert_eq!(choose_direction(&branches("#menu li")[0]), Direction::Next);
        assert_eq!(choose_direction(&branches("#menu #item")[0]), Direction::Prev);
    }

    #[test]
    fn test_direction_for_class_anchor() {
        assert_eq!(choose_direction(&branches(".menu > *")[0]), Direction::Next);
        assert_eq!(choose_direction(&branches(".menu *")[0]), Direction::Prev);
        assert_eq!(choose_direction(&branches("li")[0]), Direction::Prev);
    }

    #[test]
    fn test_target_type_display() {
        assert_eq!(TargetType::Itself.to_string(), "self");
        assert_eq!(TargetType::All.to_string(), "all");
        assert_eq!(Direction::Next.to_string(), "next");
    }
}
