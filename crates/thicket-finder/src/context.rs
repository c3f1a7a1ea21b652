//! Per-evaluation matching state.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::rc::Rc;

use crate::interaction::InteractionState;
use crate::tree::{Tree, UiEvent};

/// Key of the sibling-index cache: nth leaf, parent, and for `-of-type`
/// variants the element type being counted.
pub(crate) type NthKey<N> = (usize, Option<N>, Option<(String, Option<String>)>);

/// Caches that live as long as one Finder setup.
#[derive(Debug)]
pub(crate) struct SessionCaches<N> {
    /// `(branch id, twig index, node)` to "node matches the branch up to and
    /// including that twig".
    memo: RefCell<HashMap<(usize, usize, N), bool>>,
    /// Nodes selected by an nth leaf among one set of siblings.
    nth: RefCell<HashMap<NthKey<N>, Rc<HashSet<N>>>>,
}

impl<N> Default for SessionCaches<N> {
    fn default() -> Self {
        Self {
            memo: RefCell::new(HashMap::new()),
            nth: RefCell::new(HashMap::new()),
        }
    }
}

impl<N: Copy + Eq + Hash> SessionCaches<N> {
    pub(crate) fn memo(&self, key: (usize, usize, N)) -> Option<bool> {
        self.memo.borrow().get(&key).copied()
    }

    pub(crate) fn store_memo(&self, key: (usize, usize, N), matched: bool) {
        let _ = self.memo.borrow_mut().insert(key, matched);
    }

    pub(crate) fn nth(&self, key: &NthKey<N>) -> Option<Rc<HashSet<N>>> {
        self.nth.borrow().get(key).cloned()
    }

    pub(crate) fn store_nth(&self, key: NthKey<N>, selected: Rc<HashSet<N>>) {
        let _ = self.nth.borrow_mut().insert(key, selected);
    }

    pub(crate) fn clear(&self) {
        self.memo.borrow_mut().clear();
        self.nth.borrow_mut().clear();
    }
}

/// Everything the matching stages need for one `find`.
pub(crate) struct MatchContext<'a, T: Tree + ?Sized> {
    pub(crate) tree: &'a T,
    /// The node `:scope` refers to: the node passed to the operation.
    pub(crate) scope: T::Node,
    pub(crate) caches: &'a SessionCaches<T::Node>,
    pub(crate) interaction: &'a InteractionState<T::Node>,
    /// The caller-supplied event, if trusted.
    pub(crate) event: Option<&'a UiEvent<T::Node>>,
}
