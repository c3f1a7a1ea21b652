//! [CSS Scoping § 3.2.1 Selecting Shadow Hosts from within a Shadow Tree](https://www.w3.org/TR/css-scoping-1/#host-selector)
//!
//! Inside a shadow tree the host is represented by the shadow root, so these
//! pseudo-classes only match when tested against a shadow root node.

use crate::branch::Branch;
use crate::context::MatchContext;
use crate::tree::{NodeKind, Tree};
use crate::walk;

impl<T: Tree + ?Sized> MatchContext<'_, T> {
    fn shadow_host(&self, node: T::Node) -> Option<T::Node> {
        if self.tree.kind(node) != NodeKind::ShadowRoot {
            return None;
        }
        self.tree.host(node)
    }

    /// Whether the host element matches one of the compound selectors.
    fn host_matches(&self, branches: &[Branch], host: T::Node) -> bool {
        branches
            .iter()
            .any(|branch| self.match_leaves(&branch.first().leaves, host))
    }

    /// "The :host pseudo-class, when evaluated in the context of a shadow tree,
    /// matches the shadow tree's shadow host. [...] it also accepts a
    /// <compound-selector> argument ... matches only if the shadow host also
    /// matches the compound selector."
    pub(super) fn match_host(&self, argument: Option<&[Branch]>, node: T::Node) -> bool {
        let Some(host) = self.shadow_host(node) else {
            return false;
        };
        argument.is_none_or(|branches| self.host_matches(branches, host))
    }

    /// "The :host-context() pseudo-class tests whether there is an ancestor,
    /// outside the shadow tree, which matches a particular selector."
    pub(super) fn match_host_context(&self, branches: &[Branch], node: T::Node) -> bool {
        let Some(host) = self.shadow_host(node) else {
            return false;
        };
        walk::inclusive_ancestors(self.tree, host)
            .filter(|&ancestor| walk::is_element(self.tree, ancestor))
            .any(|ancestor| self.host_matches(branches, ancestor))
    }
}
