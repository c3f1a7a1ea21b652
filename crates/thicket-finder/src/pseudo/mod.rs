//! [§ 3.6 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
//!
//! Dispatch over the compiled [`PseudoClass`] variants. Each family lives in
//! its own module; interaction pseudo-classes are in `crate::interaction`.

mod form;
mod host;
mod lang;
mod location;
mod logical;
mod structural;

use crate::branch::{PseudoClass, StatePseudo};
use crate::context::MatchContext;
use crate::tree::Tree;

impl<T: Tree + ?Sized> MatchContext<'_, T> {
    pub(crate) fn match_pseudo(&self, pseudo: &PseudoClass, node: T::Node) -> bool {
        match pseudo {
            PseudoClass::State(state) => self.match_state(*state, node),
            PseudoClass::Nth(nth) => self.match_nth(nth, node),
            PseudoClass::Is(branches) | PseudoClass::Where(branches) => {
                self.match_any_branch(branches, node)
            }
            PseudoClass::Not(branches) => !self.match_any_branch(branches, node),
            PseudoClass::Has(relatives) => self.match_has(relatives, node),
            PseudoClass::Host(argument) => self.match_host(argument.as_deref(), node),
            PseudoClass::HostContext(branches) => self.match_host_context(branches, node),
            PseudoClass::Lang(ranges) => self.match_lang(ranges, node),
            PseudoClass::Dir(direction) => self.directionality(node) == *direction,
            PseudoClass::Unsupported(_) => false,
        }
    }

    fn match_state(&self, state: StatePseudo, node: T::Node) -> bool {
        match state {
            StatePseudo::Root => self.match_root(node),
            StatePseudo::Empty => self.match_empty(node),
            StatePseudo::Scope => self.match_scope(node),
            StatePseudo::AnyLink | StatePseudo::Link => self.is_link(node),
            StatePseudo::LocalLink => self.match_local_link(node),
            StatePseudo::Target => self.tree.target_element(node) == Some(node),
            StatePseudo::TargetWithin => self.match_target_within(node),
            StatePseudo::Defined => self.tree.is_defined(node),
            // [HTML § 4.16.3](https://html.spec.whatwg.org/multipage/semantics-other.html#selector-open)
            // "details and dialog elements that have an open attribute"
            StatePseudo::Open => self.is_openable(node) && self.tree.attribute(node, "open").is_some(),
            StatePseudo::Closed => self.is_openable(node) && self.tree.attribute(node, "open").is_none(),
            StatePseudo::Hover
            | StatePseudo::Active
            | StatePseudo::Focus
            | StatePseudo::FocusVisible
            | StatePseudo::FocusWithin => self.match_interaction(state, node),
            StatePseudo::Enabled
            | StatePseudo::Disabled
            | StatePseudo::ReadOnly
            | StatePseudo::ReadWrite
            | StatePseudo::PlaceholderShown
            | StatePseudo::Default
            | StatePseudo::Checked
            | StatePseudo::Indeterminate
            | StatePseudo::Valid
            | StatePseudo::Invalid
            | StatePseudo::InRange
            | StatePseudo::OutOfRange
            | StatePseudo::Required
            | StatePseudo::Optional => self.match_form_state(state, node),
        }
    }

    fn is_openable(&self, node: T::Node) -> bool {
        self.is_html(node, "details") || self.is_html(node, "dialog")
    }
}
