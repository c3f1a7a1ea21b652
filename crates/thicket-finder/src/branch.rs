//! Compiled selectors.
//!
//! A selector list compiles to one [`Branch`] per comma alternative. A branch
//! is a left-to-right chain of [`Twig`]s, each a compound selector plus the
//! combinator linking it to the twig on its left:
//!
//! ```text
//! div.container > ul.nav li
//! [div.container] <-(Child)- [ul.nav] <-(Descendant)- [li]
//! ```
//!
//! The last twig is the subject: the node that must ultimately match.

use std::str::FromStr;

use strum_macros::{AsRefStr, EnumString};

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that
    /// follows element A (not necessarily immediately), where A and B share the
    /// same parent."
    SubsequentSibling,
}

impl FromStr for Combinator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            " " => Ok(Self::Descendant),
            ">" => Ok(Self::Child),
            "+" => Ok(Self::NextSibling),
            "~" => Ok(Self::SubsequentSibling),
            other => Err(format!("unknown combinator {other:?}")),
        }
    }
}

/// One compound selector within a [`Branch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Twig {
    /// Relation to the twig on the left; `None` only for the first twig.
    pub combinator: Option<Combinator>,
    /// Simple selectors; all of them must match.
    pub leaves: Vec<Leaf>,
}

impl Twig {
    /// "A compound selector is a sequence of simple selectors": true when
    /// there is more than one.
    pub fn is_compound(&self) -> bool {
        self.leaves.len() > 1
    }
}

/// One comma-separated alternative of a selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Unique within a compiled selector; keys the match memo.
    pub id: usize,
    /// Twigs, left to right. Never empty.
    pub twigs: Vec<Twig>,
    /// Whether matching depends on interaction state or the `event` option,
    /// which bars memoization.
    pub volatile: bool,
}

impl Branch {
    /// The subject twig.
    pub fn last(&self) -> &Twig {
        &self.twigs[self.twigs.len() - 1]
    }

    /// The leftmost twig.
    pub fn first(&self) -> &Twig {
        &self.twigs[0]
    }
}

/// A branch of a `:has()` argument, anchored at the element being tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeBranch {
    /// [§ 4.4 Relative selectors](https://www.w3.org/TR/selectors-4/#relative)
    /// "Relative selectors begin with a combinator, with a selector representing
    /// the anchor element implied at the start of the selector. If no combinator
    /// is present, the descendant combinator is implied."
    pub anchor: Combinator,
    /// The selector to the right of the anchor.
    pub branch: Branch,
}

/// Namespace part of a type or attribute selector.
///
/// [§ 5.3 Namespaces in elemental selectors](https://www.w3.org/TR/selectors-4/#type-nmsp)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceConstraint {
    /// No prefix written (`E`, `[attr]`).
    Default,
    /// `*|E`: any namespace.
    Any,
    /// `|E`: no namespace.
    None,
    /// `ns|E`
    Prefix(String),
}

impl NamespaceConstraint {
    /// Split `ns|name` into its constraint and local part.
    pub(crate) fn split(name: &str) -> (Self, &str) {
        match name.split_once('|') {
            Some(("*", local)) => (Self::Any, local),
            Some(("", local)) => (Self::None, local),
            Some((prefix, local)) => (Self::Prefix(prefix.to_string()), local),
            None => (Self::Default, name),
        }
    }
}

/// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[att]`
    Exists,
    /// `[att=val]`
    Equals(String),
    /// `[att~=val]`
    Includes(String),
    /// `[att|=val]`
    DashMatch(String),
    /// `[att^=val]`
    Prefix(String),
    /// `[att$=val]`
    Suffix(String),
    /// `[att*=val]`
    Substring(String),
}

/// [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    /// No flag: the document language decides.
    Default,
    /// `i`
    AsciiInsensitive,
    /// `s`
    Sensitive,
}

/// An attribute selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeLeaf {
    /// Namespace part of the name.
    pub namespace: NamespaceConstraint,
    /// Local part of the name.
    pub local_name: String,
    /// The operator and value.
    pub operator: AttributeOperator,
    /// The `i`/`s` flag.
    pub case: CaseSensitivity,
}

/// A type or universal selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLeaf {
    /// Namespace part.
    pub namespace: NamespaceConstraint,
    /// Local name; `None` for `*`.
    pub local_name: Option<String>,
}

/// A simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    Type(TypeLeaf),
    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class(String),
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),
    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeLeaf),
    /// [§ 3.6 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    Pseudo(PseudoClass),
    /// A recognized pseudo-element. Elements never match it.
    PseudoElement(String),
    /// An unknown pseudo-class or pseudo-element kept because errors were
    /// forgiven. Never matches.
    Unknown(String),
}

impl Leaf {
    /// Whether the leaf reads interaction state.
    pub(crate) fn is_volatile(&self) -> bool {
        match self {
            Self::Pseudo(pseudo) => pseudo.is_volatile(),
            _ => false,
        }
    }
}

/// Pseudo-classes without arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum StatePseudo {
    /// [§ 14.1 `:root`](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    Root,
    /// [§ 14.2 `:empty`](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    Empty,
    /// [§ 7.4 `:scope`](https://www.w3.org/TR/selectors-4/#the-scope-pseudo)
    Scope,
    /// [§ 7.2 `:any-link`](https://www.w3.org/TR/selectors-4/#the-any-link-pseudo)
    AnyLink,
    /// [§ 7.2 `:link`](https://www.w3.org/TR/selectors-4/#link)
    Link,
    /// [§ 7.3 `:local-link`](https://www.w3.org/TR/selectors-4/#the-local-link-pseudo)
    LocalLink,
    /// [§ 7.5 `:target`](https://www.w3.org/TR/selectors-4/#the-target-pseudo)
    Target,
    /// [§ 7.6 `:target-within`](https://www.w3.org/TR/selectors-4/#the-target-within-pseudo)
    TargetWithin,
    /// [`:defined`](https://html.spec.whatwg.org/multipage/semantics-other.html#selector-defined)
    Defined,
    /// [`:open`](https://html.spec.whatwg.org/multipage/semantics-other.html#selector-open)
    Open,
    /// `:closed`, the negation of `:open` on openable elements.
    Closed,
    /// [§ 9.2 `:hover`](https://www.w3.org/TR/selectors-4/#the-hover-pseudo)
    Hover,
    /// [§ 9.3 `:active`](https://www.w3.org/TR/selectors-4/#the-active-pseudo)
    Active,
    /// [§ 9.4 `:focus`](https://www.w3.org/TR/selectors-4/#the-focus-pseudo)
    Focus,
    /// [§ 9.5 `:focus-visible`](https://www.w3.org/TR/selectors-4/#the-focus-visible-pseudo)
    FocusVisible,
    /// [§ 9.6 `:focus-within`](https://www.w3.org/TR/selectors-4/#the-focus-within-pseudo)
    FocusWithin,
    /// [§ 13.1.1 `:enabled`](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Enabled,
    /// [§ 13.1.1 `:disabled`](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Disabled,
    /// [§ 13.1.2 `:read-only`](https://www.w3.org/TR/selectors-4/#rw-pseudos)
    ReadOnly,
    /// [§ 13.1.2 `:read-write`](https://www.w3.org/TR/selectors-4/#rw-pseudos)
    ReadWrite,
    /// [§ 13.1.3 `:placeholder-shown`](https://www.w3.org/TR/selectors-4/#placeholder)
    PlaceholderShown,
    /// [§ 13.2 `:default`](https://www.w3.org/TR/selectors-4/#the-default-pseudo)
    Default,
    /// [§ 13.3.1 `:checked`](https://www.w3.org/TR/selectors-4/#checked)
    Checked,
    /// [§ 13.3.2 `:indeterminate`](https://www.w3.org/TR/selectors-4/#indeterminate)
    Indeterminate,
    /// [§ 13.4.2 `:valid`](https://www.w3.org/TR/selectors-4/#validity-pseudos)
    Valid,
    /// [§ 13.4.2 `:invalid`](https://www.w3.org/TR/selectors-4/#validity-pseudos)
    Invalid,
    /// [§ 13.4.3 `:in-range`](https://www.w3.org/TR/selectors-4/#range-pseudos)
    InRange,
    /// [§ 13.4.3 `:out-of-range`](https://www.w3.org/TR/selectors-4/#range-pseudos)
    OutOfRange,
    /// [§ 13.4.4 `:required`](https://www.w3.org/TR/selectors-4/#opt-pseudos)
    Required,
    /// [§ 13.4.4 `:optional`](https://www.w3.org/TR/selectors-4/#opt-pseudos)
    Optional,
}

impl StatePseudo {
    /// Pseudo-classes backed by UI events.
    pub const fn is_interaction(self) -> bool {
        matches!(
            self,
            Self::Hover | Self::Active | Self::Focus | Self::FocusVisible | Self::FocusWithin
        )
    }
}

/// [§ 14.4 Child-indexed pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NthLeaf {
    /// Unique within a compiled selector; keys the sibling-index cache.
    pub id: usize,
    /// Step.
    pub a: i32,
    /// Offset, 1-based as written.
    pub b: i32,
    /// Count from the last sibling (`-last-` variants).
    pub reverse: bool,
    /// Only count siblings of the same type (`-of-type` variants).
    pub of_type: bool,
    /// The `of S` filter.
    pub of: Option<Vec<Branch>>,
}

/// [§ 15 The Directionality Pseudo-class](https://www.w3.org/TR/selectors-4/#the-dir-pseudo)
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum TextDirection {
    /// `ltr`
    Ltr,
    /// `rtl`
    Rtl,
}

/// A pseudo-class, resolved once at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// Pseudo-classes without arguments.
    State(StatePseudo),
    /// `:nth-child()` and relatives, including the `first-`/`last-` forms.
    Nth(NthLeaf),
    /// [§ 4.2 `:is()`](https://www.w3.org/TR/selectors-4/#matches)
    Is(Vec<Branch>),
    /// [§ 4.3 `:where()`](https://www.w3.org/TR/selectors-4/#zero-matches)
    Where(Vec<Branch>),
    /// [§ 4.4 `:not()`](https://www.w3.org/TR/selectors-4/#negation)
    Not(Vec<Branch>),
    /// [§ 4.5 `:has()`](https://www.w3.org/TR/selectors-4/#relational)
    Has(Vec<RelativeBranch>),
    /// [CSS Scoping § 3.2.1 `:host`](https://www.w3.org/TR/css-scoping-1/#host-selector);
    /// `None` without an argument.
    Host(Option<Vec<Branch>>),
    /// [CSS Scoping § 3.2.1 `:host-context()`](https://www.w3.org/TR/css-scoping-1/#host-selector)
    HostContext(Vec<Branch>),
    /// [§ 8.2 `:lang()`](https://www.w3.org/TR/selectors-4/#the-lang-pseudo)
    Lang(Vec<String>),
    /// [§ 15 `:dir()`](https://www.w3.org/TR/selectors-4/#the-dir-pseudo)
    Dir(TextDirection),
    /// Recognized but never matching.
    Unsupported(String),
}

impl PseudoClass {
    /// Whether matching depends on interaction state.
    pub(crate) fn is_volatile(&self) -> bool {
        let any_volatile = |branches: &[Branch]| branches.iter().any(|branch| branch.volatile);
        match self {
            Self::State(state) => state.is_interaction(),
            Self::Nth(nth) => nth.of.as_deref().is_some_and(any_volatile),
            Self::Is(branches) | Self::Where(branches) | Self::Not(branches) => {
                any_volatile(branches)
            }
            Self::Has(relatives) => relatives.iter().any(|relative| relative.branch.volatile),
            Self::Host(Some(branches)) | Self::HostContext(branches) => any_volatile(branches),
            Self::Host(None) | Self::Lang(_) | Self::Dir(_) | Self::Unsupported(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_pseudo_names() {
        assert_eq!("focus-visible".parse(), Ok(StatePseudo::FocusVisible));
        assert_eq!("out-of-range".parse(), Ok(StatePseudo::OutOfRange));
        assert_eq!(StatePseudo::PlaceholderShown.as_ref(), "placeholder-shown");
        assert!("nth-child".parse::<StatePseudo>().is_err());
    }

    #[test]
    fn test_namespace_split() {
        assert_eq!(
            NamespaceConstraint::split("svg|rect"),
            (NamespaceConstraint::Prefix("svg".to_string()), "rect")
        );
        assert_eq!(NamespaceConstraint::split("*|a"), (NamespaceConstraint::Any, "a"));
        assert_eq!(NamespaceConstraint::split("|a"), (NamespaceConstraint::None, "a"));
        assert_eq!(NamespaceConstraint::split("a"), (NamespaceConstraint::Default, "a"));
    }
}
