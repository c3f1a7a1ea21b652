//! Plain-structure selector AST.
//!
//! Every node carries a `type` tag when serialized, e.g.
//! `{"type":"TypeSelector","name":"li"}`, so trees produced elsewhere can be
//! deserialized and handed to the finder unchanged.

use serde::{Deserialize, Serialize};

/// [§ 4.1 Selector Lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// "A comma-separated list of selectors represents the union of all elements
/// selected by each of the individual selectors in the selector list."
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorList {
    /// One entry per comma-separated alternative.
    pub children: Vec<Selector>,
}

impl SelectorList {
    /// Whether the list has no alternatives (e.g. `:is()` after forgiving
    /// parsing dropped every branch).
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl std::str::FromStr for SelectorList {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_selector(s)
    }
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// A flat, left-to-right sequence of simple selectors and combinators. A
/// relative selector (inside `:has()`) may begin with a combinator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Selector {
    /// Simple selectors and combinators in source order.
    pub children: Vec<Component>,
}

/// A single AST node inside a [`Selector`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Component {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors),
    /// including the universal selector `*` and namespace forms `ns|E`,
    /// `*|E`, `|E`.
    TypeSelector {
        /// The (possibly prefixed) element name.
        name: String,
    },

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ClassSelector {
        /// Class name without the leading `.`.
        name: String,
    },

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    IdSelector {
        /// ID without the leading `#`.
        name: String,
    },

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    AttributeSelector {
        /// The (possibly prefixed) attribute name.
        name: String,
        /// One of `=`, `~=`, `|=`, `^=`, `$=`, `*=`; `None` for `[attr]`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matcher: Option<String>,
        /// The value to compare against.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        /// `i` or `s`, lowercased.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flags: Option<String>,
    },

    /// [§ 3.6 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClassSelector {
        /// Lowercased name without the leading `:`.
        name: String,
        /// Arguments for functional pseudo-classes; `None` when written without
        /// parentheses.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        children: Option<Vec<PseudoArgument>>,
    },

    /// [§ 3.6.1 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    PseudoElementSelector {
        /// Lowercased name without the leading `::`.
        name: String,
        /// Arguments for functional pseudo-elements.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        children: Option<Vec<PseudoArgument>>,
    },

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators):
    /// `" "`, `">"`, `"+"` or `"~"`.
    Combinator {
        /// The combinator punctuation.
        name: String,
    },
}

impl Component {
    /// Whether this node is a combinator.
    pub const fn is_combinator(&self) -> bool {
        matches!(self, Self::Combinator { .. })
    }
}

/// Argument of a functional pseudo-class or pseudo-element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PseudoArgument {
    /// A nested selector list (`:is(a, b)`, `:has(> li)`).
    SelectorList(SelectorList),
    /// [CSS Syntax § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
    AnPlusB(AnPlusB),
    /// Unparsed argument text (`:lang(en, "de-*")`, `:dir(rtl)`).
    Raw {
        /// Argument text with surrounding whitespace trimmed.
        value: String,
    },
}

/// `An+B [of S]` as written; `b` is 1-based as in CSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnPlusB {
    /// Step.
    pub a: i32,
    /// Offset.
    pub b: i32,
    /// The `of S` filter of `:nth-child()` / `:nth-last-child()`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<SelectorList>,
}
