//! Selector grammar parsing for thicket.
//!
//! # Scope
//!
//! This crate turns a selector string into the plain-structure AST consumed by
//! the finder ([Selectors Level 4 § 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)):
//!
//! - Type, universal, class, ID and attribute selectors, with namespace prefixes
//! - Compound and complex selectors joined by the four combinators
//! - Pseudo-classes and pseudo-elements, including functional arguments:
//!   selector lists (`:is()`, `:not()`, `:host()`), forgiving lists
//!   (`:is()`, `:where()`), relative lists (`:has()`), `An+B [of S]`, and raw
//!   arguments (`:lang()`, `:dir()`, `::part()`)
//! - CSS escapes and quoted strings
//!
//! The parser validates grammar only. Whether a pseudo-class name is known, or
//! whether an argument makes sense for it, is decided by the consumer.

/// AST node types.
pub mod ast;
/// Recursive-descent selector parser.
pub mod parser;

pub use ast::{AnPlusB, Component, PseudoArgument, Selector, SelectorList};
pub use parser::{ParseError, parse_relative_selector_list, parse_selector};
