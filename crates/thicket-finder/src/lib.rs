//! CSS selector matching for pluggable element trees.
//!
//! # Scope
//!
//! This crate implements the four selector entry points of the
//! [DOM Standard](https://dom.spec.whatwg.org/#scope-match-a-selectors-string):
//! `matches`, `closest`, `querySelector` and `querySelectorAll`, on top of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/):
//!
//! - **Compiler**: selector AST to branches of twigs (one per comma alternative)
//! - **Entry-node locator**: id/class/tag fast paths before any tree walk
//! - **Combinator walker**: descendant, child, next-sibling and subsequent-sibling
//!   relations in both search directions
//! - **Leaf matcher**: type, class, id and attribute selectors
//! - **Pseudo-class engine**: structural (`An+B`), logical (`:is`, `:where`,
//!   `:not`, `:has`), shadow host, linguistic, location and form-validity
//!   pseudo-classes
//! - **Interaction tracker**: `:hover`, `:active`, `:focus`, `:focus-visible`
//!   and `:focus-within` from UI events
//!
//! The host supplies the tree through the [`Tree`] trait. With the default
//! `dom-adapter` feature, [`thicket_dom::DomTree`] implements it.
//!
//! # Example
//!
//! ```
//! use thicket_dom::{DomTree, NodeId};
//! use thicket_finder::{FindOptions, Finder};
//!
//! let mut dom = DomTree::new();
//! let list = dom.append_html(NodeId::ROOT, "ul", &[]);
//! let item = dom.append_html(list, "li", &[("class", "active")]);
//!
//! let mut finder = Finder::new();
//! let options = FindOptions::default();
//! assert_eq!(
//!     finder.query_selector(&dom, "ul > li.active", NodeId::ROOT, &options),
//!     Ok(Some(item))
//! );
//! ```

/// Tree implementations for concrete host DOM trees.
pub mod adapters;
/// Compiled selector representation: branches, twigs and leaves.
pub mod branch;
mod combinator;
mod compiler;
mod context;
mod entry;
/// Error taxonomy.
pub mod error;
/// The public `Finder` and its options.
pub mod finder;
/// `:hover`, `:active` and focus tracking.
pub mod interaction;
mod leaf;
mod pseudo;
/// The host tree capability trait.
pub mod tree;
mod walk;

pub use branch::{Branch, Combinator, Leaf, PseudoClass, StatePseudo, Twig};
pub use error::{ErrorKind, FinderError};
pub use finder::{Direction, FindOptions, Finder, TargetType};
pub use tree::{AttrView, EventHandler, NodeKind, Subscription, Tree, UiEvent, UiEventKind};

/// Maximum depth of nested selector lists (`:is(:not(:is(...)))`) accepted
/// by the compiler.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Component name used for diagnostics.
pub(crate) const COMPONENT: &str = "Selector";
