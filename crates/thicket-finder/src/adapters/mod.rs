//! [`Tree`](crate::Tree) implementations for concrete host trees.
//!
//! Each adapter sits behind a Cargo feature so hosts only pull in the DOM
//! crates they use.

#[cfg(feature = "dom-adapter")]
mod dom;
