//! Common utilities for the thicket selector engine.
//!
//! This crate provides shared infrastructure used by the other thicket crates:
//! - **Warning System** - colored terminal output for unsupported selectors

pub mod warning;
