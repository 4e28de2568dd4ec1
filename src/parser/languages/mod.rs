//! Language-specific grammar profiles.
//!
//! Each language module provides:
//! - The tree-sitter language and the selectors/extensions it answers to
//! - Which node kinds are functions and how their signature is sliced
//! - The classification table mapping statement kinds to control structures

pub mod c;
pub mod cpp;
pub mod javascript;
pub mod python;

use super::Grammar;

/// All available grammars.
pub static ALL: &[&Grammar] = &[
    &c::GRAMMAR,
    &cpp::GRAMMAR,
    &javascript::GRAMMAR,
    &python::GRAMMAR,
];
