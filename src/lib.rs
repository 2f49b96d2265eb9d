//! # astkit
//!
//! A construction and binding API for a language-agnostic AST intermediate
//! representation ("AST IR").
//!
//! Native front-end translators call this layer bottom-up: wrap literals with
//! the constant factories, assemble typed nodes with the node factory, then
//! register the finished subtrees and their declarative units (scripts,
//! functions, fields) with the entity layer. The frozen result crosses the
//! boundary to a downstream static-analysis framework read-only.
//!
//! For comprehensive testing guidelines, see the [testing module](ir::testing).
//! All construction tests must assert tree structure, not just node counts.

pub mod ir;
