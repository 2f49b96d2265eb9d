//! Core IR construction modules
//!
//! Layout follows the construction flow, leaves first:
//!
//! - `constant` - leaf payloads: primitives, strings, opaque host values
//! - `node` - node kinds, ids, and the child-list storage
//! - `tree` - the node arena and factory/accessor surface
//! - `entity` - declarative units, scoped nesting, control-flow targets
//! - `symbol` - immutable symbol descriptors
//! - `location` - source-span tokens and the locator boundary
//! - `collections` - array/set/list bridging for callers
//! - `formats` - tree pretty-printing
//! - `bridge` - the translator-facing facade and diagnostics
//! - `error` - the uniform error type every operation returns
//! - `testing` - fluent assertion helpers for construction tests

pub mod bridge;
pub mod collections;
pub mod constant;
pub mod entity;
pub mod error;
pub mod formats;
pub mod location;
pub mod node;
pub mod symbol;
pub mod testing;
pub mod tree;

pub use bridge::{Bridge, DiagnosticSink, StderrSink, TranslationUnit};
pub use constant::{ConstantTag, ConstantValue, HostObject, HostValue};
pub use entity::{Entities, Entity, EntityId, EntityKind, FieldInfo, GotoLabel, Qualifier, TypeRef};
pub use error::BridgeError;
pub use location::{LineColumnLocator, Locator, Position};
pub use node::{ChildList, NodeId, NodeKind};
pub use symbol::SymbolDescriptor;
pub use tree::Tree;
