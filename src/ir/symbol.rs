//! Immutable symbol descriptors
//!
//! A descriptor records the declaration-site facts a downstream scope
//! builder needs: name, finality, case sensitivity, and an optional default
//! value. Descriptors are built once, attached to a declaration node as
//! metadata, and never mutated. Equality is structural over all four fields.

use crate::ir::constant::ConstantValue;
use serde::Serialize;

/// Immutable declaration record attached to declaration sites
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolDescriptor {
    name: String,
    is_final: bool,
    is_case_insensitive: bool,
    default_value: Option<ConstantValue>,
}

impl SymbolDescriptor {
    /// Descriptor with defaults: not final, case sensitive, no default value
    pub fn new(name: &str) -> Self {
        SymbolDescriptor {
            // Defensive copy; the descriptor never aliases caller memory
            name: name.to_string(),
            is_final: false,
            is_case_insensitive: false,
            default_value: None,
        }
    }

    pub fn finalized(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    pub fn case_insensitive(mut self, is_case_insensitive: bool) -> Self {
        self.is_case_insensitive = is_case_insensitive;
        self
    }

    pub fn default_value(mut self, value: impl Into<ConstantValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.is_case_insensitive
    }

    pub fn default(&self) -> Option<&ConstantValue> {
        self.default_value.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let sym = SymbolDescriptor::new("x");
        assert_eq!(sym.name(), "x");
        assert!(!sym.is_final());
        assert!(!sym.is_case_insensitive());
        assert!(sym.default().is_none());
    }

    #[test]
    fn test_equality_is_structural_over_all_fields() {
        let a = SymbolDescriptor::new("x").finalized(true);
        let b = SymbolDescriptor::new("x").finalized(true).case_insensitive(false);
        let c = SymbolDescriptor::new("x").finalized(false);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, a.clone().default_value(0));
    }

    #[test]
    fn test_name_is_copied() {
        let mut name = String::from("count");
        let sym = SymbolDescriptor::new(&name);
        name.clear();
        assert_eq!(sym.name(), "count");
    }
}
