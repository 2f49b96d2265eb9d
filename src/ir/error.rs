//! Error types for the construction and binding layer
//!
//! Every fallible public operation returns `Result<_, BridgeError>` directly.
//! Errors are synchronous and unwind immediately through the calling
//! translator; none are retried and none are swallowed. A raised error aborts
//! the in-flight construction and the caller discards the partial tree.

use std::fmt;

/// Errors raised by the construction and binding layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// An argument was not a node of the expected tree, or a payload
    /// extraction target had the wrong shape. Carries the 1-based argument
    /// index, the offending value's printable form, and its observed type.
    TypeViolation {
        index: usize,
        printable: String,
        type_name: String,
    },
    /// A required binding (entity name, type, kind name, entity id) was
    /// never established. Fatal to the translator session.
    ResourceLookupFailure(String),
    /// An underlying construction step failed after validation passed.
    ConstructionFailure(String),
    /// Explicit `die` invocation; always fatal to the current unit.
    Diagnostic(String),
}

impl BridgeError {
    /// The violation raised when a child argument fails the node check
    pub fn not_a_node(index: usize, printable: String, type_name: String) -> Self {
        BridgeError::TypeViolation {
            index,
            printable,
            type_name,
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::TypeViolation {
                index,
                printable,
                type_name,
            } => write!(
                f,
                "argument {} ({} of type {}) is not a node of this tree",
                index, printable, type_name
            ),
            BridgeError::ResourceLookupFailure(what) => {
                write!(f, "binding lookup failed: {}", what)
            }
            BridgeError::ConstructionFailure(msg) => write!(f, "construction failed: {}", msg),
            BridgeError::Diagnostic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for BridgeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_violation_message_carries_index_and_type() {
        let err = BridgeError::not_a_node(3, "node #7 of tree 2".to_string(), "NodeId".to_string());
        assert_eq!(
            err.to_string(),
            "argument 3 (node #7 of tree 2 of type NodeId) is not a node of this tree"
        );
    }

    #[test]
    fn test_diagnostic_message_is_verbatim() {
        let err = BridgeError::Diagnostic("inconsistent loop nesting".to_string());
        assert_eq!(err.to_string(), "inconsistent loop nesting");
    }
}
