//! Leaf payloads for constant nodes
//!
//! Constant nodes carry exactly one payload value instead of children. The
//! payload is one of the primitive variants, an independently owned string
//! copy, or a type-erased host value whose concrete type is established only
//! by the accessor that asks for it.
//!
//! Two payloads are sentinels compared by identity rather than value: the
//! switch-default marker and the call member reference. Both are encoded as
//! dedicated variants so identity is a discriminant check.

use serde::{Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Type-erased host value stored behind an opaque constant
///
/// Blanket-implemented for anything `Any + Debug`, so host objects stay
/// printable in diagnostics without knowing their concrete type.
pub trait HostValue: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug> HostValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Shared handle to an opaque host value
///
/// Equality is pointer identity: two handles are equal iff they wrap the
/// same allocation, mirroring reference-identity semantics on the host side.
#[derive(Clone)]
pub struct HostObject(Rc<dyn HostValue>);

impl HostObject {
    pub fn new<T: HostValue>(value: T) -> Self {
        HostObject(Rc::new(value))
    }

    /// Downcast to the concrete type the caller expects
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref()
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Type tag for constant payloads, used by shape queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConstantTag {
    Bool,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Str,
    Object,
    SwitchDefault,
    CallReference,
}

/// A constant node's payload
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Bool(bool),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Independently owned copy of the caller's string
    Str(String),
    /// Opaque host value, compared by identity
    Object(HostObject),
    /// Distinguished "switch default" marker, tested by identity
    SwitchDefault,
    /// The call member reference handed to call-node builders
    CallReference,
}

impl ConstantValue {
    pub fn tag(&self) -> ConstantTag {
        match self {
            ConstantValue::Bool(_) => ConstantTag::Bool,
            ConstantValue::Char(_) => ConstantTag::Char,
            ConstantValue::Short(_) => ConstantTag::Short,
            ConstantValue::Int(_) => ConstantTag::Int,
            ConstantValue::Long(_) => ConstantTag::Long,
            ConstantValue::Float(_) => ConstantTag::Float,
            ConstantValue::Double(_) => ConstantTag::Double,
            ConstantValue::Str(_) => ConstantTag::Str,
            ConstantValue::Object(_) => ConstantTag::Object,
            ConstantValue::SwitchDefault => ConstantTag::SwitchDefault,
            ConstantValue::CallReference => ConstantTag::CallReference,
        }
    }

    /// Name of the payload's runtime type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self.tag() {
            ConstantTag::Bool => "bool",
            ConstantTag::Char => "char",
            ConstantTag::Short => "short",
            ConstantTag::Int => "int",
            ConstantTag::Long => "long",
            ConstantTag::Float => "float",
            ConstantTag::Double => "double",
            ConstantTag::Str => "string",
            ConstantTag::Object => "host object",
            ConstantTag::SwitchDefault => "switch-default sentinel",
            ConstantTag::CallReference => "call-reference sentinel",
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Bool(v) => write!(f, "{}", v),
            ConstantValue::Char(v) => write!(f, "'{}'", v),
            ConstantValue::Short(v) => write!(f, "{}", v),
            ConstantValue::Int(v) => write!(f, "{}", v),
            ConstantValue::Long(v) => write!(f, "{}", v),
            ConstantValue::Float(v) => write!(f, "{}", v),
            ConstantValue::Double(v) => write!(f, "{}", v),
            ConstantValue::Str(v) => write!(f, "\"{}\"", v),
            ConstantValue::Object(v) => write!(f, "{:?}", v),
            ConstantValue::SwitchDefault => write!(f, "<switch default>"),
            ConstantValue::CallReference => write!(f, "<call reference>"),
        }
    }
}

// Snapshot serialization flattens payloads to their natural JSON forms;
// host objects and sentinels render as display strings.
impl Serialize for ConstantValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ConstantValue::Bool(v) => serializer.serialize_bool(*v),
            ConstantValue::Char(v) => serializer.serialize_char(*v),
            ConstantValue::Short(v) => serializer.serialize_i16(*v),
            ConstantValue::Int(v) => serializer.serialize_i32(*v),
            ConstantValue::Long(v) => serializer.serialize_i64(*v),
            ConstantValue::Float(v) => serializer.serialize_f32(*v),
            ConstantValue::Double(v) => serializer.serialize_f64(*v),
            ConstantValue::Str(v) => serializer.serialize_str(v),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl From<bool> for ConstantValue {
    fn from(v: bool) -> Self {
        ConstantValue::Bool(v)
    }
}

impl From<char> for ConstantValue {
    fn from(v: char) -> Self {
        ConstantValue::Char(v)
    }
}

impl From<i16> for ConstantValue {
    fn from(v: i16) -> Self {
        ConstantValue::Short(v)
    }
}

impl From<i32> for ConstantValue {
    fn from(v: i32) -> Self {
        ConstantValue::Int(v)
    }
}

impl From<i64> for ConstantValue {
    fn from(v: i64) -> Self {
        ConstantValue::Long(v)
    }
}

impl From<f32> for ConstantValue {
    fn from(v: f32) -> Self {
        ConstantValue::Float(v)
    }
}

impl From<f64> for ConstantValue {
    fn from(v: f64) -> Self {
        ConstantValue::Double(v)
    }
}

impl From<&str> for ConstantValue {
    // Defensive copy: the wrapped string never aliases caller memory
    fn from(v: &str) -> Self {
        ConstantValue::Str(v.to_string())
    }
}

impl From<String> for ConstantValue {
    fn from(v: String) -> Self {
        ConstantValue::Str(v)
    }
}

impl From<HostObject> for ConstantValue {
    fn from(v: HostObject) -> Self {
        ConstantValue::Object(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_object_equality_is_identity() {
        let a = HostObject::new("payload".to_string());
        let b = HostObject::new("payload".to_string());
        let a2 = a.clone();
        assert_ne!(
            ConstantValue::Object(a.clone()),
            ConstantValue::Object(b.clone())
        );
        assert_eq!(ConstantValue::Object(a), ConstantValue::Object(a2));
    }

    #[test]
    fn test_host_object_downcast() {
        let obj = HostObject::new(vec![1u8, 2, 3]);
        assert_eq!(obj.downcast_ref::<Vec<u8>>(), Some(&vec![1u8, 2, 3]));
        assert!(obj.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_string_constant_copies_input() {
        let mut owned = String::from("hello");
        let value = ConstantValue::from(owned.as_str());
        owned.replace_range(.., "WIPED");
        assert_eq!(value, ConstantValue::Str("hello".to_string()));
    }

    #[test]
    fn test_sentinels_are_distinct() {
        assert_ne!(ConstantValue::SwitchDefault, ConstantValue::CallReference);
        assert_eq!(ConstantValue::SwitchDefault.tag(), ConstantTag::SwitchDefault);
    }
}
