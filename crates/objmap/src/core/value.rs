//! Runtime value model for member transfer.
//!
//! [`Value`] is the dynamic representation moved between member accessors,
//! and [`ValueKind`] is its static type descriptor recorded in accessor
//! tables. [`MapValue`] connects concrete field types to both.

use std::fmt;

use crate::core::member::{StructValue, TypeToken};
use crate::error::ConvertError;

/// Static type descriptor for a member.
///
/// Sequences reference their element kind; object members carry a
/// [`TypeToken`] giving access to the nested type's member table without
/// an instance.
#[derive(Clone, Copy, PartialEq)]
pub enum ValueKind {
    Bool,
    /// 64-bit signed integer (the canonical integer width; narrower field
    /// widths are range-checked on write).
    Int,
    /// 64-bit floating point.
    Float,
    Text,
    /// Homogeneous sequence of the referenced element kind.
    Seq(&'static ValueKind),
    /// Nested mappable object.
    Object(TypeToken),
    /// Nullable member (an `Option` field) of the referenced kind; null
    /// is a legal value only for members of this kind.
    Nullable(&'static ValueKind),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Int => write!(f, "int"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::Text => write!(f, "text"),
            ValueKind::Seq(elem) => write!(f, "[{}]", elem),
            ValueKind::Object(token) => write!(f, "{}", token.name()),
            ValueKind::Nullable(inner) => write!(f, "{}?", inner),
        }
    }
}

impl fmt::Debug for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Dynamic value transferred between members.
///
/// Scalars are owned; sequences are element vectors; nested objects are
/// boxed behind [`StructValue`] so converters can walk and re-map them
/// without knowing the concrete type.
pub enum Value {
    /// Absent value (an unset `Option` member).
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Seq(Vec<Value>),
    Object(Box<dyn StructValue>),
}

impl Value {
    /// Check if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short label for diagnostics.
    #[must_use]
    pub fn kind_label(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Text(_) => "text".to_string(),
            Value::Seq(_) => "seq".to_string(),
            Value::Object(obj) => obj.token().name().to_string(),
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(*v),
            Value::Int(v) => Value::Int(*v),
            Value::Float(v) => Value::Float(*v),
            Value::Text(v) => Value::Text(v.clone()),
            Value::Seq(v) => Value::Seq(v.clone()),
            Value::Object(v) => Value::Object(v.clone_box()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Text(v) => write!(f, "Text({:?})", v),
            Value::Seq(v) => f.debug_tuple("Seq").field(v).finish(),
            Value::Object(v) => write!(f, "Object({})", v.token().name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.token() == b.token()
                    && a.token()
                        .members()
                        .iter()
                        .all(|m| a.get_member(m.name) == b.get_member(m.name))
            }
            _ => false,
        }
    }
}

// Convenience constructors for common cases
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// Bridge between a concrete field type and the dynamic [`Value`] model.
///
/// Accessor tables generated by [`crate::mappable!`] use this trait for
/// both the declared [`ValueKind`] and the get/set conversions.
pub trait MapValue: Sized {
    /// Declared kind recorded in the member table.
    const KIND: ValueKind;

    /// Read the field into a dynamic value.
    fn to_value(&self) -> Value;

    /// Write a dynamic value back into the field type.
    ///
    /// The value has already been coerced to [`Self::KIND`] by the value
    /// converter; only exact-shape values (plus int-to-float widening and
    /// range-checked narrowing) are accepted here.
    fn from_value(value: Value) -> std::result::Result<Self, ConvertError>;
}

impl MapValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConvertError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(ConvertError::Mismatch {
                expected: "bool".to_string(),
                actual: other.kind_label(),
            }),
        }
    }
}

impl MapValue for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConvertError> {
        match value {
            Value::Int(v) => Ok(v),
            other => Err(ConvertError::Mismatch {
                expected: "int".to_string(),
                actual: other.kind_label(),
            }),
        }
    }
}

macro_rules! narrow_int_value {
    ($($ty:ty),*) => {
        $(
            impl MapValue for $ty {
                const KIND: ValueKind = ValueKind::Int;

                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }

                fn from_value(value: Value) -> std::result::Result<Self, ConvertError> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(v).map_err(|_| ConvertError::Overflow {
                            value: v,
                            to: stringify!($ty),
                        }),
                        other => Err(ConvertError::Mismatch {
                            expected: "int".to_string(),
                            actual: other.kind_label(),
                        }),
                    }
                }
            }
        )*
    };
}

narrow_int_value!(i16, i32, u16, u32);

impl MapValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConvertError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            other => Err(ConvertError::Mismatch {
                expected: "float".to_string(),
                actual: other.kind_label(),
            }),
        }
    }
}

impl MapValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConvertError> {
        match value {
            Value::Float(v) => Ok(v as f32),
            Value::Int(v) => Ok(v as f32),
            other => Err(ConvertError::Mismatch {
                expected: "float".to_string(),
                actual: other.kind_label(),
            }),
        }
    }
}

impl MapValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConvertError> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(ConvertError::Mismatch {
                expected: "text".to_string(),
                actual: other.kind_label(),
            }),
        }
    }
}

impl<T: MapValue> MapValue for Vec<T> {
    const KIND: ValueKind = ValueKind::Seq(&T::KIND);

    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(MapValue::to_value).collect())
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConvertError> {
        match value {
            Value::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ConvertError::Mismatch {
                expected: format!("[{}]", T::KIND),
                actual: other.kind_label(),
            }),
        }
    }
}

impl<T: MapValue> MapValue for Option<T> {
    const KIND: ValueKind = ValueKind::Nullable(&T::KIND);

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConvertError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(42).is_null());
    }

    #[test]
    fn test_scalar_round_trip() {
        assert_eq!(i64::from_value(42i64.to_value()).unwrap(), 42);
        assert_eq!(String::from_value("a".to_string().to_value()).unwrap(), "a");
        assert_eq!(f64::from_value(1.5f64.to_value()).unwrap(), 1.5);
    }

    #[test]
    fn test_narrow_int_overflow() {
        let err = i16::from_value(Value::Int(100_000)).unwrap_err();
        assert!(matches!(err, ConvertError::Overflow { value: 100_000, .. }));
    }

    #[test]
    fn test_option_null_round_trip() {
        assert_eq!(Option::<i64>::from_value(Value::Null).unwrap(), None);
        assert_eq!(None::<i64>.to_value(), Value::Null);
        assert_eq!(Some(3i64).to_value(), Value::Int(3));
    }

    #[test]
    fn test_seq_kind_display() {
        assert_eq!(Vec::<i64>::KIND.to_string(), "[int]");
        assert_eq!(ValueKind::Text.to_string(), "text");
        assert_eq!(Option::<String>::KIND.to_string(), "text?");
    }

    #[test]
    fn test_option_kind_is_nullable() {
        assert_eq!(Option::<i64>::KIND, ValueKind::Nullable(&ValueKind::Int));
        assert_ne!(Option::<i64>::KIND, ValueKind::Int);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = bool::from_value(Value::Int(1)).unwrap_err();
        assert!(matches!(err, ConvertError::Mismatch { .. }));
    }
}
