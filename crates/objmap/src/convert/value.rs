//! Scalar, sequence and nested-object value conversion.

use std::sync::Arc;

use crate::core::traits::NestedResolver;
use crate::core::value::{Value, ValueKind};
use crate::error::ConvertError;

/// Converts a single value between two semantic kinds.
///
/// Rules apply in order:
/// 1. identity — the value already has the target kind
/// 2. sequences of mutually convertible element kinds, element-wise
/// 3. numeric/string coercion (widening, truncating, parse/format)
/// 4. object pairs with a registered nested mapper
///
/// `can_convert` is side-effect-free and consistent with `convert`'s
/// success for the same kind pair.
#[derive(Clone, Default)]
pub struct ValueConverter {
    nested: Option<Arc<dyn NestedResolver>>,
}

impl ValueConverter {
    /// Converter without nested-object support.
    pub fn new() -> Self {
        ValueConverter { nested: None }
    }

    /// Converter that delegates object pairs to registered nested mappers.
    pub fn with_resolver(resolver: Arc<dyn NestedResolver>) -> Self {
        ValueConverter {
            nested: Some(resolver),
        }
    }

    /// Check whether values of `from` can be converted into `to`.
    #[must_use]
    pub fn can_convert(&self, from: &ValueKind, to: &ValueKind) -> bool {
        if from == to {
            return true;
        }
        match (from, to) {
            // Nullability is orthogonal to the inner kind; a null value
            // into a non-nullable target still fails at convert time.
            (ValueKind::Nullable(f), ValueKind::Nullable(t)) => self.can_convert(f, t),
            (ValueKind::Nullable(f), to) => self.can_convert(f, to),
            (from, ValueKind::Nullable(t)) => self.can_convert(from, t),
            (ValueKind::Seq(f), ValueKind::Seq(t)) => self.can_convert(f, t),
            (ValueKind::Int, ValueKind::Float | ValueKind::Text)
            | (ValueKind::Float, ValueKind::Int | ValueKind::Text)
            | (ValueKind::Text, ValueKind::Int | ValueKind::Float) => true,
            (ValueKind::Object(f), ValueKind::Object(t)) => match &self.nested {
                Some(resolver) => resolver.can_map(*f, *t),
                None => false,
            },
            _ => false,
        }
    }

    /// Convert `value` into the target kind.
    ///
    /// Fails when the value is null and the target kind is not nullable,
    /// or when no rule applies.
    pub fn convert(
        &self,
        value: Value,
        to: &ValueKind,
    ) -> std::result::Result<Value, ConvertError> {
        match (value, to) {
            // Nullability
            (Value::Null, ValueKind::Nullable(_)) => Ok(Value::Null),
            (Value::Null, to) => Err(ConvertError::NullValue { to: to.to_string() }),
            (value, ValueKind::Nullable(inner)) => self.convert(value, inner),

            // Identity
            (Value::Bool(v), ValueKind::Bool) => Ok(Value::Bool(v)),
            (Value::Int(v), ValueKind::Int) => Ok(Value::Int(v)),
            (Value::Float(v), ValueKind::Float) => Ok(Value::Float(v)),
            (Value::Text(v), ValueKind::Text) => Ok(Value::Text(v)),

            // Sequences, element-wise
            (Value::Seq(items), ValueKind::Seq(elem)) => items
                .into_iter()
                .map(|item| self.convert(item, elem))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Value::Seq),

            // Numeric and string coercion
            (Value::Int(v), ValueKind::Float) => Ok(Value::Float(v as f64)),
            (Value::Int(v), ValueKind::Text) => Ok(Value::Text(v.to_string())),
            // Truncation, not rounding
            (Value::Float(v), ValueKind::Int) => Ok(Value::Int(v as i64)),
            (Value::Float(v), ValueKind::Text) => Ok(Value::Text(v.to_string())),
            (Value::Text(v), ValueKind::Int) => {
                v.trim().parse::<i64>().map(Value::Int).map_err(|_| {
                    ConvertError::Parse {
                        value: v,
                        to: "int".to_string(),
                    }
                })
            }
            (Value::Text(v), ValueKind::Float) => {
                v.trim().parse::<f64>().map(Value::Float).map_err(|_| {
                    ConvertError::Parse {
                        value: v,
                        to: "float".to_string(),
                    }
                })
            }

            // Nested object mapping
            (Value::Object(obj), ValueKind::Object(token)) => {
                if obj.token() == *token {
                    return Ok(Value::Object(obj));
                }
                let mapper = self
                    .nested
                    .as_ref()
                    .and_then(|r| r.resolve(obj.token(), *token))
                    .ok_or_else(|| ConvertError::Unsupported {
                        from: obj.token().name().to_string(),
                        to: token.name().to_string(),
                    })?;
                mapper
                    .map_struct(&*obj)
                    .map(Value::Object)
                    .map_err(|e| ConvertError::Nested(Box::new(e)))
            }

            (value, to) => Err(ConvertError::Unsupported {
                from: value.kind_label(),
                to: to.to_string(),
            }),
        }
    }
}
