//! Tagged value storage and the typed-value trait

use cvarkit_sdk::{Color, QAngle, VarType, Vector2, Vector3, Vector4};

/// A single variable value, tagged with its type
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Color(Color),
    Vector2(Vector2),
    Vector3(Vector3),
    Vector4(Vector4),
    QAngle(QAngle),
}

impl Value {
    /// Type tag of this value
    pub fn var_type(&self) -> VarType {
        match self {
            Self::Bool(_) => VarType::Bool,
            Self::Int16(_) => VarType::Int16,
            Self::UInt16(_) => VarType::UInt16,
            Self::Int32(_) => VarType::Int32,
            Self::UInt32(_) => VarType::UInt32,
            Self::Int64(_) => VarType::Int64,
            Self::UInt64(_) => VarType::UInt64,
            Self::Float32(_) => VarType::Float32,
            Self::Float64(_) => VarType::Float64,
            Self::String(_) => VarType::String,
            Self::Color(_) => VarType::Color,
            Self::Vector2(_) => VarType::Vector2,
            Self::Vector3(_) => VarType::Vector3,
            Self::Vector4(_) => VarType::Vector4,
            Self::QAngle(_) => VarType::QAngle,
        }
    }

    /// Numeric view of a primitive value as a signed integer
    fn as_i64(&self) -> Option<i64> {
        Some(match *self {
            Self::Bool(v) => v as i64,
            Self::Int16(v) => v as i64,
            Self::UInt16(v) => v as i64,
            Self::Int32(v) => v as i64,
            Self::UInt32(v) => v as i64,
            Self::Int64(v) => v,
            Self::UInt64(v) => v as i64,
            Self::Float32(v) => v as i64,
            Self::Float64(v) => v as i64,
            _ => return None,
        })
    }

    /// Numeric view of a primitive value as a float
    fn as_f64(&self) -> Option<f64> {
        Some(match *self {
            Self::Float32(v) => v as f64,
            Self::Float64(v) => v,
            Self::UInt64(v) => v as f64,
            _ => self.as_i64()? as f64,
        })
    }

    /// Convert between primitive types with C-style cast semantics
    ///
    /// Returns `None` when either side is not primitive.
    pub fn convert_primitive(&self, target: VarType) -> Option<Value> {
        if !self.var_type().is_primitive() {
            return None;
        }
        if self.var_type() == target {
            return Some(self.clone());
        }

        let is_float = matches!(self, Self::Float32(_) | Self::Float64(_));
        Some(match target {
            VarType::Bool => Value::Bool(if is_float {
                self.as_f64()? != 0.0
            } else {
                self.as_i64()? != 0
            }),
            VarType::Int16 => Value::Int16(self.as_i64()? as i16),
            VarType::UInt16 => Value::UInt16(self.as_i64()? as u16),
            VarType::Int32 => Value::Int32(self.as_i64()? as i32),
            VarType::UInt32 => Value::UInt32(self.as_i64()? as u32),
            VarType::Int64 => Value::Int64(self.as_i64()?),
            VarType::UInt64 => match *self {
                Self::Float32(v) => Value::UInt64(v as u64),
                Self::Float64(v) => Value::UInt64(v as u64),
                _ => Value::UInt64(self.as_i64()? as u64),
            },
            VarType::Float32 => Value::Float32(self.as_f64()? as f32),
            VarType::Float64 => Value::Float64(self.as_f64()?),
            _ => return None,
        })
    }
}

/// Types that can be stored in a console variable
///
/// Implemented for every concrete [`VarType`]. `Default` must yield the
/// type's global default (the value parsed from its default text).
pub trait ConVarValue: Clone + Default + Send + Sync + 'static {
    /// Type tag this Rust type maps to
    const VAR_TYPE: VarType;

    /// Wrap into a tagged value
    fn into_value(self) -> Value;

    /// Extract from a tagged value of the same type
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_convar_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl ConVarValue for $ty {
                const VAR_TYPE: VarType = VarType::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )+
    };
}

impl_convar_value! {
    bool => Bool,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Color => Color,
    Vector2 => Vector2,
    Vector3 => Vector3,
    Vector4 => Vector4,
    QAngle => QAngle,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_tags() {
        assert_eq!(Value::Bool(true).var_type(), VarType::Bool);
        assert_eq!(Value::from("x").var_type(), VarType::String);
        assert_eq!(Value::from(Color::rgb(1, 2, 3)).var_type(), VarType::Color);
        assert_eq!(<QAngle as ConVarValue>::VAR_TYPE, VarType::QAngle);
    }

    #[test]
    fn test_convert_primitive() {
        assert_eq!(
            Value::Float32(3.7).convert_primitive(VarType::Int32),
            Some(Value::Int32(3))
        );
        assert_eq!(
            Value::Int32(0).convert_primitive(VarType::Bool),
            Some(Value::Bool(false))
        );
        assert_eq!(
            Value::Float64(0.5).convert_primitive(VarType::Bool),
            Some(Value::Bool(true))
        );
        assert_eq!(
            Value::Bool(true).convert_primitive(VarType::Float64),
            Some(Value::Float64(1.0))
        );
        assert_eq!(Value::from("1").convert_primitive(VarType::Int32), None);
        assert_eq!(Value::Int32(1).convert_primitive(VarType::String), None);
    }

    #[test]
    fn test_from_value_type_check() {
        assert_eq!(i32::from_value(&Value::Int32(5)), Some(5));
        assert_eq!(i32::from_value(&Value::Int64(5)), None);
        assert_eq!(
            String::from_value(&Value::from("hello")),
            Some("hello".to_string())
        );
    }
}
