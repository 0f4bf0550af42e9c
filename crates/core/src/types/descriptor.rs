//! Per-type operation table
//!
//! Every concrete [`VarType`] has one static [`TypeDescriptor`] holding the
//! operations the registry needs on cells of that type: construct, copy,
//! destruct, parse, format, equality and clamping. An extra descriptor backs
//! [`VarType::Invalid`] so lookups never fail.

use cvarkit_sdk::{Color, QAngle, VarType, Vector2, Vector3, Vector4};

use super::parse::{
    format_color, format_components, format_float, parse_bool, parse_color, parse_components,
    parse_float, parse_int, ParseError,
};
use super::value::Value;

/// Operation table for one value type
pub struct TypeDescriptor {
    var_type: VarType,
    default_text: &'static str,
    size: usize,
    construct_fn: fn() -> Value,
    parse_fn: fn(&str) -> Result<Value, ParseError>,
    format_fn: fn(&Value) -> String,
    clamp_fn: fn(&mut Value, Option<&Value>, Option<&Value>),
}

impl TypeDescriptor {
    /// Type this descriptor describes
    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    /// Display name of the type
    pub fn name(&self) -> &'static str {
        self.var_type.name()
    }

    /// Text that parses to the type's global default
    pub fn default_text(&self) -> &'static str {
        self.default_text
    }

    /// In-memory size of the Rust type backing a cell
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the type is a fixed-size scalar
    pub fn is_primitive(&self) -> bool {
        self.var_type.is_primitive()
    }

    /// Produce a fresh cell holding the type's global default
    pub fn construct(&self) -> Value {
        (self.construct_fn)()
    }

    /// Copy `src` into `dst`, reusing `dst`'s storage where possible
    ///
    /// Cells of another type are left untouched.
    pub fn copy(&self, dst: &mut Value, src: &Value) {
        if src.var_type() == self.var_type {
            dst.clone_from(src);
        }
    }

    /// Release any owned storage, leaving the default in place
    pub fn destruct(&self, cell: &mut Value) {
        *cell = self.construct();
    }

    /// Parse text into a cell of this type
    pub fn parse(&self, text: &str) -> Result<Value, ParseError> {
        (self.parse_fn)(text)
    }

    /// Format a cell as text
    pub fn format(&self, cell: &Value) -> String {
        (self.format_fn)(cell)
    }

    /// Value equality, as used to decide whether callbacks fire
    ///
    /// NaN compares equal to NaN, so rewriting the same value stays a no-op.
    pub fn equal(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Float32(a), Value::Float32(b)) => float_eq(*a as f64, *b as f64),
            (Value::Float64(a), Value::Float64(b)) => float_eq(*a, *b),
            (Value::Vector2(a), Value::Vector2(b)) => components_eq(&a.to_array(), &b.to_array()),
            (Value::Vector3(a), Value::Vector3(b)) => components_eq(&a.to_array(), &b.to_array()),
            (Value::Vector4(a), Value::Vector4(b)) => components_eq(&a.to_array(), &b.to_array()),
            (Value::QAngle(a), Value::QAngle(b)) => components_eq(&a.to_array(), &b.to_array()),
            _ => a == b,
        }
    }

    /// Clamp a cell into `[min, max]`, componentwise for aggregates
    pub fn clamp(&self, cell: &mut Value, min: Option<&Value>, max: Option<&Value>) {
        (self.clamp_fn)(cell, min, max)
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("var_type", &self.var_type)
            .field("default_text", &self.default_text)
            .finish()
    }
}

/// Look up the descriptor for a type
///
/// `VarType::Invalid` yields the invalid descriptor rather than failing.
pub fn descriptor(ty: VarType) -> &'static TypeDescriptor {
    match ty.index() {
        Some(i) => &DESCRIPTORS[i],
        None => &INVALID_DESCRIPTOR,
    }
}

fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn components_eq(a: &[f32], b: &[f32]) -> bool {
    a.iter()
        .zip(b)
        .all(|(a, b)| float_eq(*a as f64, *b as f64))
}

fn clamp_scalar<T: PartialOrd + Copy>(v: &mut T, min: Option<T>, max: Option<T>) {
    // Unordered (NaN) values fail every comparison; pin them to a bound
    if (*v).partial_cmp(&*v).is_none() {
        if let Some(bound) = min.or(max) {
            *v = bound;
        }
        return;
    }
    if let Some(min) = min {
        if *v < min {
            *v = min;
        }
    }
    if let Some(max) = max {
        if *v > max {
            *v = max;
        }
    }
}

fn clamp_array<T: PartialOrd + Copy, const N: usize>(
    v: &mut [T; N],
    min: Option<[T; N]>,
    max: Option<[T; N]>,
) {
    for i in 0..N {
        clamp_scalar(&mut v[i], min.map(|m| m[i]), max.map(|m| m[i]));
    }
}

macro_rules! scalar_descriptor {
    ($variant:ident, $ty:ty, $default:literal, $parse:expr, $format:expr) => {
        TypeDescriptor {
            var_type: VarType::$variant,
            default_text: $default,
            size: std::mem::size_of::<$ty>(),
            construct_fn: || Value::$variant(<$ty>::default()),
            parse_fn: |text| ($parse)(text).map(Value::$variant),
            format_fn: |cell| match cell {
                Value::$variant(v) => ($format)(*v),
                _ => String::new(),
            },
            clamp_fn: |cell, min, max| {
                let pick = |bound: Option<&Value>| match bound {
                    Some(Value::$variant(b)) => Some(*b),
                    _ => None,
                };
                if let Value::$variant(v) = cell {
                    clamp_scalar(v, pick(min), pick(max));
                }
            },
        }
    };
}

macro_rules! vector_descriptor {
    ($variant:ident, $ty:ident, $n:literal, $default:literal) => {
        TypeDescriptor {
            var_type: VarType::$variant,
            default_text: $default,
            size: std::mem::size_of::<$ty>(),
            construct_fn: || Value::$variant($ty::default()),
            parse_fn: |text| {
                parse_components::<$n>(VarType::$variant, text)
                    .map(|c| Value::$variant($ty::from_array(c)))
            },
            format_fn: |cell| match cell {
                Value::$variant(v) => format_components(&v.to_array()),
                _ => String::new(),
            },
            clamp_fn: |cell, min, max| {
                let pick = |bound: Option<&Value>| match bound {
                    Some(Value::$variant(b)) => Some(b.to_array()),
                    _ => None,
                };
                if let Value::$variant(v) = cell {
                    let mut c = v.to_array();
                    clamp_array(&mut c, pick(min), pick(max));
                    *v = $ty::from_array(c);
                }
            },
        }
    };
}

static DESCRIPTORS: [TypeDescriptor; VarType::COUNT] = [
    scalar_descriptor!(Bool, bool, "false", parse_bool, |v: bool| v.to_string()),
    scalar_descriptor!(
        Int16,
        i16,
        "0",
        |t| parse_int::<i16>(VarType::Int16, t),
        |v: i16| v.to_string()
    ),
    scalar_descriptor!(
        UInt16,
        u16,
        "0",
        |t| parse_int::<u16>(VarType::UInt16, t),
        |v: u16| v.to_string()
    ),
    scalar_descriptor!(
        Int32,
        i32,
        "0",
        |t| parse_int::<i32>(VarType::Int32, t),
        |v: i32| v.to_string()
    ),
    scalar_descriptor!(
        UInt32,
        u32,
        "0",
        |t| parse_int::<u32>(VarType::UInt32, t),
        |v: u32| v.to_string()
    ),
    scalar_descriptor!(
        Int64,
        i64,
        "0",
        |t| parse_int::<i64>(VarType::Int64, t),
        |v: i64| v.to_string()
    ),
    scalar_descriptor!(
        UInt64,
        u64,
        "0",
        |t| parse_int::<u64>(VarType::UInt64, t),
        |v: u64| v.to_string()
    ),
    scalar_descriptor!(
        Float32,
        f32,
        "0",
        |t| parse_float::<f32>(VarType::Float32, t),
        format_float::<f32>
    ),
    scalar_descriptor!(
        Float64,
        f64,
        "0",
        |t| parse_float::<f64>(VarType::Float64, t),
        format_float::<f64>
    ),
    TypeDescriptor {
        var_type: VarType::String,
        default_text: "",
        size: std::mem::size_of::<String>(),
        construct_fn: || Value::String(String::new()),
        parse_fn: |text| Ok(Value::String(text.to_string())),
        format_fn: |cell| match cell {
            Value::String(s) => s.clone(),
            _ => String::new(),
        },
        clamp_fn: |_, _, _| {},
    },
    TypeDescriptor {
        var_type: VarType::Color,
        default_text: "0 0 0 255",
        size: std::mem::size_of::<Color>(),
        construct_fn: || Value::Color(Color::default()),
        parse_fn: |text| parse_color(text).map(|c| Value::Color(Color::from_array(c))),
        format_fn: |cell| match cell {
            Value::Color(c) => format_color(c.to_array()),
            _ => String::new(),
        },
        clamp_fn: |cell, min, max| {
            let pick = |bound: Option<&Value>| match bound {
                Some(Value::Color(b)) => Some(b.to_array()),
                _ => None,
            };
            if let Value::Color(v) = cell {
                let mut c = v.to_array();
                clamp_array(&mut c, pick(min), pick(max));
                *v = Color::from_array(c);
            }
        },
    },
    vector_descriptor!(Vector2, Vector2, 2, "0 0"),
    vector_descriptor!(Vector3, Vector3, 3, "0 0 0"),
    vector_descriptor!(Vector4, Vector4, 4, "0 0 0 0"),
    vector_descriptor!(QAngle, QAngle, 3, "0 0 0"),
];

/// Backs records of unknown type: an empty cell that formats as empty text
static INVALID_DESCRIPTOR: TypeDescriptor = TypeDescriptor {
    var_type: VarType::Invalid,
    default_text: "",
    size: 0,
    construct_fn: || Value::String(String::new()),
    parse_fn: |_| Err(ParseError::InvalidType),
    format_fn: |_| String::new(),
    clamp_fn: |_, _, _| {},
};
