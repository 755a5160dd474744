//! Parameter kinds and the typed values produced by coercion.

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Canonical rendering for [`Value::DateTime`].
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// The declared type of a command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    String,
    Int16,
    Int32,
    Int64,
    UInt16,
    UInt32,
    UInt64,
    Byte,
    Boolean,
    Char,
    DateTime,
    Decimal,
    Single,
    Double,
    /// A parameter type with no coercion rule, named for diagnostics.
    Opaque(&'static str),
}

impl ParamKind {
    /// Type name shown in help output and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Int16 => "int16",
            ParamKind::Int32 => "int32",
            ParamKind::Int64 => "int64",
            ParamKind::UInt16 => "uint16",
            ParamKind::UInt32 => "uint32",
            ParamKind::UInt64 => "uint64",
            ParamKind::Byte => "byte",
            ParamKind::Boolean => "bool",
            ParamKind::Char => "char",
            ParamKind::DateTime => "datetime",
            ParamKind::Decimal => "decimal",
            ParamKind::Single => "single",
            ParamKind::Double => "double",
            ParamKind::Opaque(name) => name,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A coerced argument value, tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Byte(u8),
    Boolean(bool),
    Char(char),
    DateTime(NaiveDateTime),
    Decimal(Decimal),
    Single(f32),
    Double(f64),
}

impl Value {
    pub fn kind(&self) -> ParamKind {
        match self {
            Value::String(_) => ParamKind::String,
            Value::Int16(_) => ParamKind::Int16,
            Value::Int32(_) => ParamKind::Int32,
            Value::Int64(_) => ParamKind::Int64,
            Value::UInt16(_) => ParamKind::UInt16,
            Value::UInt32(_) => ParamKind::UInt32,
            Value::UInt64(_) => ParamKind::UInt64,
            Value::Byte(_) => ParamKind::Byte,
            Value::Boolean(_) => ParamKind::Boolean,
            Value::Char(_) => ParamKind::Char,
            Value::DateTime(_) => ParamKind::DateTime,
            Value::Decimal(_) => ParamKind::Decimal,
            Value::Single(_) => ParamKind::Single,
            Value::Double(_) => ParamKind::Double,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) => f.write_str(v),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::UInt16(v) => write!(f, "{v}"),
            Value::UInt32(v) => write!(f, "{v}"),
            Value::UInt64(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::DateTime(v) => write!(f, "{}", v.format(DATE_TIME_FORMAT)),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Single(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// Conversion from a bound [`Value`] into a concrete Rust type.
pub trait FromValue: Sized {
    /// Kind a value must carry to convert into `Self`.
    const KIND: ParamKind;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! value_conversions {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl FromValue for $ty {
                const KIND: ParamKind = ParamKind::$variant;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

value_conversions! {
    String => String,
    Int16 => i16,
    Int32 => i32,
    Int64 => i64,
    UInt16 => u16,
    UInt32 => u32,
    UInt64 => u64,
    Byte => u8,
    Boolean => bool,
    Char => char,
    DateTime => NaiveDateTime,
    Decimal => Decimal,
    Single => f32,
    Double => f64,
}
