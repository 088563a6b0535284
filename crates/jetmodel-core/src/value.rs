//! Raw column values as the Jet driver emits them.
//!
//! The driver does not always hand back the representation a consumer expects:
//! Yes/No columns may arrive as `SmallInt`, GUIDs as `Bytes`, intervals as
//! `DateTime`. `Value` keeps the raw shape so that the adapter's coercion rules can
//! inspect it before deciding how to convert.

use chrono::{NaiveDateTime, TimeDelta};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A raw value read from, or bound to, the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    /// Yes/No
    Bool(bool),
    /// Byte (unsigned 8-bit)
    Byte(u8),
    /// Integer (16-bit)
    SmallInt(i16),
    /// Long Integer (32-bit)
    Int(i32),
    /// Large Number (64-bit)
    BigInt(i64),
    /// Single
    Float(f32),
    /// Double
    Double(f64),
    /// Decimal or Currency, in canonical text form
    Decimal(String),
    /// Text or Memo
    Text(String),
    /// Text exactly as the driver produced it, as UTF-16 code units.
    ///
    /// Drivers use this when the units may not form valid UTF-16, e.g. a Long
    /// Integer boxed as a two-unit string whose halves are lone surrogates.
    Utf16(Vec<u16>),
    /// Binary or OLE Object
    Bytes(Vec<u8>),
    /// Date/Time
    DateTime(NaiveDateTime),
    /// Time interval (never produced by the engine itself)
    TimeSpan(TimeDelta),
    /// Replication ID
    Guid(Uuid),
}

impl Value {
    /// Short type name used in conversion errors.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::SmallInt(_) => "smallint",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Utf16(_) => "utf16",
            Value::Bytes(_) => "bytes",
            Value::DateTime(_) => "datetime",
            Value::TimeSpan(_) => "timespan",
            Value::Guid(_) => "guid",
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::SmallInt(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::BigInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Decimal(s) | Value::Text(s) => f.write_str(s),
            Value::Utf16(units) => f.write_str(&String::from_utf16_lossy(units)),
            Value::Bytes(b) => {
                f.write_str("0x")?;
                for byte in b {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
            Value::DateTime(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            Value::TimeSpan(d) => write!(f, "{d}"),
            Value::Guid(g) => write!(f, "{{{g}}}"),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    u8 => Byte,
    i16 => SmallInt,
    i32 => Int,
    i64 => BigInt,
    f32 => Float,
    f64 => Double,
    String => Text,
    Vec<u8> => Bytes,
    NaiveDateTime => DateTime,
    TimeDelta => TimeSpan,
    Uuid => Guid,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Strict extraction of a Rust value from a raw `Value`.
///
/// These conversions mirror what the driver's own typed getters accept: the variant
/// must match exactly, with no widening or parsing. The adapter's coercion rules
/// run *before* falling back to these.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident as $name:literal),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v.clone()),
                        other => Err(Error::type_mismatch($name, other.type_name())),
                    }
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool as "boolean",
    u8 => Byte as "byte",
    i16 => SmallInt as "smallint",
    i32 => Int as "int",
    i64 => BigInt as "bigint",
    f32 => Float as "float",
    f64 => Double as "double",
    String => Text as "text",
    Vec<u8> => Bytes as "bytes",
    NaiveDateTime => DateTime as "datetime",
    TimeDelta => TimeSpan as "timespan",
    Uuid => Guid as "guid",
}

impl FromValue for char {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(Error::type_mismatch("char", "text")),
                }
            }
            other => Err(Error::type_mismatch("char", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}
