
use crate::{
    codec,
    key::{Key, KeyError},
    wire::{Meaning, Property, PropertyValue},
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ValueError
/// A filter value that cannot be mapped to a wire-typed scalar.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValueError {
    #[error("bad query filter value type: {type_name}")]
    UnsupportedType { type_name: &'static str },

    #[error("bad query filter key value: {0}")]
    InvalidKey(#[from] KeyError),
}

///
/// Value
///
/// Closed set of scalars a filter can compare against.
/// `Blob` is representable so callers holding entity bytes get a typed
/// rejection instead of a silent stringification; it is never indexable.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Key(Key),
    Blob(Vec<u8>),
}

impl Value {
    /// Stable name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
            Self::Key(_) => "key",
            Self::Blob(_) => "blob",
        }
    }

    /// Lower into a named wire property.
    pub fn to_property(&self, name: &str) -> Result<Property, ValueError> {
        let mut value = PropertyValue::default();
        let mut meaning = None;

        match self {
            Self::Bool(v) => value.boolean_value = Some(*v),
            Self::Int(v) => value.int64_value = Some(*v),
            Self::Float(v) => value.double_value = Some(*v),
            Self::Text(v) => value.string_value = Some(v.clone()),
            Self::Timestamp(v) => {
                value.int64_value = Some(v.timestamp_micros());
                meaning = Some(Meaning::GdWhen as i32);
            }
            Self::Key(key) => value.reference_value = Some(codec::key_to_reference_value(key)?),
            Self::Blob(_) => {
                return Err(ValueError::UnsupportedType {
                    type_name: self.type_name(),
                });
            }
        }

        Ok(Property {
            meaning,
            name: name.to_string(),
            multiple: false,
            value,
        })
    }
}

// Literal form used by query display strings.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write_float(f, *v),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Timestamp(v) => write!(
                f,
                "DATETIME('{}')",
                v.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            ),
            Self::Key(key) => match key.try_encode() {
                Ok(encoded) => write!(f, "KEY('{encoded}')"),
                Err(_) => write!(f, "KEY({key})"),
            },
            Self::Blob(bytes) => write!(f, "BLOB({} bytes)", bytes.len()),
        }
    }
}

// Shortest round-trip digits; exponent form (`1e+21`, `1e-05`) outside
// [1e-4, 1e21), whole numbers without a fraction.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("NaN");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "+Inf" } else { "-Inf" });
    }

    let abs = v.abs();
    if abs != 0.0 && !(1e-4..1e21).contains(&abs) {
        let sci = format!("{v:e}");
        if let Some((mantissa, exp)) = sci.split_once('e') {
            let (sign, digits) = exp.strip_prefix('-').map_or(("+", exp), |d| ("-", d));
            return write!(f, "{mantissa}e{sign}{digits:0>2}");
        }
    }

    write!(f, "{v}")
}

macro_rules! impl_from_value {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Text,
    DateTime<Utc> => Timestamp,
    Key => Key,
    Vec<u8> => Blob,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<&Key> for Value {
    fn from(key: &Key) -> Self {
        Self::Key(key.clone())
    }
}
