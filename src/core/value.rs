//! Tuple value types
//!
//! This module defines the loosely-typed values exchanged with the database.
//! A [`TupleValue`] serializes untagged, so it maps directly onto the
//! MessagePack shapes the driver sends and onto plain JSON.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// Value that can be stored in a tuple field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TupleValue {
    /// Nil value
    #[default]
    Nil,
    /// Boolean value
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer that does not fit in `i64`
    UInt(u64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// String value
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Nested array (a tuple inside a tuple, or a select result)
    Array(Vec<TupleValue>),
    /// Map with arbitrary keys, in wire order
    Map(Vec<(TupleValue, TupleValue)>),
    /// MessagePack extension (Tarantool `decimal`, `uuid`, `datetime`, ...):
    /// type tag and raw payload, passed through undecoded
    Ext(i8, Vec<u8>),
}

/// Newtype name rmp-serde uses to carry extension values
const EXT_STRUCT_NAME: &str = "_ExtStruct";

/// One row, or one request argument list
pub type Tuple = Vec<TupleValue>;

/// Raw data returned by the driver
pub type ResultSet = Vec<TupleValue>;

/// Identifier of a tuple addressed by its string primary key
pub type TupleId = String;

/// Name of an index
pub type IndexName = String;

impl TupleValue {
    /// Get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TupleValue::Bool(v) => Some(*v),
            TupleValue::Int(v) => Some(*v != 0),
            TupleValue::UInt(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Get the value as an i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TupleValue::Int(v) => Some(*v),
            TupleValue::UInt(v) => i64::try_from(*v).ok(),
            TupleValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Get the value as a u64
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            TupleValue::UInt(v) => Some(*v),
            TupleValue::Int(v) => u64::try_from(*v).ok(),
            TupleValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Get the value as an f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TupleValue::Double(v) => Some(*v),
            TupleValue::Float(v) => Some(*v as f64),
            TupleValue::Int(v) => Some(*v as f64),
            TupleValue::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get the value as a string (zero-copy for String values)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TupleValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get the value as bytes (zero-copy)
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TupleValue::Bytes(b) => Some(b),
            TupleValue::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Get the value as a nested array
    pub fn as_array(&self) -> Option<&[TupleValue]> {
        match self {
            TupleValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Check if the value is nil
    pub fn is_nil(&self) -> bool {
        matches!(self, TupleValue::Nil)
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            TupleValue::Nil => "nil",
            TupleValue::Bool(_) => "bool",
            TupleValue::Int(_) => "int",
            TupleValue::UInt(_) => "uint",
            TupleValue::Float(_) => "float",
            TupleValue::Double(_) => "double",
            TupleValue::String(_) => "string",
            TupleValue::Bytes(_) => "bytes",
            TupleValue::Array(_) => "array",
            TupleValue::Map(_) => "map",
            TupleValue::Ext(..) => "ext",
        }
    }

    /// Convert into a JSON value. Binary data becomes an array of numbers,
    /// non-string map keys are rendered with their JSON text.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            TupleValue::Nil => Value::Null,
            TupleValue::Bool(v) => Value::Bool(*v),
            TupleValue::Int(v) => Value::from(*v),
            TupleValue::UInt(v) => Value::from(*v),
            TupleValue::Float(v) => Value::from(*v as f64),
            TupleValue::Double(v) => Value::from(*v),
            TupleValue::String(s) => Value::String(s.clone()),
            TupleValue::Bytes(b) => Value::Array(b.iter().map(|x| Value::from(*x)).collect()),
            TupleValue::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            TupleValue::Map(entries) => {
                let mut map = serde_json::Map::with_capacity(entries.len());
                for (k, v) in entries {
                    let key = match k {
                        TupleValue::String(s) => s.clone(),
                        other => other.to_json().to_string(),
                    };
                    map.insert(key, v.to_json());
                }
                Value::Object(map)
            }
            TupleValue::Ext(tag, data) => Value::Array(vec![
                Value::from(*tag),
                Value::Array(data.iter().map(|x| Value::from(*x)).collect()),
            ]),
        }
    }
}

impl fmt::Display for TupleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TupleValue::String(s) => write!(f, "{}", s),
            TupleValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            TupleValue::Ext(tag, data) => write!(f, "<ext {}: {} bytes>", tag, data.len()),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<bool> for TupleValue {
    fn from(v: bool) -> Self {
        TupleValue::Bool(v)
    }
}

impl From<i32> for TupleValue {
    fn from(v: i32) -> Self {
        TupleValue::Int(v as i64)
    }
}

impl From<i64> for TupleValue {
    fn from(v: i64) -> Self {
        TupleValue::Int(v)
    }
}

impl From<u32> for TupleValue {
    fn from(v: u32) -> Self {
        TupleValue::Int(v as i64)
    }
}

impl From<u64> for TupleValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(small) => TupleValue::Int(small),
            Err(_) => TupleValue::UInt(v),
        }
    }
}

impl From<f32> for TupleValue {
    fn from(v: f32) -> Self {
        TupleValue::Float(v)
    }
}

impl From<f64> for TupleValue {
    fn from(v: f64) -> Self {
        TupleValue::Double(v)
    }
}

impl From<String> for TupleValue {
    fn from(v: String) -> Self {
        TupleValue::String(v)
    }
}

impl From<&str> for TupleValue {
    fn from(v: &str) -> Self {
        TupleValue::String(v.to_string())
    }
}

impl From<&String> for TupleValue {
    fn from(v: &String) -> Self {
        TupleValue::String(v.clone())
    }
}

impl From<Vec<u8>> for TupleValue {
    fn from(v: Vec<u8>) -> Self {
        TupleValue::Bytes(v)
    }
}

impl From<Vec<TupleValue>> for TupleValue {
    fn from(v: Vec<TupleValue>) -> Self {
        TupleValue::Array(v)
    }
}

impl<T: Into<TupleValue>> From<Option<T>> for TupleValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => TupleValue::Nil,
        }
    }
}

impl From<serde_json::Value> for TupleValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => TupleValue::Nil,
            Value::Bool(b) => TupleValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    TupleValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    TupleValue::UInt(u)
                } else {
                    TupleValue::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => TupleValue::String(s),
            Value::Array(items) => TupleValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => TupleValue::Map(
                map.into_iter()
                    .map(|(k, v)| (TupleValue::String(k), v.into()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for TupleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TupleValue::Nil => serializer.serialize_unit(),
            TupleValue::Bool(v) => serializer.serialize_bool(*v),
            TupleValue::Int(v) => serializer.serialize_i64(*v),
            TupleValue::UInt(v) => serializer.serialize_u64(*v),
            TupleValue::Float(v) => serializer.serialize_f32(*v),
            TupleValue::Double(v) => serializer.serialize_f64(*v),
            TupleValue::String(s) => serializer.serialize_str(s),
            TupleValue::Bytes(b) => serializer.serialize_bytes(b),
            TupleValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            TupleValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            TupleValue::Ext(tag, data) => serializer.serialize_newtype_struct(
                EXT_STRUCT_NAME,
                &(*tag, serde_bytes::Bytes::new(data)),
            ),
        }
    }
}

struct TupleValueVisitor;

impl<'de> Visitor<'de> for TupleValueVisitor {
    type Value = TupleValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any MessagePack-compatible value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<TupleValue, E> {
        Ok(TupleValue::Nil)
    }

    fn visit_none<E: de::Error>(self) -> Result<TupleValue, E> {
        Ok(TupleValue::Nil)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<TupleValue, D::Error> {
        TupleValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<TupleValue, E> {
        Ok(TupleValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<TupleValue, E> {
        Ok(TupleValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<TupleValue, E> {
        Ok(TupleValue::from(v))
    }

    fn visit_f32<E: de::Error>(self, v: f32) -> Result<TupleValue, E> {
        Ok(TupleValue::Float(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<TupleValue, E> {
        Ok(TupleValue::Double(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<TupleValue, E> {
        Ok(TupleValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<TupleValue, E> {
        Ok(TupleValue::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<TupleValue, E> {
        Ok(TupleValue::Bytes(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<TupleValue, E> {
        Ok(TupleValue::Bytes(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<TupleValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(TupleValue::Array(items))
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<TupleValue, D::Error> {
        let (tag, data): (i8, serde_bytes::ByteBuf) = Deserialize::deserialize(deserializer)?;
        Ok(TupleValue::Ext(tag, data.into_vec()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TupleValue, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry()? {
            entries.push(entry);
        }
        Ok(TupleValue::Map(entries))
    }
}

impl<'de> Deserialize<'de> for TupleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TupleValueVisitor)
    }
}

/// Build a [`Tuple`] from heterogeneous values
///
/// ```
/// use tarantool_api::{tuple, TupleValue};
///
/// let row = tuple!["id-1", 42, true];
/// assert_eq!(row[1], TupleValue::Int(42));
/// ```
#[macro_export]
macro_rules! tuple {
    () => {
        ::std::vec::Vec::<$crate::core::value::TupleValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::core::value::TupleValue::from($value)),+]
    };
}
