//! In-memory values accepted by the dispatcher.
//!
//! `Value` is a closed set of shapes (plain data, numeric scalars and arrays,
//! decoded images) plus two open capability variants: [`ToPortable`] for
//! values that know their own portable form and [`WireSerializable`] for
//! values with a wire encoding.

mod array;
mod capability;
mod scalar;

pub use array::NdArray;
pub use capability::{ProstMessage, ToPortable, WireSerializable};
pub use scalar::{ElementType, Native, Scalar};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use image::DynamicImage;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Fixed-size ordered tuple.
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Scalar(Scalar),
    Array(NdArray),
    Image(DynamicImage),
    Portable(Arc<dyn ToPortable>),
    Message(Arc<dyn WireSerializable>),
}

impl Value {
    pub fn array(array: impl Into<NdArray>) -> Self {
        Value::Array(array.into())
    }

    pub fn portable(value: impl ToPortable + 'static) -> Self {
        Value::Portable(Arc::new(value))
    }

    pub fn message(value: impl WireSerializable + 'static) -> Self {
        Value::Message(Arc::new(value))
    }

    /// Wrap a `prost` message.
    pub fn prost<M: prost::Message + 'static>(message: M) -> Self {
        Value::message(ProstMessage(message))
    }

    /// Stable name of the value's type, used in warnings and errors.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "str".to_string(),
            Value::Bytes(_) => "bytes".to_string(),
            Value::Tuple(_) => "tuple".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Map(_) => "map".to_string(),
            Value::Scalar(s) => s.element_type().name().to_string(),
            Value::Array(_) => "ndarray".to_string(),
            Value::Image(_) => "image".to_string(),
            Value::Portable(p) => p.type_name().to_string(),
            Value::Message(m) => m.type_name().to_string(),
        }
    }

    /// Generic textual representation, used when a value has to be written
    /// as text but is not a string.
    pub fn repr(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Value::Scalar(s) => write!(f, "{}", s),
            Value::Array(a) => write!(f, "{}", a),
            Value::Image(img) => write!(
                f,
                "image(width={}, height={}, color={:?})",
                img.width(),
                img.height(),
                img.color()
            ),
            Value::Portable(p) => write!(f, "<{} {:?}>", p.type_name(), p),
            Value::Message(m) => write!(f, "<{} {:?}>", m.type_name(), m),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
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

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        Value::Scalar(v)
    }
}

impl From<NdArray> for Value {
    fn from(v: NdArray) -> Self {
        Value::Array(v)
    }
}

impl From<DynamicImage> for Value {
    fn from(v: DynamicImage) -> Self {
        Value::Image(v)
    }
}

/// Plain JSON data maps onto the matching plain variants. Integers that do
/// not fit `i64` become floats.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(Value::Int(42).type_name(), "int");
        assert_eq!(Value::Str("a".into()).type_name(), "str");
        assert_eq!(Value::Scalar(Scalar::F32(1.0)).type_name(), "float32");
        assert_eq!(
            Value::array(ndarray::arr1(&[1u8, 2])).type_name(),
            "ndarray"
        );
    }

    #[test]
    fn repr_of_plain_values() {
        assert_eq!(Value::Int(42).repr(), "42");
        assert_eq!(Value::Float(1.0).repr(), "1.0");
        assert_eq!(Value::Str("hi".into()).repr(), "\"hi\"");
        assert_eq!(Value::Bytes(b"a\n".to_vec()).repr(), "b\"a\\n\"");
        assert_eq!(Value::Tuple(vec![Value::Int(1)]).repr(), "(1,)");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Null]).repr(),
            "[1, null]"
        );
    }

    #[test]
    fn repr_of_map_and_array() {
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), Value::Bool(true));
        assert_eq!(Value::Map(map).repr(), "{\"k\": true}");
        let a = Value::array(ndarray::Array2::<f64>::zeros((2, 3)));
        assert_eq!(a.repr(), "ndarray(shape=[2, 3], dtype=float64)");
    }

    #[test]
    fn from_json_value() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a": [1, 2.5, "x"], "b": null}"#).unwrap();
        match Value::from(json) {
            Value::Map(map) => {
                match &map["a"] {
                    Value::List(items) => {
                        assert!(matches!(items[0], Value::Int(1)));
                        assert!(matches!(items[1], Value::Float(f) if f == 2.5));
                        assert!(matches!(&items[2], Value::Str(s) if s == "x"));
                    }
                    other => panic!("expected list, got {:?}", other),
                }
                assert!(matches!(map["b"], Value::Null));
            }
            other => panic!("expected map, got {:?}", other),
        }
    }
}
