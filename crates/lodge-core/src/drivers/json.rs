//! JSON text driver.

use ndarray::ArrayViewD;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value as Json};

use crate::error::SaveError;
use crate::options::{JsonOptions, SaveOptions};
use crate::outcome::{Descriptor, Warnings};
use crate::sink::Sink;
use crate::value::{NdArray, Native, Value};

use super::FormatDriver;

pub struct JsonDriver;

impl FormatDriver for JsonDriver {
    fn name(&self) -> &'static str {
        "json"
    }

    fn save(
        &self,
        value: &Value,
        sink: &mut dyn Sink,
        options: &SaveOptions,
        _warnings: &mut Warnings,
    ) -> Result<Descriptor, SaveError> {
        let tree = to_json(value)?;
        write_json(&tree, sink, &options.json)?;
        Ok(Descriptor::new(self.name(), sink.name()))
    }
}

/// Convert a value into a JSON tree.
///
/// Beyond plain data: tuples become arrays, typed scalars become native
/// numbers, arrays become nested arrays and portable values are converted
/// through their portable form. Anything else fails with `Encode`.
pub fn to_json(value: &Value) -> Result<Json, SaveError> {
    match value {
        Value::Null => Ok(Json::Null),
        Value::Bool(b) => Ok(Json::Bool(*b)),
        Value::Int(i) => Ok(Json::from(*i)),
        Value::Float(x) => float(*x),
        Value::Str(s) => Ok(Json::String(s.clone())),
        Value::Tuple(items) | Value::List(items) => items
            .iter()
            .map(to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array),
        Value::Map(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                out.insert(key.clone(), to_json(value)?);
            }
            Ok(Json::Object(out))
        }
        Value::Scalar(s) => match s.to_native() {
            Native::Int(i) => Ok(Json::from(i)),
            Native::Float(x) => float(x),
        },
        Value::Array(array) => array_to_json(array),
        Value::Portable(p) => to_json(&p.to_portable()),
        Value::Bytes(_) | Value::Image(_) | Value::Message(_) => Err(SaveError::Encode {
            type_name: value.type_name(),
        }),
    }
}

fn float(x: f64) -> Result<Json, SaveError> {
    Number::from_f64(x)
        .map(Json::Number)
        .ok_or_else(|| SaveError::Encode {
            type_name: format!("non-finite float ({:?})", x),
        })
}

fn array_to_json(array: &NdArray) -> Result<Json, SaveError> {
    match array {
        NdArray::U8(a) => nested(a.view(), &|v| Ok(Json::from(v))),
        NdArray::I32(a) => nested(a.view(), &|v| Ok(Json::from(v))),
        NdArray::I64(a) => nested(a.view(), &|v| Ok(Json::from(v))),
        NdArray::F32(a) => nested(a.view(), &|v| float(f64::from(v))),
        NdArray::F64(a) => nested(a.view(), &float),
    }
}

fn nested<T, F>(view: ArrayViewD<'_, T>, leaf: &F) -> Result<Json, SaveError>
where
    T: Copy,
    F: Fn(T) -> Result<Json, SaveError>,
{
    if view.ndim() == 0 {
        return match view.iter().next() {
            Some(v) => leaf(*v),
            None => Ok(Json::Null),
        };
    }
    view.outer_iter()
        .map(|sub| nested(sub, leaf))
        .collect::<Result<Vec<_>, _>>()
        .map(Json::Array)
}

fn write_json(tree: &Json, sink: &mut dyn Sink, options: &JsonOptions) -> Result<(), SaveError> {
    if options.compact {
        serde_json::to_writer(&mut *sink, tree)?;
    } else {
        let indent = vec![b' '; options.indent];
        let formatter = PrettyFormatter::with_indent(&indent);
        let mut ser = serde_json::Serializer::with_formatter(&mut *sink, formatter);
        tree.serialize(&mut ser)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::value::{Scalar, ToPortable};
    use ndarray::array;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Debug)]
    struct Point {
        x: i64,
        y: i64,
    }

    impl ToPortable for Point {
        fn to_portable(&self) -> Value {
            Value::Tuple(vec![Value::Int(self.x), Value::Int(self.y)])
        }
    }

    #[test]
    fn converts_arrays_tuples_and_scalars() {
        let mut map = BTreeMap::new();
        map.insert("grid".to_string(), Value::array(array![[1i32, 2], [3, 4]]));
        map.insert("pair".to_string(), Value::Tuple(vec![Value::Int(1), "a".into()]));
        map.insert("lr".to_string(), Value::Scalar(Scalar::F32(0.5)));
        map.insert("steps".to_string(), Value::Scalar(Scalar::I64(10)));
        let tree = to_json(&Value::Map(map)).unwrap();
        assert_eq!(
            tree,
            json!({"grid": [[1, 2], [3, 4]], "pair": [1, "a"], "lr": 0.5, "steps": 10})
        );
    }

    #[test]
    fn converts_portable_recursively() {
        let v = Value::List(vec![Value::portable(Point { x: 3, y: -1 })]);
        assert_eq!(to_json(&v).unwrap(), json!([[3, -1]]));
    }

    #[test]
    fn rejects_unsupported_types() {
        let err = to_json(&Value::Bytes(vec![1, 2])).unwrap_err();
        assert!(matches!(err, SaveError::Encode { ref type_name } if type_name == "bytes"));
        assert!(to_json(&Value::Float(f64::NAN)).is_err());
    }

    #[test]
    fn zero_dim_and_empty_arrays() {
        let scalar = Value::array(ndarray::arr0(2.5f64));
        assert_eq!(to_json(&scalar).unwrap(), json!(2.5));
        let empty = Value::array(ndarray::Array2::<f32>::zeros((0, 3)));
        assert_eq!(to_json(&empty).unwrap(), json!([]));
    }

    #[test]
    fn indent_and_compact() {
        let v = Value::List(vec![Value::Int(1)]);
        let mut sink = MemorySink::new("a.json");
        let mut opts = SaveOptions::default();
        JsonDriver
            .save(&v, &mut sink, &opts, &mut Warnings::new())
            .unwrap();
        assert_eq!(sink.contents(), b"[\n  1\n]");

        opts.json.compact = true;
        let mut sink = MemorySink::new("a.json");
        let d = JsonDriver
            .save(&v, &mut sink, &opts, &mut Warnings::new())
            .unwrap();
        assert_eq!(sink.contents(), b"[1]");
        assert_eq!(d.kind, "json");
        assert_eq!(d.url, "a.json");
    }
}
