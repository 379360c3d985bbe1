//! Multi-array `.npz` bundle driver.
//!
//! The bundle is assembled in memory and then streamed to the sink, so it
//! works for any sink, not only local files.

use ndarray_npy::NpzWriter;
use std::io::{Cursor, Seek, Write};

use crate::error::SaveError;
use crate::options::SaveOptions;
use crate::outcome::{Descriptor, SaveWarning, Warnings};
use crate::sink::Sink;
use crate::value::{NdArray, Value};

use super::{unsupported, FormatDriver};

const EXPECTED: &str = "a map or sequence of numeric arrays";

/// Mapping keys become member names; sequence members are named `arr_0`,
/// `arr_1`, ... A lone array is bundled as `arr_0` with a warning.
pub struct NpzDriver;

impl FormatDriver for NpzDriver {
    fn name(&self) -> &'static str {
        "npz"
    }

    fn save(
        &self,
        value: &Value,
        sink: &mut dyn Sink,
        _options: &SaveOptions,
        warnings: &mut Warnings,
    ) -> Result<Descriptor, SaveError> {
        let members = members(value, warnings)?;

        let mut npz = NpzWriter::new(Cursor::new(Vec::new()));
        for (name, array) in &members {
            add_member(&mut npz, name, array)?;
        }
        let bytes = npz.finish()?.into_inner();
        sink.write_all(&bytes)?;

        let names = members.into_iter().map(|(name, _)| name).collect();
        Ok(Descriptor::new(self.name(), sink.name()).with_members(names))
    }
}

fn members<'v>(
    value: &'v Value,
    warnings: &mut Warnings,
) -> Result<Vec<(String, &'v NdArray)>, SaveError> {
    match value {
        Value::Map(map) => map
            .iter()
            .map(|(key, member)| as_array(member).map(|array| (key.clone(), array)))
            .collect(),
        Value::List(items) | Value::Tuple(items) => items
            .iter()
            .enumerate()
            .map(|(i, member)| as_array(member).map(|array| (positional_name(i), array)))
            .collect(),
        Value::Array(array) => {
            warnings.raise(SaveWarning::SingleArrayBundle);
            Ok(vec![(positional_name(0), array)])
        }
        other => Err(unsupported("npz", EXPECTED, other)),
    }
}

fn as_array(member: &Value) -> Result<&NdArray, SaveError> {
    match member {
        Value::Array(array) => Ok(array),
        other => Err(unsupported("npz", EXPECTED, other)),
    }
}

fn positional_name(index: usize) -> String {
    format!("arr_{}", index)
}

fn add_member<W: Write + Seek>(
    npz: &mut NpzWriter<W>,
    name: &str,
    array: &NdArray,
) -> Result<(), SaveError> {
    match array {
        NdArray::U8(a) => npz.add_array(name, a)?,
        NdArray::I32(a) => npz.add_array(name, a)?,
        NdArray::I64(a) => npz.add_array(name, a)?,
        NdArray::F32(a) => npz.add_array(name, a)?,
        NdArray::F64(a) => npz.add_array(name, a)?,
    }
    Ok(())
}
