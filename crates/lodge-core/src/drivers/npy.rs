//! Single-array `.npy` driver.

use ndarray_npy::WriteNpyExt;
use std::io::Write;

use crate::error::SaveError;
use crate::options::SaveOptions;
use crate::outcome::{Descriptor, Warnings};
use crate::sink::Sink;
use crate::value::{NdArray, Value};

use super::{unsupported, FormatDriver};

/// Writes one array in numpy's native binary layout. No implicit conversion:
/// the value must already be an array.
pub struct NpyDriver;

impl FormatDriver for NpyDriver {
    fn name(&self) -> &'static str {
        "npy"
    }

    fn save(
        &self,
        value: &Value,
        sink: &mut dyn Sink,
        _options: &SaveOptions,
        _warnings: &mut Warnings,
    ) -> Result<Descriptor, SaveError> {
        let array = match value {
            Value::Array(array) => array,
            other => return Err(unsupported(self.name(), "a numeric array", other)),
        };
        write_npy(array, &mut *sink)?;
        Ok(Descriptor::new(self.name(), sink.name()).with_shape(array.shape().to_vec()))
    }
}

pub(crate) fn write_npy<W: Write>(array: &NdArray, writer: W) -> Result<(), SaveError> {
    match array {
        NdArray::U8(a) => a.write_npy(writer)?,
        NdArray::I32(a) => a.write_npy(writer)?,
        NdArray::I64(a) => a.write_npy(writer)?,
        NdArray::F32(a) => a.write_npy(writer)?,
        NdArray::F64(a) => a.write_npy(writer)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use ndarray::{array, ArrayD};
    use ndarray_npy::ReadNpyExt;
    use std::io::Cursor;

    #[test]
    fn writes_npy_and_reports_shape() {
        let mut sink = MemorySink::new("w.npy");
        let value = Value::array(array![[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let d = NpyDriver
            .save(&value, &mut sink, &SaveOptions::default(), &mut Warnings::new())
            .unwrap();
        assert_eq!(d.kind, "npy");
        assert_eq!(d.shape, Some(vec![2, 3]));
        assert!(sink.contents().starts_with(b"\x93NUMPY"));

        let back = ArrayD::<f64>::read_npy(Cursor::new(sink.contents())).unwrap();
        assert_eq!(back.shape(), &[2, 3]);
        assert_eq!(back.iter().copied().sum::<f64>(), 21.0);
    }

    #[test]
    fn rejects_non_arrays() {
        let mut sink = MemorySink::new("w.npy");
        let err = NpyDriver
            .save(
                &Value::List(vec![Value::Int(1)]),
                &mut sink,
                &SaveOptions::default(),
                &mut Warnings::new(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SaveError::UnsupportedValueType { driver: "npy", .. }
        ));
        assert!(sink.contents().is_empty());
    }
}
