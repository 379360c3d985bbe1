//! Dynamically-shaped numeric arrays.

use std::fmt;

use ndarray::{Array, ArrayD, Dimension, IxDyn};

use super::scalar::ElementType;
use super::Value;

/// A numeric n-dimensional array in one of the supported element types.
#[derive(Debug, Clone, PartialEq)]
pub enum NdArray {
    U8(ArrayD<u8>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

impl NdArray {
    pub fn element_type(&self) -> ElementType {
        match self {
            NdArray::U8(_) => ElementType::U8,
            NdArray::I32(_) => ElementType::I32,
            NdArray::I64(_) => ElementType::I64,
            NdArray::F32(_) => ElementType::F32,
            NdArray::F64(_) => ElementType::F64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            NdArray::U8(a) => a.shape(),
            NdArray::I32(a) => a.shape(),
            NdArray::I64(a) => a.shape(),
            NdArray::F32(a) => a.shape(),
            NdArray::F64(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy into an `f64` array of the same shape.
    pub fn to_f64(&self) -> ArrayD<f64> {
        match self {
            NdArray::U8(a) => a.mapv(f64::from),
            NdArray::I32(a) => a.mapv(f64::from),
            NdArray::I64(a) => a.mapv(|v| v as f64),
            NdArray::F32(a) => a.mapv(f64::from),
            NdArray::F64(a) => a.clone(),
        }
    }

    /// Build an `f64` array from nested lists/tuples of numbers.
    ///
    /// Returns `None` unless every leaf is an int or float at the same depth
    /// and every level is rectangular.
    pub fn from_nested(value: &Value) -> Option<NdArray> {
        let mut shape = Vec::new();
        let mut rank = None;
        let mut data = Vec::new();
        collect_nested(value, 0, &mut shape, &mut rank, &mut data)?;
        ArrayD::from_shape_vec(IxDyn(&shape), data)
            .ok()
            .map(NdArray::F64)
    }
}

fn collect_nested(
    value: &Value,
    depth: usize,
    shape: &mut Vec<usize>,
    rank: &mut Option<usize>,
    data: &mut Vec<f64>,
) -> Option<()> {
    let leaf = match value {
        Value::Int(v) => Some(*v as f64),
        Value::Float(v) => Some(*v),
        Value::List(_) | Value::Tuple(_) => None,
        _ => return None,
    };
    if let Some(v) = leaf {
        match rank {
            Some(r) if *r != depth => return None,
            Some(_) => {}
            None => {
                if depth != shape.len() {
                    return None;
                }
                *rank = Some(depth);
            }
        }
        data.push(v);
        return Some(());
    }

    let items = match value {
        Value::List(items) | Value::Tuple(items) => items,
        _ => return None,
    };
    if matches!(rank, Some(r) if depth >= *r) {
        return None;
    }
    match shape.get(depth) {
        Some(&n) if n != items.len() => return None,
        Some(_) => {}
        None => {
            if depth != shape.len() {
                return None;
            }
            shape.push(items.len());
        }
    }
    for item in items {
        collect_nested(item, depth + 1, shape, rank, data)?;
    }
    Some(())
}

impl fmt::Display for NdArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ndarray(shape={:?}, dtype={})",
            self.shape(),
            self.element_type()
        )
    }
}

macro_rules! impl_from_array {
    ($($elem:ty => $variant:ident),* $(,)?) => {
        $(
            impl<D: Dimension> From<Array<$elem, D>> for NdArray {
                fn from(array: Array<$elem, D>) -> Self {
                    NdArray::$variant(array.into_dyn())
                }
            }
        )*
    };
}

impl_from_array!(u8 => U8, i32 => I32, i64 => I64, f32 => F32, f64 => F64);
