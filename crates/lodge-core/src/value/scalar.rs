//! Numeric element types and typed scalar wrappers.

use std::fmt;

/// Element type of a numeric array or scalar, named after the numpy dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    U8,
    I32,
    I64,
    F32,
    F64,
}

impl ElementType {
    pub fn name(self) -> &'static str {
        match self {
            ElementType::U8 => "uint8",
            ElementType::I32 => "int32",
            ElementType::I64 => "int64",
            ElementType::F32 => "float32",
            ElementType::F64 => "float64",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numeric scalar that remembers its element type (e.g. a `float32` read
/// out of an array), as opposed to the native `Value::Int` / `Value::Float`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    U8(u8),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

/// Native number a scalar converts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Native {
    Int(i64),
    Float(f64),
}

impl Scalar {
    pub fn element_type(&self) -> ElementType {
        match self {
            Scalar::U8(_) => ElementType::U8,
            Scalar::I32(_) => ElementType::I32,
            Scalar::I64(_) => ElementType::I64,
            Scalar::F32(_) => ElementType::F32,
            Scalar::F64(_) => ElementType::F64,
        }
    }

    /// Unwrap into a native int or float.
    pub fn to_native(self) -> Native {
        match self {
            Scalar::U8(v) => Native::Int(i64::from(v)),
            Scalar::I32(v) => Native::Int(i64::from(v)),
            Scalar::I64(v) => Native::Int(v),
            Scalar::F32(v) => Native::Float(f64::from(v)),
            Scalar::F64(v) => Native::Float(v),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_native() {
            Native::Int(v) => write!(f, "{}({})", self.element_type(), v),
            Native::Float(v) => write!(f, "{}({:?})", self.element_type(), v),
        }
    }
}
