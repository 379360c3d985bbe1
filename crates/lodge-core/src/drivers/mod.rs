//! Format drivers.
//!
//! A driver encodes one value into an open sink and describes what it wrote.
//! Drivers are stateless; each call is independent. Value-shape problems are
//! coerced with a warning wherever a safe conversion exists and fail only
//! when none does.

mod image;
mod json;
mod normalize;
mod npy;
mod npz;
mod pb;
mod txt;

pub use self::image::ImageDriver;
pub use json::{to_json, JsonDriver};
pub use normalize::normalize_array;
pub use npy::NpyDriver;
pub use npz::NpzDriver;
pub use pb::MessageDriver;
pub use txt::TextDriver;

use crate::error::SaveError;
use crate::options::SaveOptions;
use crate::outcome::{Descriptor, Warnings};
use crate::sink::Sink;
use crate::value::Value;

/// Encodes a value into a sink.
pub trait FormatDriver: Send + Sync {
    /// Driver name; also the descriptor's `type`.
    fn name(&self) -> &'static str;

    fn save(
        &self,
        value: &Value,
        sink: &mut dyn Sink,
        options: &SaveOptions,
        warnings: &mut Warnings,
    ) -> Result<Descriptor, SaveError>;
}

/// Error for a value a driver cannot handle at all.
pub(crate) fn unsupported(driver: &'static str, expected: &'static str, value: &Value) -> SaveError {
    SaveError::UnsupportedValueType {
        driver,
        expected,
        found: value.type_name(),
    }
}
