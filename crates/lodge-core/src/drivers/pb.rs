//! Binary-message (`.pb`) driver.

use crate::error::SaveError;
use crate::options::SaveOptions;
use crate::outcome::{Descriptor, SaveWarning, Warnings};
use crate::sink::Sink;
use crate::value::Value;

use super::FormatDriver;

/// Writes the wire bytes of a `Value::Message`. There is no fallback:
/// on failure a warning names the value and the original error is returned.
pub struct MessageDriver;

impl FormatDriver for MessageDriver {
    fn name(&self) -> &'static str {
        "pb"
    }

    fn save(
        &self,
        value: &Value,
        sink: &mut dyn Sink,
        _options: &SaveOptions,
        warnings: &mut Warnings,
    ) -> Result<Descriptor, SaveError> {
        let bytes = match value {
            Value::Message(message) => message.to_wire_bytes().map_err(|source| SaveError::Wire {
                type_name: message.type_name().to_string(),
                source,
            }),
            other => Err(SaveError::NotWireSerializable {
                type_name: other.type_name(),
            }),
        };
        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(err) => {
                warnings.raise(SaveWarning::MessageFailed {
                    value: value.repr(),
                });
                return Err(err);
            }
        };
        sink.write_all(&bytes)?;
        Ok(Descriptor::new(self.name(), sink.name()))
    }
}
