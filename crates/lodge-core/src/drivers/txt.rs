//! Plain-text driver.

use std::borrow::Cow;

use crate::error::SaveError;
use crate::options::SaveOptions;
use crate::outcome::{Descriptor, SaveWarning, Warnings};
use crate::sink::Sink;
use crate::value::Value;

use super::FormatDriver;

/// A string (or bytes) is written verbatim. A list or tuple is written one
/// element per line, each ending in exactly one `\n`; elements that are not
/// text are written via their textual representation with a warning.
pub struct TextDriver;

impl FormatDriver for TextDriver {
    fn name(&self) -> &'static str {
        "txt"
    }

    fn save(
        &self,
        value: &Value,
        sink: &mut dyn Sink,
        _options: &SaveOptions,
        warnings: &mut Warnings,
    ) -> Result<Descriptor, SaveError> {
        match value {
            Value::Str(s) => sink.write_all(s.as_bytes())?,
            Value::Bytes(b) => sink.write_all(b)?,
            Value::List(lines) | Value::Tuple(lines) => {
                for (index, line) in lines.iter().enumerate() {
                    let bytes = line_bytes(line, || {
                        warnings.raise(SaveWarning::LineConverted {
                            index,
                            type_name: line.type_name(),
                        })
                    });
                    write_line(sink, &bytes)?;
                }
            }
            other => {
                warnings.raise(SaveWarning::ValueConverted {
                    type_name: other.type_name(),
                });
                write_line(sink, other.repr().as_bytes())?;
            }
        }
        Ok(Descriptor::new(self.name(), sink.name()))
    }
}

fn line_bytes<'v>(line: &'v Value, on_convert: impl FnOnce()) -> Cow<'v, [u8]> {
    match line {
        Value::Str(s) => Cow::Borrowed(s.as_bytes()),
        Value::Bytes(b) => Cow::Borrowed(b.as_slice()),
        other => {
            on_convert();
            Cow::Owned(other.repr().into_bytes())
        }
    }
}

fn write_line(sink: &mut dyn Sink, line: &[u8]) -> Result<(), SaveError> {
    sink.write_all(line)?;
    if !line.ends_with(b"\n") {
        sink.write_all(b"\n")?;
    }
    Ok(())
}
