//! Save in-memory values to files, choosing the format from the destination's
//! extension.
//!
//! ```no_run
//! use lodge_core::{save, SaveOptions, Value};
//!
//! let outcome = save(&Value::from("hello"), "notes.txt", &SaveOptions::default())?;
//! assert_eq!(outcome.descriptor.kind, "txt");
//! # Ok::<(), lodge_core::SaveError>(())
//! ```

pub mod capture;
pub mod config;
pub mod dispatcher;
pub mod drivers;
pub mod error;
pub mod extension;
pub mod logging;
pub mod options;
pub mod outcome;
pub mod registry;
pub mod sink;
pub mod value;

pub use capture::{CaptureContext, CaptureStack, CapturedSave};
pub use dispatcher::Dispatcher;
pub use drivers::FormatDriver;
pub use error::{CaptureError, SaveError};
pub use options::{ImageOptions, JsonOptions, SaveOptions};
pub use outcome::{Descriptor, SaveOutcome, SaveWarning, Warnings};
pub use registry::FormatRegistry;
pub use sink::{Destination, FileSink, LocalFsOpener, MemorySink, Sink, SinkOpener};
pub use value::{NdArray, Scalar, ToPortable, Value, WireSerializable};

/// Save with the default registry, the local filesystem and the global
/// capture stack.
pub fn save<'a>(
    value: &Value,
    destination: impl Into<Destination<'a>>,
    options: &SaveOptions,
) -> Result<SaveOutcome, SaveError> {
    Dispatcher::default().save(value, destination, options)
}

/// Enter a capture context on the global stack.
pub fn capture() -> CaptureContext {
    CaptureStack::global().enter()
}
