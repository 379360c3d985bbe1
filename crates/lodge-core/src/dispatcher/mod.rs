//! Save dispatch: extension → driver → sink.
//!
//! The dispatcher owns no mutable state. It holds the (immutable) registry,
//! the opener used for location destinations, and the capture stack that
//! successful saves are recorded into while a capture context is active.

use std::sync::Arc;

use crate::capture::{CaptureStack, CapturedSave};
use crate::drivers::FormatDriver;
use crate::error::SaveError;
use crate::extension::extension_token;
use crate::options::SaveOptions;
use crate::outcome::{Descriptor, SaveOutcome, Warnings};
use crate::registry::FormatRegistry;
use crate::sink::{Destination, LocalFsOpener, SinkOpener};
use crate::value::Value;

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<FormatRegistry>,
    opener: Arc<dyn SinkOpener>,
    capture: Arc<CaptureStack>,
}

impl Default for Dispatcher {
    /// Global registry, local filesystem, global capture stack.
    fn default() -> Self {
        Self::new(FormatRegistry::global())
    }
}

impl Dispatcher {
    pub fn new(registry: Arc<FormatRegistry>) -> Self {
        Self {
            registry,
            opener: Arc::new(LocalFsOpener),
            capture: CaptureStack::global(),
        }
    }

    pub fn with_opener(mut self, opener: Arc<dyn SinkOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_capture(mut self, capture: Arc<CaptureStack>) -> Self {
        self.capture = capture;
        self
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn capture(&self) -> &Arc<CaptureStack> {
        &self.capture
    }

    /// Resolve the driver for a destination name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn FormatDriver>, SaveError> {
        let token = extension_token(name).ok_or_else(|| SaveError::MissingExtension {
            destination: name.to_string(),
        })?;
        self.registry
            .lookup(&token)
            .ok_or_else(|| SaveError::UnsupportedFormat {
                extension: token,
                supported: self.registry.entries(),
            })
    }

    /// Save `value` to `destination`, picking the format from its extension.
    pub fn save<'a>(
        &self,
        value: &Value,
        destination: impl Into<Destination<'a>>,
        options: &SaveOptions,
    ) -> Result<SaveOutcome, SaveError> {
        let mut warnings = Warnings::new();
        let descriptor = self.save_collecting(value, destination, options, &mut warnings)?;
        Ok(SaveOutcome {
            descriptor,
            warnings: warnings.into_vec(),
        })
    }

    /// Like [`save`](Self::save), but warnings go into `warnings`, so they are
    /// observable when the save fails too.
    ///
    /// A location destination is opened after the format is resolved and is
    /// closed on every exit path; when both the driver and the close fail, the
    /// driver's error wins. A caller-supplied sink is left open.
    pub fn save_collecting<'a>(
        &self,
        value: &Value,
        destination: impl Into<Destination<'a>>,
        options: &SaveOptions,
        warnings: &mut Warnings,
    ) -> Result<Descriptor, SaveError> {
        let start = warnings.len();
        let descriptor = match destination.into() {
            Destination::Sink(sink) => {
                let driver = self.resolve(sink.name())?;
                driver.save(value, sink, options, warnings)?
            }
            Destination::Location(location) => {
                let driver = self.resolve(&location)?;
                let mut sink = self.opener.open(&location)?;
                let result = driver.save(value, sink.as_mut(), options, warnings);
                let closed = sink.close();
                let descriptor = result?;
                closed?;
                descriptor
            }
        };

        let coerced = warnings.len() - start;
        tracing::debug!(kind = %descriptor.kind, url = %descriptor.url, coerced, "saved");
        self.capture.record(CapturedSave {
            descriptor: descriptor.clone(),
            warnings: warnings.since(start).to_vec(),
        });
        Ok(descriptor)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("capture_depth", &self.capture.depth())
            .finish()
    }
}
