//! Writable destinations.
//!
//! A [`Sink`] is anything with a stable name and a write capability. The
//! dispatcher either receives one from the caller (who keeps ownership) or
//! opens one through a [`SinkOpener`] for a location string, in which case it
//! closes it on every exit path.

mod file;
mod memory;
mod opener;

pub use file::FileSink;
pub use memory::MemorySink;
pub use opener::{LocalFsOpener, SinkOpener};

use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// An open, named, writable destination.
pub trait Sink: Write {
    /// Stable name or URL of the destination. Its suffix selects the format.
    fn name(&self) -> &str;

    /// Flush and release the underlying handle. Must be idempotent: the
    /// handle is released once, later calls are no-ops.
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

/// Where a value should be saved.
pub enum Destination<'a> {
    /// A path or URL; the dispatcher opens (and closes) the sink.
    Location(String),
    /// An already-open sink owned by the caller; never closed by the dispatcher.
    Sink(&'a mut dyn Sink),
}

impl Destination<'_> {
    /// Name used for extension extraction.
    pub fn name(&self) -> &str {
        match self {
            Destination::Location(location) => location,
            Destination::Sink(sink) => sink.name(),
        }
    }
}

impl From<&str> for Destination<'_> {
    fn from(location: &str) -> Self {
        Destination::Location(location.to_string())
    }
}

impl From<String> for Destination<'_> {
    fn from(location: String) -> Self {
        Destination::Location(location)
    }
}

impl From<&Path> for Destination<'_> {
    fn from(path: &Path) -> Self {
        Destination::Location(path.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for Destination<'_> {
    fn from(path: PathBuf) -> Self {
        Destination::from(path.as_path())
    }
}

impl From<&PathBuf> for Destination<'_> {
    fn from(path: &PathBuf) -> Self {
        Destination::from(path.as_path())
    }
}

impl<'a, S: Sink + 'a> From<&'a mut S> for Destination<'a> {
    fn from(sink: &'a mut S) -> Self {
        Destination::Sink(sink)
    }
}
