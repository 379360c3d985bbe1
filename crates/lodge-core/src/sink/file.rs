//! Local file sink.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::Sink;

/// Buffered writer over a local file, named after the location it was
/// opened for.
pub struct FileSink {
    name: String,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Create (or truncate) the file at `path`. `name` is what the sink
    /// reports, e.g. the original `file://` URL.
    pub fn create(path: &Path, name: impl Into<String>) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(FileSink {
            name: name.into(),
            path: path.to_path_buf(),
            writer: Some(BufWriter::new(file)),
        })
    }

    /// Local path being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "sink already closed"))
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(writer) = self.writer.take() {
            // into_inner flushes; the file is closed when dropped here.
            writer.into_inner().map_err(|e| e.into_error())?;
        }
        Ok(())
    }
}
