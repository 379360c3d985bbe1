//! Opening sinks for location strings.

use std::path::PathBuf;

use crate::error::SaveError;
use crate::extension::parse_url;

use super::{FileSink, Sink};

/// Opens a writable sink for a location. The dispatcher calls this only for
/// location destinations and closes what it gets back.
pub trait SinkOpener: Send + Sync {
    fn open(&self, location: &str) -> Result<Box<dyn Sink>, SaveError>;
}

/// Opens local files. Accepts plain paths and `file://` URLs, creating
/// missing parent directories; every other scheme is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFsOpener;

impl LocalFsOpener {
    /// Map a location to a local path, or `None` if it is not local.
    pub fn local_path(location: &str) -> Option<PathBuf> {
        match parse_url(location) {
            Some(url) if url.scheme() == "file" => url.to_file_path().ok(),
            Some(_) => None,
            None => Some(PathBuf::from(location)),
        }
    }
}

impl SinkOpener for LocalFsOpener {
    fn open(&self, location: &str) -> Result<Box<dyn Sink>, SaveError> {
        let path = Self::local_path(location).ok_or_else(|| SaveError::UnsupportedLocation {
            location: location.to_string(),
        })?;
        let open_err = |source| SaveError::Open {
            location: location.to_string(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(open_err)?;
        }
        let sink = FileSink::create(&path, location).map_err(open_err)?;
        tracing::debug!(location, path = %path.display(), "opened file sink");
        Ok(Box::new(sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn local_path_for_plain_paths_and_file_urls() {
        assert_eq!(
            LocalFsOpener::local_path("out/a.json"),
            Some(PathBuf::from("out/a.json"))
        );
        assert_eq!(
            LocalFsOpener::local_path("file:///tmp/a.json"),
            Some(PathBuf::from("/tmp/a.json"))
        );
        assert_eq!(LocalFsOpener::local_path("gs://bucket/a.json"), None);
        assert_eq!(
            LocalFsOpener::local_path("run:1/out.json"),
            Some(PathBuf::from("run:1/out.json"))
        );
    }

    #[test]
    fn open_rejects_remote_scheme() {
        let err = LocalFsOpener.open("s3://bucket/key.npy").err().unwrap();
        assert!(matches!(err, SaveError::UnsupportedLocation { .. }));
    }

    #[test]
    fn open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.txt");
        let location = path.to_string_lossy().into_owned();
        let mut sink = LocalFsOpener.open(&location).unwrap();
        assert_eq!(sink.name(), location);
        sink.write_all(b"ok").unwrap();
        sink.close().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"ok");
    }
}
