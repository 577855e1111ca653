//! Whole-file access used by the document model.
//!
//! Reads are a single `fs::read`. Writes go to a temporary file next to the
//! target which is then renamed over it, so a failed save never leaves a
//! truncated file behind.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

pub trait FileGateway {
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn write_all(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsGateway;

impl FileGateway for FsGateway {
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_all(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;

        // Keep the mode of the file we are replacing
        if let Ok(meta) = fs::metadata(path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }

        tmp.persist(path)?;
        Ok(())
    }
}
