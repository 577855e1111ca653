use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::file_io::FileGateway;
use crate::app::services::text_ops::extract_filename;

/// Result of [`Document::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The document has never been saved; the caller must pick a path first.
    NeedsPath,
}

/// The in-memory buffer, its backing file and whether it has unsaved changes.
///
/// `modified` is cleared by a successful `load`, `save` or `save_as`
/// and set by every `edit`. Failed operations leave all three fields as they were.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
    path: Option<PathBuf>,
    modified: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// File name for titles and prompts, or "Untitled".
    pub fn display_name(&self) -> String {
        match self.path {
            Some(ref path) => extract_filename(&path.to_string_lossy()),
            None => "Untitled".to_string(),
        }
    }

    pub fn reset(&mut self) {
        self.text.clear();
        self.path = None;
        self.modified = false;
    }

    pub fn load(&mut self, fs: &impl FileGateway, path: &Path) -> Result<()> {
        let open_err = |source| AppError::Open {
            path: path.to_path_buf(),
            source,
        };

        let bytes = fs.read_all(path).map_err(open_err)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| open_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        debug!(path = %path.display(), bytes = text.len(), "loaded document");
        self.text = text;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    pub fn save(&mut self, fs: &impl FileGateway) -> Result<SaveOutcome> {
        let Some(path) = self.path.clone() else {
            return Ok(SaveOutcome::NeedsPath);
        };
        self.write_to(fs, &path)?;
        self.modified = false;
        Ok(SaveOutcome::Saved)
    }

    /// Write to `path` and adopt it as the backing file.
    pub fn save_as(&mut self, fs: &impl FileGateway, path: &Path) -> Result<()> {
        self.write_to(fs, path)?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    pub fn edit(&mut self, new_text: impl Into<String>) {
        self.text = new_text.into();
        self.modified = true;
    }

    fn write_to(&self, fs: &impl FileGateway, path: &Path) -> Result<()> {
        fs.write_all(path, self.text.as_bytes())
            .map_err(|source| AppError::Save {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), bytes = self.text.len(), "saved document");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::infrastructure::file_io::FsGateway;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::fs;

    /// In-memory filesystem with switchable write failures.
    #[derive(Default)]
    pub(crate) struct MemGateway {
        pub files: RefCell<HashMap<PathBuf, Vec<u8>>>,
        pub fail_writes: Cell<bool>,
        pub writes: Cell<usize>,
    }

    impl MemGateway {
        pub fn with_file(path: &str, content: &[u8]) -> Self {
            let gw = Self::default();
            gw.files
                .borrow_mut()
                .insert(PathBuf::from(path), content.to_vec());
            gw
        }

        pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
            self.files.borrow().get(Path::new(path)).cloned()
        }
    }

    impl FileGateway for MemGateway {
        fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No such file or directory"))
        }

        fn write_all(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
            if self.fail_writes.get() {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"));
            }
            self.writes.set(self.writes.get() + 1);
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), bytes.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_new_document_is_clean_and_untitled() {
        let doc = Document::new();
        assert_eq!(doc.text(), "");
        assert_eq!(doc.path(), None);
        assert!(!doc.is_modified());
        assert_eq!(doc.display_name(), "Untitled");
    }

    #[test]
    fn test_edit_marks_modified_until_save() {
        let gw = MemGateway::default();
        let mut doc = Document::new();
        doc.save_as(&gw, Path::new("/work/a.txt")).unwrap();
        assert!(!doc.is_modified());

        doc.edit("a");
        assert!(doc.is_modified());
        doc.edit("ab");
        doc.edit("abc");
        assert!(doc.is_modified());

        assert_eq!(doc.save(&gw).unwrap(), SaveOutcome::Saved);
        assert!(!doc.is_modified());
        assert_eq!(gw.contents("/work/a.txt").unwrap(), b"abc");
    }

    #[test]
    fn test_load_clears_modified() {
        let gw = MemGateway::with_file("/work/b.txt", b"from disk");
        let mut doc = Document::new();
        doc.edit("scratch");

        doc.load(&gw, Path::new("/work/b.txt")).unwrap();
        assert_eq!(doc.text(), "from disk");
        assert_eq!(doc.path(), Some(Path::new("/work/b.txt")));
        assert!(!doc.is_modified());
        assert_eq!(doc.display_name(), "b.txt");
    }

    #[test]
    fn test_save_without_path_does_not_write() {
        let gw = MemGateway::default();
        let mut doc = Document::new();
        doc.edit("hello");

        assert_eq!(doc.save(&gw).unwrap(), SaveOutcome::NeedsPath);
        assert_eq!(gw.writes.get(), 0);
        assert!(doc.is_modified());
    }

    #[test]
    fn test_load_missing_file_leaves_state_unchanged() {
        let gw = MemGateway::with_file("/work/keep.txt", b"keep");
        let mut doc = Document::new();
        doc.load(&gw, Path::new("/work/keep.txt")).unwrap();
        doc.edit("keep, edited");
        let before = doc.clone();

        let err = doc.load(&gw, Path::new("/tmp/a.txt")).unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::NotFound));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let gw = MemGateway::with_file("/work/bin.dat", &[0xff, 0xfe, 0x00]);
        let mut doc = Document::new();

        let err = doc.load(&gw, Path::new("/work/bin.dat")).unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::InvalidData));
        assert_eq!(doc, Document::new());
    }

    #[test]
    fn test_edit_after_load_sets_modified() {
        let gw = MemGateway::with_file("/work/main.py", b"print('hi')\n");
        let mut doc = Document::new();
        doc.load(&gw, Path::new("/work/main.py")).unwrap();
        assert!(!doc.is_modified());

        doc.edit("print('bye')\n");
        assert!(doc.is_modified());
        assert_eq!(doc.path(), Some(Path::new("/work/main.py")));

        // Stays modified across further edits until the next save
        doc.edit("print('again')\n");
        assert!(doc.is_modified());
        assert_eq!(doc.save(&gw).unwrap(), SaveOutcome::Saved);
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_failed_save_keeps_modified() {
        let gw = MemGateway::default();
        let mut doc = Document::new();
        doc.save_as(&gw, Path::new("/work/c.txt")).unwrap();
        doc.edit("unsaved work");

        gw.fail_writes.set(true);
        let err = doc.save(&gw).unwrap_err();
        assert!(matches!(err, AppError::Save { .. }));
        assert!(doc.is_modified());
        assert_eq!(doc.text(), "unsaved work");
    }

    #[test]
    fn test_failed_save_as_keeps_old_path() {
        let gw = MemGateway::default();
        let mut doc = Document::new();
        doc.save_as(&gw, Path::new("/work/old.txt")).unwrap();
        doc.edit("x");

        gw.fail_writes.set(true);
        assert!(doc.save_as(&gw, Path::new("/locked/new.txt")).is_err());
        assert_eq!(doc.path(), Some(Path::new("/work/old.txt")));
        assert!(doc.is_modified());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let gw = MemGateway::with_file("/work/d.txt", b"content");
        let mut doc = Document::new();
        doc.load(&gw, Path::new("/work/d.txt")).unwrap();
        doc.edit("changed");

        doc.reset();
        let once = doc.clone();
        doc.reset();
        assert_eq!(doc, once);
        assert_eq!(doc, Document::new());
    }

    #[test]
    fn test_load_save_round_trip_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.c");
        let source = "#include <stdio.h>\r\n\tint x = 1;\n// ünïcödé\n\n";
        fs::write(&path, source).unwrap();

        let mut doc = Document::new();
        doc.load(&FsGateway, &path).unwrap();
        assert_eq!(doc.save(&FsGateway).unwrap(), SaveOutcome::Saved);

        assert_eq!(fs::read(&path).unwrap(), source.as_bytes());
    }

    #[test]
    fn test_untitled_save_as_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.txt");

        let mut doc = Document::new();
        doc.reset();
        doc.edit("hello");
        assert!(doc.is_modified());
        assert_eq!(doc.path(), None);

        doc.save_as(&FsGateway, &path).unwrap();
        let mut reopened = Document::new();
        reopened.load(&FsGateway, &path).unwrap();
        assert_eq!(reopened.text(), "hello");
    }
}
