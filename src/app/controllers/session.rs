//! Save/Discard/Cancel guard around destructive actions.
//!
//! New, Open and Close all throw away the current buffer. When the buffer has
//! unsaved changes the user is asked first, and a Save answer must actually
//! succeed before the action goes ahead.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::app::domain::document::{Document, SaveOutcome};
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::file_io::{FileGateway, FsGateway};

/// Answer to the "unsaved changes" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Proceed,
    SaveThenProceed,
    Abort,
}

/// Decide what a destructive request does. `choice` is only consulted when
/// the document is modified; a modified document with no answer aborts.
pub fn resolve(modified: bool, choice: Option<UnsavedChoice>) -> Resolution {
    if !modified {
        return Resolution::Proceed;
    }
    match choice {
        Some(UnsavedChoice::Save) => Resolution::SaveThenProceed,
        Some(UnsavedChoice::Discard) => Resolution::Proceed,
        Some(UnsavedChoice::Cancel) | None => Resolution::Abort,
    }
}

/// How a request finished when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// User interaction needed by the session: modal questions and path pickers.
pub trait Prompter {
    fn confirm_unsaved(&mut self, display_name: &str) -> UnsavedChoice;
    fn pick_open_path(&mut self) -> Option<PathBuf>;
    fn pick_save_path(&mut self) -> Option<PathBuf>;
}

pub struct Session<G = FsGateway> {
    document: Document,
    gateway: G,
}

impl Session<FsGateway> {
    pub fn new() -> Self {
        Self::with_gateway(FsGateway)
    }
}

impl Default for Session<FsGateway> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: FileGateway> Session<G> {
    pub fn with_gateway(gateway: G) -> Self {
        Self {
            document: Document::new(),
            gateway,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn record_edit(&mut self, text: impl Into<String>) {
        self.document.edit(text);
    }

    /// Save to the current path, asking for one if the document is untitled.
    pub fn save(&mut self, prompter: &mut impl Prompter) -> Result<Outcome> {
        match self.document.save(&self.gateway)? {
            SaveOutcome::Saved => Ok(Outcome::Completed),
            SaveOutcome::NeedsPath => self.save_as(prompter),
        }
    }

    pub fn save_as(&mut self, prompter: &mut impl Prompter) -> Result<Outcome> {
        let Some(path) = prompter.pick_save_path() else {
            debug!("save location prompt cancelled");
            return Ok(Outcome::Cancelled);
        };
        self.document.save_as(&self.gateway, &path)?;
        info!(path = %path.display(), "saved");
        Ok(Outcome::Completed)
    }

    pub fn request_new(&mut self, prompter: &mut impl Prompter) -> Result<Outcome> {
        if self.guard(prompter)? == Outcome::Cancelled {
            return Ok(Outcome::Cancelled);
        }
        self.document.reset();
        Ok(Outcome::Completed)
    }

    pub fn request_open(&mut self, prompter: &mut impl Prompter) -> Result<Outcome> {
        if self.guard(prompter)? == Outcome::Cancelled {
            return Ok(Outcome::Cancelled);
        }
        let Some(path) = prompter.pick_open_path() else {
            return Ok(Outcome::Cancelled);
        };
        self.load(&path)
    }

    /// Guarded open of a path that is already known.
    pub fn open_path(&mut self, prompter: &mut impl Prompter, path: &Path) -> Result<Outcome> {
        if self.guard(prompter)? == Outcome::Cancelled {
            return Ok(Outcome::Cancelled);
        }
        self.load(path)
    }

    /// `Completed` means the window may close.
    pub fn request_close(&mut self, prompter: &mut impl Prompter) -> Result<Outcome> {
        self.guard(prompter)
    }

    fn load(&mut self, path: &Path) -> Result<Outcome> {
        self.document.load(&self.gateway, path)?;
        info!(path = %path.display(), "opened");
        Ok(Outcome::Completed)
    }

    fn guard(&mut self, prompter: &mut impl Prompter) -> Result<Outcome> {
        let modified = self.document.is_modified();
        let choice = modified.then(|| prompter.confirm_unsaved(&self.document.display_name()));

        match resolve(modified, choice) {
            Resolution::Proceed => Ok(Outcome::Completed),
            Resolution::Abort => Ok(Outcome::Cancelled),
            // A cancelled save-location prompt or a failed write aborts the action
            Resolution::SaveThenProceed => self.save(prompter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::document::tests::MemGateway;
    use crate::app::infrastructure::error::AppError;
    use std::collections::VecDeque;
    use std::io;

    /// Replays canned answers and records what was asked.
    #[derive(Default)]
    struct Scripted {
        choices: VecDeque<UnsavedChoice>,
        open_paths: VecDeque<Option<PathBuf>>,
        save_paths: VecDeque<Option<PathBuf>>,
        confirmations: Vec<String>,
        save_prompts: usize,
    }

    impl Scripted {
        fn choosing(choice: UnsavedChoice) -> Self {
            Self {
                choices: VecDeque::from([choice]),
                ..Default::default()
            }
        }

        fn save_to(mut self, path: &str) -> Self {
            self.save_paths.push_back(Some(PathBuf::from(path)));
            self
        }

        fn open(mut self, path: Option<&str>) -> Self {
            self.open_paths.push_back(path.map(PathBuf::from));
            self
        }
    }

    impl Prompter for Scripted {
        fn confirm_unsaved(&mut self, display_name: &str) -> UnsavedChoice {
            self.confirmations.push(display_name.to_string());
            self.choices.pop_front().expect("unexpected confirmation prompt")
        }

        fn pick_open_path(&mut self) -> Option<PathBuf> {
            self.open_paths.pop_front().flatten()
        }

        fn pick_save_path(&mut self) -> Option<PathBuf> {
            self.save_prompts += 1;
            self.save_paths.pop_front().flatten()
        }
    }

    fn dirty_session(gw: MemGateway, path: &str) -> Session<MemGateway> {
        let mut session = Session::with_gateway(gw);
        let mut p = Scripted::default().save_to(path);
        session.record_edit("draft");
        session.save_as(&mut p).unwrap();
        session.record_edit("draft, edited");
        session
    }

    #[test]
    fn test_resolve_table() {
        use Resolution::*;
        use UnsavedChoice::*;

        assert_eq!(resolve(false, None), Proceed);
        assert_eq!(resolve(false, Some(Cancel)), Proceed);
        assert_eq!(resolve(true, Some(Save)), SaveThenProceed);
        assert_eq!(resolve(true, Some(Discard)), Proceed);
        assert_eq!(resolve(true, Some(Cancel)), Abort);
        assert_eq!(resolve(true, None), Abort);
    }

    #[test]
    fn test_clean_close_does_not_prompt() {
        let mut session = Session::with_gateway(MemGateway::default());
        let mut p = Scripted::default();

        assert_eq!(session.request_close(&mut p).unwrap(), Outcome::Completed);
        assert!(p.confirmations.is_empty());
    }

    #[test]
    fn test_close_cancel_keeps_everything() {
        let mut session = dirty_session(MemGateway::default(), "/work/a.txt");
        let writes_before = session.gateway().writes.get();
        let mut p = Scripted::choosing(UnsavedChoice::Cancel);

        assert_eq!(session.request_close(&mut p).unwrap(), Outcome::Cancelled);
        assert!(session.document().is_modified());
        assert_eq!(session.gateway().writes.get(), writes_before);
        assert_eq!(p.confirmations, vec!["a.txt".to_string()]);
    }

    #[test]
    fn test_close_save_failure_aborts() {
        let mut session = dirty_session(MemGateway::default(), "/work/a.txt");
        session.gateway().fail_writes.set(true);
        let mut p = Scripted::choosing(UnsavedChoice::Save);

        let err = session.request_close(&mut p).unwrap_err();
        assert!(matches!(err, AppError::Save { .. }));
        assert_eq!(err.io_kind(), Some(io::ErrorKind::PermissionDenied));
        assert!(session.document().is_modified());
        assert_eq!(session.document().text(), "draft, edited");
    }

    #[test]
    fn test_close_save_success_proceeds() {
        let mut session = dirty_session(MemGateway::default(), "/work/a.txt");
        let mut p = Scripted::choosing(UnsavedChoice::Save);

        assert_eq!(session.request_close(&mut p).unwrap(), Outcome::Completed);
        assert!(!session.document().is_modified());
        assert_eq!(
            session.gateway().contents("/work/a.txt").unwrap(),
            b"draft, edited"
        );
    }

    #[test]
    fn test_close_discard_proceeds_without_writing() {
        let mut session = dirty_session(MemGateway::default(), "/work/a.txt");
        let writes_before = session.gateway().writes.get();
        let mut p = Scripted::choosing(UnsavedChoice::Discard);

        assert_eq!(session.request_close(&mut p).unwrap(), Outcome::Completed);
        assert_eq!(session.gateway().writes.get(), writes_before);
    }

    #[test]
    fn test_untitled_save_prompts_for_location() {
        let mut session = Session::with_gateway(MemGateway::default());
        session.record_edit("hello");
        assert_eq!(session.document().path(), None);

        let mut p = Scripted::default().save_to("/tmp/x.txt");
        assert_eq!(session.save(&mut p).unwrap(), Outcome::Completed);
        assert_eq!(p.save_prompts, 1);
        assert_eq!(session.document().path(), Some(Path::new("/tmp/x.txt")));

        let mut reopened = Document::new();
        reopened
            .load(session.gateway(), Path::new("/tmp/x.txt"))
            .unwrap();
        assert_eq!(reopened.text(), "hello");
    }

    #[test]
    fn test_untitled_close_save_with_cancelled_location_aborts() {
        let mut session = Session::with_gateway(MemGateway::default());
        session.record_edit("unsaved");
        let mut p = Scripted::choosing(UnsavedChoice::Save);

        assert_eq!(session.request_close(&mut p).unwrap(), Outcome::Cancelled);
        assert!(session.document().is_modified());
        assert_eq!(session.gateway().writes.get(), 0);
    }

    #[test]
    fn test_new_discard_clears_document() {
        let mut session = dirty_session(MemGateway::default(), "/work/a.txt");
        let mut p = Scripted::choosing(UnsavedChoice::Discard);

        assert_eq!(session.request_new(&mut p).unwrap(), Outcome::Completed);
        assert_eq!(session.document(), &Document::new());
    }

    #[test]
    fn test_new_cancel_keeps_document() {
        let mut session = dirty_session(MemGateway::default(), "/work/a.txt");
        let mut p = Scripted::choosing(UnsavedChoice::Cancel);

        assert_eq!(session.request_new(&mut p).unwrap(), Outcome::Cancelled);
        assert_eq!(session.document().text(), "draft, edited");
        assert!(session.document().is_modified());
    }

    #[test]
    fn test_open_saves_then_loads() {
        let gw = MemGateway::with_file("/work/other.py", b"print('other')\n");
        let mut session = dirty_session(gw, "/work/a.txt");
        let mut p = Scripted::choosing(UnsavedChoice::Save).open(Some("/work/other.py"));

        assert_eq!(session.request_open(&mut p).unwrap(), Outcome::Completed);
        assert_eq!(session.document().text(), "print('other')\n");
        assert!(!session.document().is_modified());
        assert_eq!(
            session.gateway().contents("/work/a.txt").unwrap(),
            b"draft, edited"
        );
    }

    #[test]
    fn test_open_picker_cancelled() {
        let mut session = Session::with_gateway(MemGateway::default());
        let mut p = Scripted::default().open(None);

        assert_eq!(session.request_open(&mut p).unwrap(), Outcome::Cancelled);
        assert_eq!(session.document(), &Document::new());
    }

    #[test]
    fn test_open_missing_file_keeps_document() {
        let mut session = Session::with_gateway(MemGateway::default());
        session.record_edit("scratch");
        let before = session.document().clone();
        let mut p = Scripted::choosing(UnsavedChoice::Discard).open(Some("/tmp/a.txt"));

        let err = session.request_open(&mut p).unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::NotFound));
        assert_eq!(session.document(), &before);
    }

    #[test]
    fn test_open_path_skips_picker() {
        let gw = MemGateway::with_file("/work/main.c", b"int main;\n");
        let mut session = Session::with_gateway(gw);
        let mut p = Scripted::default();

        let outcome = session.open_path(&mut p, Path::new("/work/main.c")).unwrap();
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(session.document().display_name(), "main.c");
    }
}
