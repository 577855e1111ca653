use std::path::{Path, PathBuf};

use fltk::dialog;

use crate::app::controllers::session::{Prompter, UnsavedChoice};
use crate::ui::file_dialogs::{native_open_dialog, native_save_dialog};

/// Modal FLTK dialogs backing the session's questions.
#[derive(Debug, Default)]
pub struct FltkPrompter {
    /// Last directory used in a file open/save dialog.
    last_directory: Option<PathBuf>,
}

impl FltkPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember_directory_of(&mut self, path: &Path) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_directory = Some(parent.to_path_buf());
        }
    }

    fn remember(&mut self, picked: Option<PathBuf>) -> Option<PathBuf> {
        if let Some(ref path) = picked {
            self.remember_directory_of(path);
        }
        picked
    }
}

impl Prompter for FltkPrompter {
    fn confirm_unsaved(&mut self, display_name: &str) -> UnsavedChoice {
        let choice = dialog::choice2_default(
            &format!("\"{}\" has unsaved changes. Save them first?", display_name),
            "Save",
            "Discard",
            "Cancel",
        );
        match choice {
            Some(0) => UnsavedChoice::Save,
            Some(1) => UnsavedChoice::Discard,
            _ => UnsavedChoice::Cancel,
        }
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        let picked = native_open_dialog(self.last_directory.as_deref());
        self.remember(picked)
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        let picked = native_save_dialog(self.last_directory.as_deref());
        self.remember(picked)
    }
}
