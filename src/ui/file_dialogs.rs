use std::path::{Path, PathBuf};

use fltk::dialog::{FileDialogType, NativeFileChooser, NativeFileChooserOptions};
use tracing::warn;

use crate::app::services::file_filters::{OPEN_FILTERS, filter_string};

fn run_chooser(mut nfc: NativeFileChooser, start_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = start_dir {
        if let Err(e) = nfc.set_directory(&dir) {
            warn!(dir = %dir.display(), "could not set dialog directory: {e:?}");
        }
    }
    nfc.show(); // blocks until the dialog closes
    let filename = nfc.filename();
    if filename.as_os_str().is_empty() {
        None
    } else {
        Some(filename)
    }
}

pub fn native_open_dialog(start_dir: Option<&Path>) -> Option<PathBuf> {
    let mut nfc = NativeFileChooser::new(FileDialogType::BrowseFile);
    nfc.set_title("Open File");
    nfc.set_filter(&filter_string(OPEN_FILTERS));
    run_chooser(nfc, start_dir)
}

pub fn native_save_dialog(start_dir: Option<&Path>) -> Option<PathBuf> {
    let mut nfc = NativeFileChooser::new(FileDialogType::BrowseSaveFile);
    nfc.set_title("Save File");
    nfc.set_option(NativeFileChooserOptions::SaveAsConfirm);
    run_chooser(nfc, start_dir)
}
