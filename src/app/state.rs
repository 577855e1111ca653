use std::path::Path;

use fltk::{app::Sender, dialog, prelude::*};
use tracing::{debug, error, info, warn};

use super::controllers::session::{Outcome, Session};
use super::controllers::terminal::{TerminalController, spawn_first};
use super::domain::messages::Message;
use super::domain::settings::{AppSettings, ViewPreferences};
use super::infrastructure::error::AppError;
use super::services::terminal::{PtyEvent, PtyHandle};
use super::services::text_ops::{find_in_text, find_wrapping, line_count, line_number_width, status_line, window_title};
use crate::ui::dialogs::FltkPrompter;
use crate::ui::dialogs::about::show_about_dialog;
use crate::ui::main_window::{MainWidgets, SEARCH_BAR_HEIGHT};
use crate::ui::menu::set_menu_checkbox;
use crate::ui::terminal_pane::TERMINAL_PANE_HEIGHT;
use crate::ui::theme::apply_theme;

pub struct AppState {
    pub session: Session,
    pub prompter: FltkPrompter,
    pub terminal: TerminalController,
    pub view: ViewPreferences,
    pub settings: AppSettings,
    pub widgets: MainWidgets,
    pub sender: Sender<Message>,
    search_visible: bool,
}

impl AppState {
    pub fn new(widgets: MainWidgets, settings: AppSettings, sender: Sender<Message>) -> Self {
        let view = ViewPreferences::from_settings(&settings);
        let terminal = TerminalController::new(settings.scrollback_lines);
        let mut state = Self {
            session: Session::new(),
            prompter: FltkPrompter::new(),
            terminal,
            view,
            settings,
            widgets,
            sender,
            search_visible: false,
        };
        apply_theme(&mut state.widgets, &state.view);
        state.refresh_document_view();
        state
    }

    // --- Document ---

    pub fn file_new(&mut self) {
        match self.session.request_new(&mut self.prompter) {
            Ok(Outcome::Completed) => self.sync_buffer_from_document(),
            Ok(Outcome::Cancelled) => self.update_window_title(),
            Err(e) => self.report(&e),
        }
    }

    pub fn file_open(&mut self) {
        match self.session.request_open(&mut self.prompter) {
            Ok(Outcome::Completed) => self.sync_buffer_from_document(),
            Ok(Outcome::Cancelled) => self.update_window_title(),
            Err(e) => {
                // A Save answer may have succeeded before the load failed
                self.update_window_title();
                self.report(&e);
            }
        }
    }

    /// Open a path given on the command line.
    pub fn open_file(&mut self, path: &Path) {
        self.prompter.remember_directory_of(path);
        match self.session.open_path(&mut self.prompter, path) {
            Ok(Outcome::Completed) => self.sync_buffer_from_document(),
            Ok(Outcome::Cancelled) => {}
            Err(e) => self.report(&e),
        }
    }

    pub fn file_save(&mut self) {
        if let Err(e) = self.session.save(&mut self.prompter) {
            self.report(&e);
        }
        self.update_window_title();
    }

    pub fn file_save_as(&mut self) {
        if let Err(e) = self.session.save_as(&mut self.prompter) {
            self.report(&e);
        }
        self.update_window_title();
    }

    /// Returns true when the application may exit. The shell is killed on
    /// the way out.
    pub fn request_quit(&mut self) -> bool {
        let may_quit = match self.session.request_close(&mut self.prompter) {
            Ok(Outcome::Completed) => true,
            Ok(Outcome::Cancelled) => false,
            Err(e) => {
                self.report(&e);
                false
            }
        };
        self.update_window_title();
        if may_quit {
            info!("quitting");
            self.terminal.shutdown();
        }
        may_quit
    }

    pub fn on_buffer_modified(&mut self) {
        self.session.record_edit(self.widgets.buffer.text());
        self.refresh_document_view();
    }

    /// Replace the editor contents with the document's text without
    /// recording it as an edit.
    fn sync_buffer_from_document(&mut self) {
        self.widgets.syncing.set(true);
        self.widgets.buffer.set_text(self.session.document().text());
        self.widgets.syncing.set(false);
        self.widgets.editor.set_insert_position(0);
        self.widgets.editor.show_insert_position();
        self.refresh_document_view();
    }

    fn refresh_document_view(&mut self) {
        self.update_window_title();
        self.update_linenumber_width();
        self.update_status_bar();
    }

    pub fn update_window_title(&mut self) {
        let doc = self.session.document();
        let title = window_title(&doc.display_name(), doc.is_modified());
        self.widgets.window.set_label(&title);
    }

    pub fn update_status_bar(&mut self) {
        let cursor = self.widgets.editor.insert_position().max(0) as usize;
        let line = status_line(self.session.document().text(), cursor);
        self.widgets.status_bar.set_label(&format!("  {}", line));
    }

    pub fn update_linenumber_width(&mut self) {
        if !self.settings.line_numbers_enabled {
            self.widgets.editor.set_linenumber_width(0);
            return;
        }
        let lines = line_count(self.session.document().text());
        self.widgets.editor.set_linenumber_width(line_number_width(lines));
    }

    // --- Edit ---

    pub fn edit_cut(&mut self) {
        self.widgets.editor.cut();
    }

    pub fn edit_copy(&mut self) {
        self.widgets.editor.copy();
    }

    pub fn edit_paste(&mut self) {
        self.widgets.editor.paste();
    }

    pub fn toggle_search(&mut self) {
        self.search_visible = !self.search_visible;
        if self.search_visible {
            self.widgets.search_row.show();
            self.widgets.flex.fixed(&self.widgets.search_row, SEARCH_BAR_HEIGHT);
            let _ = self.widgets.search_input.take_focus();
        } else {
            self.widgets.search_row.hide();
            self.widgets.flex.fixed(&self.widgets.search_row, 0);
            let _ = self.widgets.editor.take_focus();
        }
        self.widgets.window.redraw();
    }

    /// Select the first match from the start of the buffer.
    pub fn search_changed(&mut self) {
        let query = self.widgets.search_input.value();
        if query.is_empty() {
            self.widgets.buffer.unselect();
            return;
        }
        let found = find_in_text(self.session.document().text(), &query, 0, true);
        self.select_match(found, &query);
    }

    /// Select the next match after the cursor, wrapping to the top.
    pub fn search_next(&mut self) {
        let query = self.widgets.search_input.value();
        if query.is_empty() {
            return;
        }
        let start = self.widgets.editor.insert_position().max(0) as usize;
        let found = find_wrapping(self.session.document().text(), &query, start, true);
        self.select_match(found, &query);
    }

    fn select_match(&mut self, found: Option<usize>, query: &str) {
        match found {
            Some(pos) => {
                let end = (pos + query.len()) as i32;
                self.widgets.buffer.select(pos as i32, end);
                self.widgets.editor.set_insert_position(end);
                self.widgets.editor.show_insert_position();
                self.update_status_bar();
            }
            None => {
                debug!(query, "no match");
                self.widgets.buffer.unselect();
            }
        }
    }

    // --- Terminal ---

    pub fn toggle_terminal(&mut self) {
        let shells = self.settings.shell_candidates();
        let cwd = self
            .session
            .document()
            .path()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);
        let sender = self.sender;

        let result = self.terminal.toggle(|rows, cols| {
            spawn_first(&shells, |shell| {
                info!(shell, rows, cols, "starting terminal shell");
                PtyHandle::spawn(shell, cwd.as_deref(), rows, cols, move |event| match event {
                    PtyEvent::Output(bytes) => sender.send(Message::TerminalOutput(bytes)),
                    PtyEvent::Exited => sender.send(Message::TerminalExited),
                })
            })
        });

        match result {
            Ok(true) => self.show_terminal_pane(),
            Ok(false) => self.hide_terminal_pane(),
            Err(e) => {
                self.hide_terminal_pane();
                self.report(&e);
            }
        }
    }

    fn show_terminal_pane(&mut self) {
        let w = &mut self.widgets;
        w.terminal.show();
        w.flex.fixed(&w.terminal.group, TERMINAL_PANE_HEIGHT);
        w.flex.layout();
        w.terminal_button.set_label("Hide Terminal");
        w.terminal.render(self.terminal.screen());
        w.window.redraw();
        self.terminal_resized();
    }

    fn hide_terminal_pane(&mut self) {
        let w = &mut self.widgets;
        w.terminal.hide();
        w.flex.fixed(&w.terminal.group, 0);
        w.terminal_button.set_label("Show Terminal");
        let _ = w.editor.take_focus();
        w.window.redraw();
    }

    pub fn on_terminal_output(&mut self, bytes: &[u8]) {
        self.terminal.on_output(bytes);
        self.widgets.terminal.render(self.terminal.screen());
    }

    pub fn on_terminal_exit(&mut self) {
        self.terminal.on_exit();
        self.widgets.terminal.render(self.terminal.screen());
    }

    pub fn terminal_input(&mut self, bytes: &[u8]) {
        if let Err(e) = self.terminal.send_input(bytes) {
            warn!("terminal write failed: {e}");
        }
    }

    pub fn terminal_resized(&mut self) {
        if !self.terminal.is_visible() {
            return;
        }
        let (rows, cols) = self.widgets.terminal.grid_size();
        if let Err(e) = self.terminal.resize(rows, cols) {
            warn!(rows, cols, "terminal resize failed: {e}");
        }
        self.widgets.terminal.render(self.terminal.screen());
    }

    // --- View ---

    pub fn toggle_dark_mode(&mut self) {
        self.view.toggle_theme();
        set_menu_checkbox(&mut self.widgets.menu, "View/Toggle Dark Mode", self.view.dark_mode);
        self.apply_view();
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
        self.apply_view();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
        self.apply_view();
    }

    fn apply_view(&mut self) {
        apply_theme(&mut self.widgets, &self.view);
        self.terminal_resized();
        self.view.store_into(&mut self.settings);
        if let Err(e) = self.settings.save() {
            warn!("failed to save settings: {e}");
        }
    }

    pub fn show_about(&self) {
        show_about_dialog();
    }

    fn report(&self, e: &AppError) {
        error!("{e}");
        dialog::alert_default(&e.to_string());
    }
}
