use std::path::PathBuf;

use fltk::{app, enums::Event, prelude::*};
use tracing::info;
use tracing_subscriber::EnvFilter;

use term_pad::app::{AppSettings, AppState, Message};
use term_pad::ui::main_window::build_main_window;
use term_pad::ui::menu::build_menu;

fn setup_tracing() {
    let filter = EnvFilter::try_from_env("TERMPAD_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() {
    setup_tracing();

    let app = app::App::default();
    let (s, r) = app::channel::<Message>();

    let settings = AppSettings::load();
    let dark_mode = settings.theme_mode.is_dark();

    let mut widgets = build_main_window(&settings, &s);
    build_menu(&mut widgets.menu, &s, dark_mode);

    // Route the close button through the unsaved-changes check
    widgets.window.set_callback(move |_| {
        if app::event() == Event::Close {
            s.send(Message::WindowClose);
        }
    });
    widgets.window.show();

    let mut state = AppState::new(widgets, settings, s);

    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.open_file(&path);
    }

    info!(version = env!("CARGO_PKG_VERSION"), "TermPad started");

    while app.wait() {
        if let Some(msg) = r.recv() {
            match msg {
                Message::FileNew => state.file_new(),
                Message::FileOpen => state.file_open(),
                Message::FileSave => state.file_save(),
                Message::FileSaveAs => state.file_save_as(),
                Message::FileQuit | Message::WindowClose => {
                    if state.request_quit() {
                        app.quit();
                    }
                }
                Message::EditCut => state.edit_cut(),
                Message::EditCopy => state.edit_copy(),
                Message::EditPaste => state.edit_paste(),
                Message::ShowFind => state.toggle_search(),
                Message::SearchChanged => state.search_changed(),
                Message::SearchNext => state.search_next(),
                Message::BufferModified => state.on_buffer_modified(),
                Message::CursorMoved => state.update_status_bar(),
                Message::ToggleTerminal => state.toggle_terminal(),
                Message::ToggleDarkMode => state.toggle_dark_mode(),
                Message::ZoomIn => state.zoom_in(),
                Message::ZoomOut => state.zoom_out(),
                Message::TerminalOutput(bytes) => state.on_terminal_output(&bytes),
                Message::TerminalExited => state.on_terminal_exit(),
                Message::TerminalInput(bytes) => state.terminal_input(&bytes),
                Message::TerminalResized => state.terminal_resized(),
                Message::ShowAbout => state.show_about(),
            }
        }
    }
}
