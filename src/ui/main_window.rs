use std::cell::Cell;
use std::rc::Rc;

use fltk::{
    app::Sender,
    button::Button,
    enums::{Align, CallbackTrigger, Event, FrameType, Key},
    frame::Frame,
    group::{Flex, FlexType},
    input::Input,
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor, WrapMode},
    window::Window,
};

use super::terminal_pane::TerminalPane;
use crate::app::domain::messages::Message;
use crate::app::domain::settings::AppSettings;

pub const MENU_HEIGHT: i32 = 30;
pub const TOOLBAR_HEIGHT: i32 = 34;
pub const SEARCH_BAR_HEIGHT: i32 = 32;
pub const STATUS_BAR_HEIGHT: i32 = 24;

pub struct MainWidgets {
    pub window: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    pub toolbar: Flex,
    pub toolbar_buttons: Vec<Button>,
    pub terminal_button: Button,
    pub search_row: Flex,
    pub search_input: Input,
    pub editor: TextEditor,
    pub buffer: TextBuffer,
    pub terminal: TerminalPane,
    pub status_bar: Frame,
    /// Set while the app itself replaces the buffer text, so the modify
    /// callback does not report it as a user edit.
    pub syncing: Rc<Cell<bool>>,
}

pub fn build_main_window(settings: &AppSettings, sender: &Sender<Message>) -> MainWidgets {
    let mut window = Window::new(100, 100, 900, 640, "Untitled - TermPad");
    window.set_xclass("TermPad");

    let mut flex = Flex::new(0, 0, 900, 640, None);
    flex.set_type(FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, MENU_HEIGHT, "");
    flex.fixed(&menu, MENU_HEIGHT);

    let (toolbar, toolbar_buttons, terminal_button) = build_toolbar(sender);
    flex.fixed(&toolbar, TOOLBAR_HEIGHT);

    // Search bar (initially hidden)
    let (mut search_row, search_input) = build_search_row(sender);
    search_row.hide();
    flex.fixed(&search_row, 0);

    let syncing = Rc::new(Cell::new(false));
    let mut buffer = TextBuffer::default();
    {
        let s = *sender;
        let syncing = syncing.clone();
        buffer.add_modify_callback(move |_pos, inserted, deleted, _restyled, _deleted_text| {
            if (inserted > 0 || deleted > 0) && !syncing.get() {
                s.send(Message::BufferModified);
            }
        });
    }

    let mut editor = TextEditor::new(0, 0, 0, 0, "");
    editor.set_buffer(buffer.clone());
    if settings.word_wrap_enabled {
        editor.wrap_mode(WrapMode::AtBounds, 0);
    }
    {
        let s = *sender;
        editor.handle(move |_, ev| {
            if matches!(ev, Event::KeyUp | Event::Released) {
                s.send(Message::CursorMoved);
            }
            false
        });
    }

    // Terminal pane (initially hidden, shell starts on first show)
    let mut terminal = TerminalPane::new(*sender);
    terminal.hide();
    flex.fixed(&terminal.group, 0);

    let mut status_bar = Frame::default();
    status_bar.set_frame(FrameType::FlatBox);
    status_bar.set_align(Align::Left | Align::Inside);
    status_bar.set_label_size(12);
    flex.fixed(&status_bar, STATUS_BAR_HEIGHT);

    flex.end();
    window.end();
    window.resizable(&flex);

    MainWidgets {
        window,
        flex,
        menu,
        toolbar,
        toolbar_buttons,
        terminal_button,
        search_row,
        search_input,
        editor,
        buffer,
        terminal,
        status_bar,
        syncing,
    }
}

fn build_toolbar(sender: &Sender<Message>) -> (Flex, Vec<Button>, Button) {
    let mut toolbar = Flex::default();
    toolbar.set_type(FlexType::Row);
    toolbar.set_frame(FrameType::FlatBox);
    toolbar.set_margin(3);
    toolbar.set_spacing(4);

    let specs: [(&str, &str, i32, Message); 10] = [
        ("New", "New file (Ctrl+N)", 60, Message::FileNew),
        ("Open", "Open file (Ctrl+O)", 60, Message::FileOpen),
        ("Save", "Save file (Ctrl+S)", 60, Message::FileSave),
        ("Save As", "Save as (Ctrl+Shift+S)", 70, Message::FileSaveAs),
        ("Find", "Find (Ctrl+F)", 60, Message::ShowFind),
        ("Show Terminal", "Toggle terminal (Ctrl+T)", 110, Message::ToggleTerminal),
        ("Theme", "Toggle dark mode", 70, Message::ToggleDarkMode),
        ("A-", "Zoom out (Ctrl+-)", 36, Message::ZoomOut),
        ("A+", "Zoom in (Ctrl+=)", 36, Message::ZoomIn),
        ("About", "About TermPad", 60, Message::ShowAbout),
    ];

    let mut buttons = Vec::with_capacity(specs.len());
    let mut terminal_index = 0;
    for (i, (label, tip, width, msg)) in specs.into_iter().enumerate() {
        if msg == Message::ToggleTerminal {
            terminal_index = i;
        }
        let mut btn = Button::default().with_label(label);
        btn.set_tooltip(tip);
        btn.clear_visible_focus();
        btn.emit(*sender, msg);
        toolbar.fixed(&btn, width);
        buttons.push(btn);
    }
    // Spacer takes the remaining width
    Frame::default();
    toolbar.end();

    let terminal_button = buttons[terminal_index].clone();
    (toolbar, buttons, terminal_button)
}

fn build_search_row(sender: &Sender<Message>) -> (Flex, Input) {
    let mut row = Flex::default();
    row.set_type(FlexType::Row);
    row.set_margin(4);
    row.set_spacing(6);

    let label = Frame::default().with_label("Find:");
    row.fixed(&label, 40);

    let mut input = Input::default();
    input.set_trigger(CallbackTrigger::Changed);
    input.emit(*sender, Message::SearchChanged);
    {
        let s = *sender;
        input.handle(move |_, ev| {
            if ev == Event::KeyDown && fltk::app::event_key() == Key::Enter {
                s.send(Message::SearchNext);
                return true;
            }
            false
        });
    }

    let mut next_btn = Button::default().with_label("Next");
    next_btn.emit(*sender, Message::SearchNext);
    row.fixed(&next_btn, 60);

    let mut close_btn = Button::default().with_label("\u{2715}");
    close_btn.set_tooltip("Close search");
    close_btn.emit(*sender, Message::ShowFind);
    row.fixed(&close_btn, 30);

    row.end();
    (row, input)
}
