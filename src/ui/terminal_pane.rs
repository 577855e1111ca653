use fltk::{
    app::{self, Sender},
    button::Button,
    draw,
    enums::{Align, Event, Font, FrameType, Key},
    frame::Frame,
    group::{Flex, FlexType},
    prelude::*,
    text::{Cursor, TextBuffer, TextDisplay},
};

use super::theme::Palette;
use crate::app::domain::messages::Message;
use crate::app::services::terminal::{Screen, TermKey, encode_key};

pub const TERMINAL_PANE_HEIGHT: i32 = 220;
const HEADER_HEIGHT: i32 = 28;
const TERMINAL_FONT: Font = Font::Courier;

pub struct TerminalPane {
    pub group: Flex,
    header: Flex,
    title: Frame,
    close_btn: Button,
    display: TextDisplay,
    buffer: TextBuffer,
    font_size: i32,
}

impl TerminalPane {
    /// Build the pane inside the currently open group.
    pub fn new(sender: Sender<Message>) -> Self {
        let mut group = Flex::default();
        group.set_type(FlexType::Column);

        let mut header = Flex::default();
        header.set_type(FlexType::Row);
        header.set_frame(FrameType::FlatBox);
        let mut title = Frame::default().with_label("Terminal");
        title.set_align(Align::Left | Align::Inside);
        let mut close_btn = Button::default().with_label("\u{2715}");
        close_btn.set_frame(FrameType::FlatBox);
        close_btn.set_tooltip("Hide terminal");
        close_btn.emit(sender, Message::ToggleTerminal);
        header.fixed(&close_btn, HEADER_HEIGHT);
        header.end();
        group.fixed(&header, HEADER_HEIGHT);

        let buffer = TextBuffer::default();
        let mut display = TextDisplay::default();
        display.set_buffer(buffer.clone());
        display.set_text_font(TERMINAL_FONT);
        display.show_cursor(true);
        display.set_cursor_style(Cursor::Block);
        display.handle(move |d, ev| handle_terminal_event(d, ev, sender));
        display.resize_callback(move |_, _, _, _, _| sender.send(Message::TerminalResized));

        group.end();

        Self {
            group,
            header,
            title,
            close_btn,
            display,
            buffer,
            font_size: 12,
        }
    }

    pub fn show(&mut self) {
        self.group.show();
        let _ = self.display.take_focus();
    }

    pub fn hide(&mut self) {
        self.group.hide();
    }

    pub fn render(&mut self, screen: &Screen) {
        let rendered = screen.render();
        self.buffer.set_text(&rendered.text);
        self.display.set_insert_position(rendered.cursor as i32);
        self.display.show_insert_position();
        if let Some(t) = screen.title() {
            self.title.set_label(&format!("Terminal - {}", t));
        }
    }

    /// Rows and columns that fit in the display at the current font size.
    pub fn grid_size(&self) -> (u16, u16) {
        draw::set_font(TERMINAL_FONT, self.font_size);
        let cell_w = draw::width("M").max(1.0);
        let cell_h = draw::height().max(1);
        let usable_w = (self.display.w() - 20).max(0) as f64;
        let usable_h = (self.display.h() - 4).max(0);
        let cols = (usable_w / cell_w).floor() as u16;
        let rows = (usable_h / cell_h) as u16;
        (rows.max(1), cols.max(1))
    }

    pub fn apply_theme(&mut self, p: &Palette, font_size: i32) {
        let c = |(r, g, b): (u8, u8, u8)| fltk::enums::Color::from_rgb(r, g, b);
        self.font_size = font_size;
        self.display.set_text_size(font_size);
        self.display.set_color(c(p.terminal_bg));
        self.display.set_text_color(c(p.terminal_fg));
        self.display.set_cursor_color(c(p.terminal_fg));
        self.header.set_color(c(p.terminal_header_bg));
        self.title.set_label_color(c(p.text));
        self.close_btn.set_color(c(p.terminal_header_bg));
        self.close_btn.set_label_color(c(p.text));
        self.group.redraw();
    }
}

fn handle_terminal_event(d: &mut TextDisplay, ev: Event, sender: Sender<Message>) -> bool {
    match ev {
        Event::Push => {
            let _ = d.take_focus();
            false
        }
        Event::Focus | Event::Unfocus => true,
        Event::KeyDown => match key_from_event() {
            Some(key) => {
                let bytes = encode_key(&key);
                if !bytes.is_empty() {
                    sender.send(Message::TerminalInput(bytes));
                }
                true
            }
            None => false,
        },
        Event::Paste => {
            let text = app::event_text();
            if !text.is_empty() {
                sender.send(Message::TerminalInput(text.into_bytes()));
            }
            true
        }
        _ => false,
    }
}

/// Ctrl+letter combos that stay with the menu while the terminal has focus:
/// New, Open, Save (and Save As), Quit, Find, toggle terminal.
const MENU_CTRL_KEYS: &[char] = &['n', 'o', 's', 'q', 'f', 't'];

/// Terminal key for Ctrl plus `c`, or `None` when the menu should get it.
fn ctrl_key(c: char) -> Option<TermKey> {
    let c = c.to_ascii_lowercase();
    if !c.is_ascii_alphabetic() || MENU_CTRL_KEYS.contains(&c) {
        return None;
    }
    Some(TermKey::Ctrl(c))
}

/// Translate the current FLTK key event. `None` lets the event through to
/// the menu shortcuts.
fn key_from_event() -> Option<TermKey> {
    let key = app::event_key();
    if app::is_event_ctrl() {
        return key.to_char().and_then(ctrl_key);
    }

    let named = match key {
        Key::Enter | Key::KPEnter => Some(TermKey::Enter),
        Key::BackSpace => Some(TermKey::Backspace),
        Key::Tab => Some(TermKey::Tab),
        Key::Escape => Some(TermKey::Escape),
        Key::Up => Some(TermKey::Up),
        Key::Down => Some(TermKey::Down),
        Key::Left => Some(TermKey::Left),
        Key::Right => Some(TermKey::Right),
        Key::Home => Some(TermKey::Home),
        Key::End => Some(TermKey::End),
        Key::Delete => Some(TermKey::Delete),
        Key::PageUp => Some(TermKey::PageUp),
        Key::PageDown => Some(TermKey::PageDown),
        _ => None,
    };

    named.or_else(|| {
        let text = app::event_text();
        (!text.is_empty()).then(|| TermKey::Text(text))
    })
}
