use fltk::{enums::Color, prelude::*};

use super::main_window::MainWidgets;
use crate::app::domain::settings::ViewPreferences;

type Rgb = (u8, u8, u8);

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub text: Rgb,
    pub selection: Rgb,
    pub gutter_bg: Rgb,
    pub gutter_fg: Rgb,
    pub toolbar_bg: Rgb,
    pub button_bg: Rgb,
    pub status_bg: Rgb,
    pub status_fg: Rgb,
    pub terminal_header_bg: Rgb,
    pub terminal_bg: Rgb,
    pub terminal_fg: Rgb,
}

impl Palette {
    pub const DARK: Palette = Palette {
        background: (30, 30, 30),
        text: (212, 212, 212),
        selection: (38, 79, 120),
        gutter_bg: (37, 37, 38),
        gutter_fg: (133, 133, 133),
        toolbar_bg: (60, 60, 60),
        button_bg: (64, 64, 64),
        status_bg: (0, 122, 204),
        status_fg: (255, 255, 255),
        terminal_header_bg: (45, 45, 48),
        terminal_bg: (31, 31, 31),
        terminal_fg: (212, 212, 212),
    };

    pub const LIGHT: Palette = Palette {
        background: (255, 255, 255),
        text: (51, 51, 51),
        selection: (173, 214, 255),
        gutter_bg: (248, 248, 248),
        gutter_fg: (153, 153, 153),
        toolbar_bg: (240, 240, 240),
        button_bg: (255, 255, 255),
        status_bg: (0, 120, 212),
        status_fg: (255, 255, 255),
        terminal_header_bg: (224, 224, 224),
        terminal_bg: (255, 255, 255),
        terminal_fg: (51, 51, 51),
    };

    pub fn for_mode(dark: bool) -> Palette {
        if dark { Self::DARK } else { Self::LIGHT }
    }
}

fn color((r, g, b): Rgb) -> Color {
    Color::from_rgb(r, g, b)
}

pub fn apply_theme(w: &mut MainWidgets, view: &ViewPreferences) {
    let p = Palette::for_mode(view.dark_mode);
    let size = view.font_size() as i32;

    w.editor.set_color(color(p.background));
    w.editor.set_text_color(color(p.text));
    w.editor.set_cursor_color(color(p.text));
    w.editor.set_selection_color(color(p.selection));
    w.editor.set_linenumber_bgcolor(color(p.gutter_bg));
    w.editor.set_linenumber_fgcolor(color(p.gutter_fg));
    w.editor.set_linenumber_size(size);
    w.editor.set_text_size(size);

    w.window.set_color(color(p.background));
    w.window.set_label_color(color(p.text));

    w.menu.set_color(color(p.toolbar_bg));
    w.menu.set_text_color(color(p.text));
    w.toolbar.set_color(color(p.toolbar_bg));
    for button in w.toolbar_buttons.iter_mut() {
        button.set_color(color(p.button_bg));
        button.set_label_color(color(p.text));
    }

    w.search_input.set_color(color(p.gutter_bg));
    w.search_input.set_text_color(color(p.text));

    w.status_bar.set_color(color(p.status_bg));
    w.status_bar.set_label_color(color(p.status_fg));

    w.terminal.apply_theme(&p, size);

    w.window.redraw();
}
