//! Character grid driven by a VT escape-sequence parser.
//!
//! Covers the VT100 subset a shell prompt and line-oriented tools need:
//! printing, CR/LF/BS/TAB, cursor movement, erase, insert/delete chars,
//! scroll regions and scrollback. Colors and attributes are dropped since
//! the pane renders plain text in the theme's colors.

use std::collections::VecDeque;

use unicode_width::UnicodeWidthChar;
use vte::{Params, Parser, Perform};

const TAB_WIDTH: usize = 8;
/// Occupies the right half of a double-width character.
const WIDE_FILLER: char = '\0';

/// Plain-text snapshot of the screen for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Byte offset of the cursor in `text`.
    pub cursor: usize,
}

pub struct Screen {
    grid: Grid,
    parser: Parser,
}

impl Screen {
    pub fn new(rows: usize, cols: usize, max_scrollback: usize) -> Self {
        Self {
            grid: Grid::new(rows.max(1), cols.max(1), max_scrollback),
            parser: Parser::new(),
        }
    }

    pub fn process(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.parser.advance(&mut self.grid, byte);
        }
    }

    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.grid.resize(rows.max(1), cols.max(1));
    }

    pub fn size(&self) -> (usize, usize) {
        (self.grid.rows, self.grid.cols)
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.grid.cursor_y, self.grid.cursor_x)
    }

    pub fn title(&self) -> Option<&str> {
        self.grid.title.as_deref()
    }

    /// Text of one visible row with trailing blanks removed.
    pub fn row_text(&self, y: usize) -> String {
        self.grid
            .cells
            .get(y)
            .map(|row| row_string(row).trim_end().to_string())
            .unwrap_or_default()
    }

    pub fn scrollback_len(&self) -> usize {
        self.grid.scrollback.len()
    }

    /// Wipe the screen and scrollback, e.g. after the shell exits.
    pub fn clear(&mut self) {
        self.grid.scrollback.clear();
        self.grid.erase_display(2);
        self.parser = Parser::new();
    }

    /// Scrollback followed by the screen. Trailing blank rows are dropped
    /// but the cursor row is always kept.
    pub fn render(&self) -> Rendered {
        let mut text = String::new();
        for line in &self.grid.scrollback {
            text.push_str(line);
            text.push('\n');
        }

        let last_content = (0..self.grid.rows)
            .rev()
            .find(|&y| !self.row_text(y).is_empty())
            .unwrap_or(0);
        let last_row = last_content.max(self.grid.cursor_y);

        let mut cursor = 0;
        for y in 0..=last_row {
            let mut line = self.row_text(y);
            if y == self.grid.cursor_y {
                let row = &self.grid.cells[y];
                let before_cursor = row_string(&row[..self.grid.cursor_x.min(row.len())]);
                // Only blanks were trimmed past the cursor, so pad back up to it
                if line.len() < before_cursor.len() {
                    line = before_cursor.clone();
                }
                cursor = text.len() + before_cursor.len();
            }
            text.push_str(&line);
            if y < last_row {
                text.push('\n');
            }
        }

        Rendered { text, cursor }
    }
}

fn row_string(cells: &[char]) -> String {
    cells.iter().filter(|&&c| c != WIDE_FILLER).collect()
}

struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<char>>,
    cursor_x: usize,
    cursor_y: usize,
    scroll_top: usize,
    scroll_bot: usize,
    saved_cursor: (usize, usize),
    scrollback: VecDeque<String>,
    max_scrollback: usize,
    title: Option<String>,
}

impl Grid {
    fn new(rows: usize, cols: usize, max_scrollback: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![' '; cols]; rows],
            cursor_x: 0,
            cursor_y: 0,
            scroll_top: 0,
            scroll_bot: rows - 1,
            saved_cursor: (0, 0),
            scrollback: VecDeque::new(),
            max_scrollback,
            title: None,
        }
    }

    fn resize(&mut self, rows: usize, cols: usize) {
        for row in &mut self.cells {
            row.resize(cols, ' ');
        }
        // Blank rows below the cursor go first, then the top rows move into
        // scrollback until the cursor fits.
        while self.cells.len() > rows
            && self.cells.len() - 1 > self.cursor_y
            && self.cells.last().is_some_and(|row| row.iter().all(|&c| c == ' '))
        {
            self.cells.pop();
        }
        while self.cells.len() > rows {
            let row = self.cells.remove(0);
            self.push_scrollback(row);
            self.cursor_y = self.cursor_y.saturating_sub(1);
        }
        while self.cells.len() < rows {
            self.cells.push(vec![' '; cols]);
        }
        self.rows = rows;
        self.cols = cols;
        self.scroll_top = 0;
        self.scroll_bot = rows - 1;
        self.cursor_x = self.cursor_x.min(cols - 1);
        self.cursor_y = self.cursor_y.min(rows - 1);
    }

    fn push_scrollback(&mut self, row: Vec<char>) {
        if self.max_scrollback == 0 {
            return;
        }
        let line = row_string(&row);
        self.scrollback.push_back(line.trim_end().to_string());
        while self.scrollback.len() > self.max_scrollback {
            self.scrollback.pop_front();
        }
    }

    fn put_char(&mut self, ch: char) {
        if self.cursor_x >= self.cols {
            self.cursor_x = 0;
            self.newline();
        }
        let width = ch.width().unwrap_or(1).clamp(1, 2);
        if width == 2 && self.cursor_x + 1 >= self.cols {
            self.cursor_x = 0;
            self.newline();
        }

        let (x, cols) = (self.cursor_x, self.cols);
        let row = &mut self.cells[self.cursor_y];
        // Overwriting either half of a wide char blanks the other half
        if row[x] == WIDE_FILLER && x > 0 {
            row[x - 1] = ' ';
        }
        if x + width < cols && row[x + width] == WIDE_FILLER {
            row[x + width] = ' ';
        }
        row[x] = ch;
        if width == 2 && x + 1 < cols {
            row[x + 1] = WIDE_FILLER;
        }
        self.cursor_x += width;
    }

    fn newline(&mut self) {
        if self.cursor_y == self.scroll_bot {
            self.scroll_up(1);
        } else if self.cursor_y + 1 < self.rows {
            self.cursor_y += 1;
        }
    }

    fn scroll_up(&mut self, n: usize) {
        for _ in 0..n {
            let row = self.cells.remove(self.scroll_top);
            // Only lines leaving the top of the full screen are history
            if self.scroll_top == 0 {
                self.push_scrollback(row);
            }
            self.cells.insert(self.scroll_bot, vec![' '; self.cols]);
        }
    }

    fn scroll_down(&mut self, n: usize) {
        for _ in 0..n {
            self.cells.remove(self.scroll_bot);
            self.cells.insert(self.scroll_top, vec![' '; self.cols]);
        }
    }

    fn erase_line(&mut self, mode: u16) {
        let x = self.cursor_x.min(self.cols);
        let row = &mut self.cells[self.cursor_y];
        let range = match mode {
            0 => x..row.len(),
            1 => 0..(x + 1).min(row.len()),
            2 => 0..row.len(),
            _ => return,
        };
        row[range].fill(' ');
    }

    fn erase_display(&mut self, mode: u16) {
        match mode {
            0 => {
                self.erase_line(0);
                for row in self.cells.iter_mut().skip(self.cursor_y + 1) {
                    row.fill(' ');
                }
            }
            1 => {
                for row in self.cells.iter_mut().take(self.cursor_y) {
                    row.fill(' ');
                }
                self.erase_line(1);
            }
            2 | 3 => {
                for row in &mut self.cells {
                    row.fill(' ');
                }
                self.cursor_x = 0;
                self.cursor_y = 0;
            }
            _ => {}
        }
    }

    fn delete_chars(&mut self, n: usize) {
        let x = self.cursor_x.min(self.cols);
        let row = &mut self.cells[self.cursor_y];
        let n = n.min(row.len() - x);
        row.drain(x..x + n);
        row.extend(std::iter::repeat_n(' ', n));
    }

    fn insert_chars(&mut self, n: usize) {
        let x = self.cursor_x.min(self.cols);
        let cols = self.cols;
        let row = &mut self.cells[self.cursor_y];
        for _ in 0..n.min(cols - x) {
            row.insert(x, ' ');
        }
        row.truncate(cols);
    }

    fn move_to(&mut self, row: usize, col: usize) {
        self.cursor_y = row.min(self.rows - 1);
        self.cursor_x = col.min(self.cols - 1);
    }
}

impl Perform for Grid {
    fn print(&mut self, ch: char) {
        self.put_char(ch);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' | 0x0B | 0x0C => self.newline(),
            b'\r' => self.cursor_x = 0,
            b'\t' => {
                self.cursor_x = ((self.cursor_x / TAB_WIDTH + 1) * TAB_WIDTH).min(self.cols - 1);
            }
            0x08 => self.cursor_x = self.cursor_x.saturating_sub(1),
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        // DEC private modes (cursor visibility, bracketed paste, ...) do not affect the grid
        if intermediates.first() == Some(&b'?') {
            return;
        }

        let ps: Vec<u16> = params.iter().map(|p| p[0]).collect();
        let raw = |i: usize| ps.get(i).copied().unwrap_or(0);
        let count = |i: usize| ps.get(i).copied().unwrap_or(1).max(1) as usize;

        match action {
            'A' => self.cursor_y = self.cursor_y.saturating_sub(count(0)),
            'B' => self.cursor_y = (self.cursor_y + count(0)).min(self.rows - 1),
            'C' => self.cursor_x = (self.cursor_x + count(0)).min(self.cols - 1),
            'D' => self.cursor_x = self.cursor_x.saturating_sub(count(0)),
            'H' | 'f' => self.move_to(count(0) - 1, count(1) - 1),
            'G' => self.move_to(self.cursor_y, count(0) - 1),
            'd' => self.move_to(count(0) - 1, self.cursor_x),
            'J' => self.erase_display(raw(0)),
            'K' => self.erase_line(raw(0)),
            'P' => self.delete_chars(count(0)),
            '@' => self.insert_chars(count(0)),
            'S' => self.scroll_up(count(0)),
            'T' => self.scroll_down(count(0)),
            'r' => {
                let top = count(0) - 1;
                let bot = ps.get(1).map_or(self.rows, |&b| b as usize).clamp(1, self.rows) - 1;
                if top < bot {
                    self.scroll_top = top;
                    self.scroll_bot = bot;
                    self.move_to(0, 0);
                }
            }
            's' => self.saved_cursor = (self.cursor_y, self.cursor_x),
            'u' => self.move_to(self.saved_cursor.0, self.saved_cursor.1),
            _ => {}
        }
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, byte: u8) {
        match byte {
            b'7' => self.saved_cursor = (self.cursor_y, self.cursor_x),
            b'8' => self.move_to(self.saved_cursor.0, self.saved_cursor.1),
            // Reverse index
            b'M' => {
                if self.cursor_y == self.scroll_top {
                    self.scroll_down(1);
                } else {
                    self.cursor_y = self.cursor_y.saturating_sub(1);
                }
            }
            _ => {}
        }
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        if let [kind, title, ..] = params {
            if *kind == b"0" || *kind == b"2" {
                self.title = Some(String::from_utf8_lossy(title).into_owned());
            }
        }
    }
}
