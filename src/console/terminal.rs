//! # Virtual Console Buffer
//!
//! One text screen: a fixed grid of cells plus cursor, colors and the color
//! escape parser. Every virtual console owns one `Terminal`; only the active
//! console's is ever rendered.
//!
//! ## Performance
//!
//! - **Ring buffer for lines**: scrolling rotates the top-line index instead
//!   of copying cells
//! - **Dirty line tracking**: only changed lines are re-rendered
//! - **Batch rendering**: adjacent cells with the same colors are drawn as
//!   one text run
//!
//! ## Escapes
//!
//! | Sequence      | Effect                                        |
//! |---------------|-----------------------------------------------|
//! | `ESC [ X ]`   | foreground = palette entry `X` (hex digit)    |
//! | `ESC [ - ]`   | foreground = the console's configured color   |
//!
//! Anything else after `ESC` is dropped.

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyleBuilder},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

use crate::config::{CHAR_HEIGHT, CHAR_WIDTH, CONSOLE_COLS, CONSOLE_ROWS};
use crate::console::text_color::TextColor;

const TAB_WIDTH: usize = 8;
const CURSOR_HEIGHT: u32 = 2;

/// A single character cell with foreground and background colors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: u8,
    pub fg: TextColor,
    pub bg: TextColor,
}

impl Cell {
    #[inline]
    pub const fn blank(fg: TextColor, bg: TextColor) -> Self {
        Self { ch: b' ', fg, bg }
    }
}

#[derive(Clone, Copy)]
struct Line {
    cells: [Cell; CONSOLE_COLS],
    dirty: bool,
}

impl Line {
    const fn new(fg: TextColor, bg: TextColor) -> Self {
        Self { cells: [Cell::blank(fg, bg); CONSOLE_COLS], dirty: true }
    }

    fn clear(&mut self, fg: TextColor, bg: TextColor) {
        self.cells = [Cell::blank(fg, bg); CONSOLE_COLS];
        self.dirty = true;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Escape {
    Ground,
    Esc,
    Bracket,
    /// Saw the color field; `None` means `-` (restore).
    Color(Option<TextColor>),
}

pub struct Terminal {
    lines: [Line; CONSOLE_ROWS],
    /// Index of the top visible line in the ring buffer
    top_line: usize,
    cursor_x: usize,
    cursor_y: usize,
    last_cursor: (usize, usize),
    fg: TextColor,
    bg: TextColor,
    /// Foreground restored by `ESC [ - ]`
    base_fg: TextColor,
    escape: Escape,
}

impl Terminal {
    pub const DEFAULT_FG: TextColor = TextColor::LightGray;
    pub const DEFAULT_BG: TextColor = TextColor::Black;

    pub const fn new() -> Self {
        Self {
            lines: [Line::new(Self::DEFAULT_FG, Self::DEFAULT_BG); CONSOLE_ROWS],
            top_line: 0,
            cursor_x: 0,
            cursor_y: 0,
            last_cursor: (0, 0),
            fg: Self::DEFAULT_FG,
            bg: Self::DEFAULT_BG,
            base_fg: Self::DEFAULT_FG,
            escape: Escape::Ground,
        }
    }

    pub fn cursor_position(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    /// Configured (not escape-overridden) colors.
    pub fn colors(&self) -> (TextColor, TextColor) {
        (self.base_fg, self.bg)
    }

    /// Cell at a screen position, `None` outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= CONSOLE_COLS || y >= CONSOLE_ROWS {
            return None;
        }
        Some(self.lines[self.line_index(y)].cells[x])
    }

    /// Characters of screen row `y`, trailing blanks included.
    pub fn row_bytes(&self, y: usize) -> [u8; CONSOLE_COLS] {
        let mut out = [b' '; CONSOLE_COLS];
        if y < CONSOLE_ROWS {
            let line = &self.lines[self.line_index(y)];
            for (dst, cell) in out.iter_mut().zip(line.cells.iter()) {
                *dst = cell.ch;
            }
        }
        out
    }

    pub fn set_colors(&mut self, fg: TextColor, bg: TextColor) {
        self.fg = fg;
        self.base_fg = fg;
        self.bg = bg;
    }

    pub fn set_fg(&mut self, fg: TextColor) {
        self.fg = fg;
        self.base_fg = fg;
    }

    /// Blanks every cell with the current background and homes the cursor.
    pub fn clear(&mut self) {
        let (fg, bg) = (self.fg, self.bg);
        for line in &mut self.lines {
            line.clear(fg, bg);
        }
        self.top_line = 0;
        self.cursor_x = 0;
        self.cursor_y = 0;
    }

    /// Back to the power-on state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Forces every line to be drawn on the next render.
    pub fn invalidate(&mut self) {
        for line in &mut self.lines {
            line.dirty = true;
        }
    }

    pub fn has_dirty_lines(&self) -> bool {
        self.lines.iter().any(|l| l.dirty)
    }

    #[inline]
    fn line_index(&self, screen_y: usize) -> usize {
        (self.top_line + screen_y) % CONSOLE_ROWS
    }

    #[inline]
    fn mark_line_dirty(&mut self, y: usize) {
        if y < CONSOLE_ROWS {
            let idx = self.line_index(y);
            self.lines[idx].dirty = true;
        }
    }

    // =========================================================================
    // TEXT OUTPUT
    // =========================================================================

    pub fn write(&mut self, text: &str) {
        for ch in text.chars() {
            let byte = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.process_byte(byte);
        }
    }

    fn process_byte(&mut self, byte: u8) {
        self.escape = match (self.escape, byte) {
            (Escape::Ground, 0x1b) => Escape::Esc,
            (Escape::Ground, _) => {
                self.control_or_print(byte);
                Escape::Ground
            }
            (Escape::Esc, b'[') => Escape::Bracket,
            (Escape::Bracket, b'-') => Escape::Color(None),
            (Escape::Bracket, digit) => match TextColor::from_hex_digit(digit) {
                Some(color) => Escape::Color(Some(color)),
                None => Escape::Ground,
            },
            (Escape::Color(color), b']') => {
                self.fg = color.unwrap_or(self.base_fg);
                Escape::Ground
            }
            _ => Escape::Ground,
        };
    }

    fn control_or_print(&mut self, byte: u8) {
        match byte {
            b'\n' => self.newline(),
            b'\r' => self.cursor_x = 0,
            0x08 => self.backspace(),
            b'\t' => {
                let next_tab = (self.cursor_x / TAB_WIDTH + 1) * TAB_WIDTH;
                self.cursor_x = next_tab.min(CONSOLE_COLS - 1);
            }
            0x20..=0x7e => self.put_char(byte),
            _ => {}
        }
    }

    fn put_char(&mut self, ch: u8) {
        if self.cursor_x >= CONSOLE_COLS {
            self.newline();
        }

        let new_cell = Cell { ch, fg: self.fg, bg: self.bg };
        let idx = self.line_index(self.cursor_y);
        let line = &mut self.lines[idx];
        if line.cells[self.cursor_x] != new_cell {
            line.cells[self.cursor_x] = new_cell;
            line.dirty = true;
        }

        self.cursor_x += 1;
    }

    fn newline(&mut self) {
        self.cursor_x = 0;
        self.cursor_y += 1;

        if self.cursor_y >= CONSOLE_ROWS {
            self.scroll_up();
            self.cursor_y = CONSOLE_ROWS - 1;
        }
    }

    fn scroll_up(&mut self) {
        // The old top line becomes the new, blank bottom line
        let old_top = self.top_line;
        self.top_line = (self.top_line + 1) % CONSOLE_ROWS;
        let (fg, bg) = (self.fg, self.bg);
        self.lines[old_top].clear(fg, bg);

        // Every line moved on screen
        self.invalidate();
    }

    fn backspace(&mut self) {
        if self.cursor_x > 0 {
            self.cursor_x -= 1;
        } else if self.cursor_y > 0 {
            self.cursor_y -= 1;
            self.cursor_x = CONSOLE_COLS - 1;
        } else {
            return;
        }

        let idx = self.line_index(self.cursor_y);
        self.lines[idx].cells[self.cursor_x] = Cell::blank(self.fg, self.bg);
        self.lines[idx].dirty = true;
    }

    // =========================================================================
    // RENDERING
    // =========================================================================

    /// Draws the dirty lines and the cursor onto `target`.
    pub fn render<D>(&mut self, target: &mut D)
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let (last_x, last_y) = self.last_cursor;
        if last_x < CONSOLE_COLS {
            self.mark_line_dirty(last_y);
        }
        self.mark_line_dirty(self.cursor_y);

        for screen_y in 0..CONSOLE_ROWS {
            let idx = self.line_index(screen_y);
            if !self.lines[idx].dirty {
                continue;
            }
            self.render_line(target, screen_y, idx);
            self.lines[idx].dirty = false;
        }

        if self.cursor_x < CONSOLE_COLS {
            let px = (self.cursor_x * CHAR_WIDTH) as i32;
            let py = ((self.cursor_y + 1) * CHAR_HEIGHT) as i32 - CURSOR_HEIGHT as i32;
            Rectangle::new(Point::new(px, py), Size::new(CHAR_WIDTH as u32, CURSOR_HEIGHT))
                .into_styled(PrimitiveStyle::with_fill(self.fg.rgb().to_rgb888()))
                .draw(target)
                .ok();
        }

        self.last_cursor = (self.cursor_x, self.cursor_y);
    }

    /// Render a single line with run-length batching
    fn render_line<D>(&self, target: &mut D, screen_y: usize, line_idx: usize)
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let line = &self.lines[line_idx];
        let py = (screen_y * CHAR_HEIGHT) as i32;

        let mut x = 0usize;
        while x < CONSOLE_COLS {
            let first = line.cells[x];
            let start_x = x;
            let mut run = [0u8; CONSOLE_COLS];
            let mut run_len = 0usize;
            let mut has_text = false;

            while x < CONSOLE_COLS && line.cells[x].fg == first.fg && line.cells[x].bg == first.bg {
                run[run_len] = line.cells[x].ch;
                has_text |= line.cells[x].ch != b' ';
                run_len += 1;
                x += 1;
            }

            let px = (start_x * CHAR_WIDTH) as i32;
            Rectangle::new(
                Point::new(px, py),
                Size::new((run_len * CHAR_WIDTH) as u32, CHAR_HEIGHT as u32),
            )
            .into_styled(PrimitiveStyle::with_fill(first.bg.rgb().to_rgb888()))
            .draw(target)
            .ok();

            if has_text {
                if let Ok(text) = core::str::from_utf8(&run[..run_len]) {
                    let style = MonoTextStyleBuilder::new()
                        .font(&FONT_10X20)
                        .text_color(first.fg.rgb().to_rgb888())
                        .build();
                    Text::with_baseline(text, Point::new(px, py), style, Baseline::Top)
                        .draw(target)
                        .ok();
                }
            }
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}
