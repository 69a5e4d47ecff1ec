//! # Virtual Consoles
//!
//! `MAX_CONSOLES` independent text screens sharing one display. Output can
//! go to any console; only the *active* one is drawn, and switching redraws
//! it in full.
//!
//! ## Layout
//!
//! ```text
//! ConsoleMux
//! ├── Terminal 0  ◀── active (rendered to the display)
//! ├── Terminal 1
//! ├── Terminal 2
//! └── Terminal 3
//! ```
//!
//! The kernel talks to the multiplexer through the [`Consoles`] trait so the
//! boot sequencer and dispatch loop can be driven by a mock in tests.

pub mod terminal;
pub mod text_color;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use log::{debug, warn};

use crate::config::MAX_CONSOLES;

pub use terminal::{Cell, Terminal};
pub use text_color::TextColor;

/// Index of a virtual console, `0..MAX_CONSOLES`.
pub type ConsoleId = usize;

/// Operations the kernel core needs from the console subsystem.
pub trait Consoles {
    /// Resets every console and makes console 0 active.
    fn init(&mut self);
    fn clear(&mut self, id: ConsoleId);
    fn set_text_color(&mut self, id: ConsoleId, fg: TextColor, bg: TextColor);
    fn set_text_color_fg(&mut self, id: ConsoleId, fg: TextColor);
    fn print(&mut self, id: ConsoleId, text: &str);
    /// Makes `id` the visible console. Activating the active console is
    /// allowed and changes nothing.
    fn activate(&mut self, id: ConsoleId);
    fn active(&self) -> ConsoleId;
}

pub struct ConsoleMux<D> {
    consoles: [Terminal; MAX_CONSOLES],
    active: ConsoleId,
    display: Option<D>,
}

impl<D> ConsoleMux<D>
where
    D: DrawTarget<Color = Rgb888>,
{
    /// Multiplexer with no display attached; output is buffered only.
    pub const fn new() -> Self {
        Self {
            consoles: [const { Terminal::new() }; MAX_CONSOLES],
            active: 0,
            display: None,
        }
    }

    pub fn with_display(display: D) -> Self {
        let mut mux = Self::new();
        mux.display = Some(display);
        mux
    }

    pub fn console(&self, id: ConsoleId) -> Option<&Terminal> {
        self.consoles.get(id)
    }

    pub fn display(&self) -> Option<&D> {
        self.display.as_ref()
    }

    fn terminal_mut(&mut self, id: ConsoleId, op: &str) -> Option<&mut Terminal> {
        let terminal = self.consoles.get_mut(id);
        if terminal.is_none() {
            warn!("console {}: no such console ({} ignored)", id, op);
        }
        terminal
    }

    /// Pushes pending changes of the active console to the display.
    fn refresh(&mut self, id: ConsoleId) {
        if id != self.active {
            return;
        }
        if let Some(display) = self.display.as_mut() {
            self.consoles[id].render(display);
        }
    }

    fn redraw_active(&mut self) {
        let active = self.active;
        if let Some(display) = self.display.as_mut() {
            let (_, bg) = self.consoles[active].colors();
            display.clear(bg.rgb().to_rgb888()).ok();
        }
        self.consoles[active].invalidate();
        self.refresh(active);
    }
}

impl<D> Default for ConsoleMux<D>
where
    D: DrawTarget<Color = Rgb888>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Consoles for ConsoleMux<D>
where
    D: DrawTarget<Color = Rgb888>,
{
    fn init(&mut self) {
        for terminal in &mut self.consoles {
            terminal.reset();
        }
        self.active = 0;
        self.redraw_active();
    }

    fn clear(&mut self, id: ConsoleId) {
        if let Some(terminal) = self.terminal_mut(id, "clear") {
            terminal.clear();
            self.refresh(id);
        }
    }

    fn set_text_color(&mut self, id: ConsoleId, fg: TextColor, bg: TextColor) {
        if let Some(terminal) = self.terminal_mut(id, "set_text_color") {
            terminal.set_colors(fg, bg);
        }
    }

    fn set_text_color_fg(&mut self, id: ConsoleId, fg: TextColor) {
        if let Some(terminal) = self.terminal_mut(id, "set_text_color_fg") {
            terminal.set_fg(fg);
        }
    }

    fn print(&mut self, id: ConsoleId, text: &str) {
        if let Some(terminal) = self.terminal_mut(id, "print") {
            terminal.write(text);
            self.refresh(id);
        }
    }

    fn activate(&mut self, id: ConsoleId) {
        if self.terminal_mut(id, "activate").is_none() {
            return;
        }
        debug!("console {} -> {}", self.active, id);
        self.active = id;
        self.redraw_active();
    }

    fn active(&self) -> ConsoleId {
        self.active
    }
}
