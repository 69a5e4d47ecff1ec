//! Recording doubles for the hardware and console seams.

use core::convert::Infallible;
use std::collections::VecDeque;
use std::format;
use std::string::{String, ToString};
use std::vec::Vec;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

use crate::config::MAX_CONSOLES;
use crate::console::{ConsoleId, Consoles, TextColor};
use crate::devices::input::{KeyEvent, KeySource};
use crate::kernel::platform::Platform;

pub struct MockPlatform {
    pub calls: Vec<String>,
    fail_at: Option<(&'static str, &'static str)>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self { calls: Vec::new(), fail_at: None }
    }

    pub fn failing_at(step: &'static str, reason: &'static str) -> Self {
        Self { calls: Vec::new(), fail_at: Some((step, reason)) }
    }

    fn record(&mut self, step: &'static str, call: String) -> Result<(), &'static str> {
        self.calls.push(call);
        match self.fail_at {
            Some((failing, reason)) if failing == step => Err(reason),
            _ => Ok(()),
        }
    }
}

impl Platform for MockPlatform {
    fn syscall_init(&mut self) -> Result<(), &'static str> {
        self.record("syscall_init", "syscall_init".to_string())
    }

    fn interrupts_init(&mut self) -> Result<(), &'static str> {
        self.record("interrupts_init", "interrupts_init".to_string())
    }

    fn keyboard_init(&mut self) -> Result<(), &'static str> {
        self.record("keyboard_init", "keyboard_init".to_string())
    }

    fn timer_init(&mut self, frequency_hz: u32) -> Result<(), &'static str> {
        self.record("timer_init", format!("timer_init({})", frequency_hz))
    }

    fn interrupts_enable(&mut self) {
        self.calls.push("interrupts_enable".to_string());
    }

    fn halt(&mut self) {
        self.calls.push("halt".to_string());
    }
}

/// Logs every call and keeps printed text per console.
pub struct RecordingConsoles {
    pub calls: Vec<String>,
    pub printed: Vec<(ConsoleId, String)>,
    active: ConsoleId,
}

impl RecordingConsoles {
    pub fn new() -> Self {
        Self { calls: Vec::new(), printed: Vec::new(), active: 0 }
    }

    pub fn text_on(&self, id: ConsoleId) -> String {
        self.printed
            .iter()
            .filter(|(console, _)| *console == id)
            .map(|(_, text)| text.as_str())
            .collect()
    }
}

impl Consoles for RecordingConsoles {
    fn init(&mut self) {
        self.calls.push("init".to_string());
        self.active = 0;
    }

    fn clear(&mut self, id: ConsoleId) {
        self.calls.push(format!("clear({})", id));
    }

    fn set_text_color(&mut self, id: ConsoleId, fg: TextColor, bg: TextColor) {
        self.calls.push(format!("set_text_color({}, {:?}, {:?})", id, fg, bg));
    }

    fn set_text_color_fg(&mut self, id: ConsoleId, fg: TextColor) {
        self.calls.push(format!("set_text_color_fg({}, {:?})", id, fg));
    }

    fn print(&mut self, id: ConsoleId, text: &str) {
        self.calls.push(format!("print({})", id));
        self.printed.push((id, text.to_string()));
    }

    fn activate(&mut self, id: ConsoleId) {
        self.calls.push(format!("activate({})", id));
        if id < MAX_CONSOLES {
            self.active = id;
        }
    }

    fn active(&self) -> ConsoleId {
        self.active
    }
}

/// Scripted key source.
pub struct ScriptedKeys(pub VecDeque<KeyEvent>);

impl ScriptedKeys {
    pub fn new(keys: &[KeyEvent]) -> Self {
        Self(keys.iter().copied().collect())
    }
}

impl KeySource for ScriptedKeys {
    fn get_key(&mut self) -> Option<KeyEvent> {
        self.0.pop_front()
    }
}

/// Display that accepts and discards every pixel.
pub struct NullDisplay;

impl DrawTarget for NullDisplay {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, _pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        Ok(())
    }
}

impl OriginDimensions for NullDisplay {
    fn size(&self) -> Size {
        Size::new(800, 500)
    }
}
