//! # PS/2 Keyboard Driver
//!
//! Handles PS/2 keyboard input via IRQ1 interrupt.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    IRQ1     ┌──────────────────┐
//! │  Keyboard   │────────────▶│ ScancodeDecoder  │
//! │  (Port 60)  │             │ - Extended keys  │
//! └─────────────┘             │ - Modifiers      │
//!                             │ - Lock toggles   │
//!                             └────────┬─────────┘
//!                                      │ KeyEvent
//!                                      ▼
//!                             ┌──────────────────┐
//!                             │    KEY_QUEUE     │──▶ get_key()
//!                             │  (SPSC, 64 slots)│
//!                             └──────────────────┘
//! ```
//!
//! ## Scancode Processing
//!
//! 1. IRQ1 handler reads the set-1 scancode from port 0x60
//! 2. `ScancodeDecoder` folds it into a `KeyEvent`:
//!    - 0xE0 prefix for extended keys (arrows, right Ctrl/Alt, ...)
//!    - 0xE1 prefix (Pause) is swallowed
//!    - Bit 7 indicates key release
//!    - Shift/Ctrl/Alt held state, Caps/Num/Scroll lock toggles
//! 3. The event is pushed to `KEY_QUEUE`; the main loop pops it later
//!
//! Both presses and releases are reported, modifiers included.

use bitflags::bitflags;
use log::warn;
use spin::Mutex;
use x86_64::instructions::port::Port;

use crate::config::KEY_QUEUE_CAPACITY;
use crate::interrupts::pic;
use crate::devices::input::{keycode, EventQueue, KeyEvent, Meta};

const DATA_PORT: u16 = 0x60;
const STATUS_PORT: u16 = 0x64;
const STATUS_OUTPUT_FULL: u8 = 0x01;
const KEYBOARD_IRQ: u8 = 1;

pub type KeyQueue = EventQueue<KeyEvent, KEY_QUEUE_CAPACITY>;

/// Decoded events waiting for the dispatch loop.
pub static KEY_QUEUE: KeyQueue = KeyQueue::new();

// Only ever locked from the IRQ1 handler.
static DECODER: Mutex<ScancodeDecoder> = Mutex::new(ScancodeDecoder::new());

/// Drains stale controller output and unmasks IRQ1.
pub fn init() -> Result<(), &'static str> {
    let mut status = Port::<u8>::new(STATUS_PORT);
    let mut data = Port::<u8>::new(DATA_PORT);

    let mut flushed = 0;
    while unsafe { status.read() } & STATUS_OUTPUT_FULL != 0 {
        let _: u8 = unsafe { data.read() };
        flushed += 1;
        if flushed > 64 {
            return Err("keyboard controller output buffer never drains");
        }
    }

    pic::unmask(KEYBOARD_IRQ);
    Ok(())
}

/// Called by the IRQ1 handler with the byte read from port 0x60.
pub fn handle_scancode(scancode: u8) {
    let event = DECODER.lock().process_scancode(scancode);
    if let Some(key) = event {
        if KEY_QUEUE.push(key).is_err() {
            warn!("key queue full, dropped code {:#04x} (total {})", key.code, KEY_QUEUE.dropped());
        }
    }
}

/// Non-blocking poll of the key queue.
pub fn get_key() -> Option<KeyEvent> {
    KEY_QUEUE.pop()
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Held: u8 {
        const SHIFT_LEFT  = 1 << 0;
        const SHIFT_RIGHT = 1 << 1;
        const CTRL_LEFT   = 1 << 2;
        const CTRL_RIGHT  = 1 << 3;
        const ALT_LEFT    = 1 << 4;
        const ALT_RIGHT   = 1 << 5;
    }
}

/// What a scancode means once the prefix and break bit are stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    /// Printable key: code, unshifted char, shifted char.
    Char(u8, u8, u8),
    /// Letter key, subject to Caps Lock as well as Shift.
    Letter(u8),
    /// Keypad digit or dot: char with Num Lock on, navigation code without.
    Keypad(u8, u8),
    Modifier(u8, Held),
    Lock(u8, Meta),
    /// Key with no character.
    Control(u8),
}

pub struct ScancodeDecoder {
    is_extended: bool,
    pause_bytes: u8,
    held: Held,
    locks: Meta,
}

impl ScancodeDecoder {
    pub const fn new() -> Self {
        Self {
            is_extended: false,
            pause_bytes: 0,
            held: Held::empty(),
            locks: Meta::empty(),
        }
    }

    /// Modifier mask as it stands after the last processed scancode.
    pub fn meta(&self) -> Meta {
        let mut meta = self.locks;
        meta.set(Meta::SHIFT, self.held.intersects(Held::SHIFT_LEFT | Held::SHIFT_RIGHT));
        meta.set(Meta::CTRL, self.held.intersects(Held::CTRL_LEFT | Held::CTRL_RIGHT));
        meta.set(Meta::ALT, self.held.intersects(Held::ALT_LEFT | Held::ALT_RIGHT));
        meta
    }

    pub fn process_scancode(&mut self, scancode: u8) -> Option<KeyEvent> {
        // Pause sends E1 1D 45 E1 9D C5 with no release; skip the lot.
        if self.pause_bytes > 0 {
            self.pause_bytes -= 1;
            return None;
        }
        match scancode {
            0xE0 => {
                self.is_extended = true;
                return None;
            }
            0xE1 => {
                self.pause_bytes = 5;
                return None;
            }
            // Controller acks, echo, resend requests and error bytes.
            // 0xAA is left out: it doubles as the left Shift break code.
            0x00 | 0xEE | 0xFA | 0xFC | 0xFD | 0xFE | 0xFF if !self.is_extended => {
                return None;
            }
            _ => {}
        }

        let brk = scancode & 0x80 != 0;
        let make = scancode & 0x7F;
        let extended = core::mem::replace(&mut self.is_extended, false);

        let key = if extended {
            Self::translate_extended(make)?
        } else {
            Self::translate(make)?
        };

        match key {
            Key::Modifier(_, side) => self.held.set(side, !brk),
            Key::Lock(_, lock) if !brk => self.locks.toggle(lock),
            _ => {}
        }

        let meta = self.meta();
        let (code, ch) = self.resolve(key, meta);
        let ch = if meta.intersects(Meta::CTRL | Meta::ALT) { 0 } else { ch };

        Some(KeyEvent { code, ch, meta, brk })
    }

    fn resolve(&self, key: Key, meta: Meta) -> (u8, u8) {
        let shift = meta.contains(Meta::SHIFT);
        match key {
            Key::Char(code, lower, upper) => (code, if shift { upper } else { lower }),
            Key::Letter(code) => {
                if shift != meta.contains(Meta::CAPS_LOCK) {
                    (code, code.to_ascii_uppercase())
                } else {
                    (code, code)
                }
            }
            Key::Keypad(digit, nav) => {
                if meta.contains(Meta::NUM_LOCK) {
                    (digit, digit)
                } else {
                    (nav, 0)
                }
            }
            Key::Modifier(code, _) | Key::Lock(code, _) | Key::Control(code) => (code, 0),
        }
    }

    fn translate(make: u8) -> Option<Key> {
        let key = match make {
            0x01 => Key::Control(keycode::ESCAPE),
            0x02..=0x0A => {
                let digit = make - 0x02 + b'1';
                Key::Char(digit, digit, b"!@#$%^&*("[(make - 0x02) as usize])
            }
            0x0B => Key::Char(b'0', b'0', b')'),
            0x0C => Key::Char(b'-', b'-', b'_'),
            0x0D => Key::Char(b'=', b'=', b'+'),
            0x0E => Key::Control(keycode::BACKSPACE),
            0x0F => Key::Control(keycode::TAB),
            0x10..=0x19 => Key::Letter(b"qwertyuiop"[(make - 0x10) as usize]),
            0x1A => Key::Char(b'[', b'[', b'{'),
            0x1B => Key::Char(b']', b']', b'}'),
            0x1C => Key::Control(keycode::ENTER),
            0x1D => Key::Modifier(keycode::CTRL, Held::CTRL_LEFT),
            0x1E..=0x26 => Key::Letter(b"asdfghjkl"[(make - 0x1E) as usize]),
            0x27 => Key::Char(b';', b';', b':'),
            0x28 => Key::Char(b'\'', b'\'', b'"'),
            0x29 => Key::Char(b'`', b'`', b'~'),
            0x2A => Key::Modifier(keycode::SHIFT_LEFT, Held::SHIFT_LEFT),
            0x2B => Key::Char(b'\\', b'\\', b'|'),
            0x2C..=0x32 => Key::Letter(b"zxcvbnm"[(make - 0x2C) as usize]),
            0x33 => Key::Char(b',', b',', b'<'),
            0x34 => Key::Char(b'.', b'.', b'>'),
            0x35 => Key::Char(b'/', b'/', b'?'),
            0x36 => Key::Modifier(keycode::SHIFT_RIGHT, Held::SHIFT_RIGHT),
            0x37 => Key::Char(keycode::KP_STAR, b'*', b'*'),
            0x38 => Key::Modifier(keycode::ALT, Held::ALT_LEFT),
            0x39 => Key::Char(keycode::SPACE, b' ', b' '),
            0x3A => Key::Lock(keycode::CAPS_LOCK, Meta::CAPS_LOCK),
            0x3B..=0x44 => Key::Control(keycode::F1 + (make - 0x3B)),
            0x45 => Key::Lock(keycode::NUM_LOCK, Meta::NUM_LOCK),
            0x46 => Key::Lock(keycode::SCROLL_LOCK, Meta::SCROLL_LOCK),
            0x47 => Key::Keypad(b'7', keycode::HOME),
            0x48 => Key::Keypad(b'8', keycode::UP),
            0x49 => Key::Keypad(b'9', keycode::PAGE_UP),
            0x4A => Key::Char(b'-', b'-', b'-'),
            0x4B => Key::Keypad(b'4', keycode::LEFT),
            0x4C => Key::Keypad(b'5', keycode::KP_CENTER),
            0x4D => Key::Keypad(b'6', keycode::RIGHT),
            0x4E => Key::Char(b'+', b'+', b'+'),
            0x4F => Key::Keypad(b'1', keycode::END),
            0x50 => Key::Keypad(b'2', keycode::DOWN),
            0x51 => Key::Keypad(b'3', keycode::PAGE_DOWN),
            0x52 => Key::Keypad(b'0', keycode::INSERT),
            0x53 => Key::Keypad(b'.', keycode::DELETE),
            0x57 => Key::Control(keycode::F11),
            0x58 => Key::Control(keycode::F12),
            _ => return None,
        };
        Some(key)
    }

    fn translate_extended(make: u8) -> Option<Key> {
        let key = match make {
            0x1C => Key::Control(keycode::KP_ENTER),
            0x1D => Key::Modifier(keycode::CTRL, Held::CTRL_RIGHT),
            0x35 => Key::Char(keycode::KP_SLASH, b'/', b'/'),
            0x38 => Key::Modifier(keycode::ALT, Held::ALT_RIGHT),
            0x47 => Key::Control(keycode::HOME),
            0x48 => Key::Control(keycode::UP),
            0x49 => Key::Control(keycode::PAGE_UP),
            0x4B => Key::Control(keycode::LEFT),
            0x4D => Key::Control(keycode::RIGHT),
            0x4F => Key::Control(keycode::END),
            0x50 => Key::Control(keycode::DOWN),
            0x51 => Key::Control(keycode::PAGE_DOWN),
            0x52 => Key::Control(keycode::INSERT),
            0x53 => Key::Control(keycode::DELETE),
            // E0 2A / E0 36 are the fake shifts around Print Screen
            _ => return None,
        };
        Some(key)
    }
}

impl Default for ScancodeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(decoder: &mut ScancodeDecoder, bytes: &[u8]) -> std::vec::Vec<KeyEvent> {
        bytes.iter().filter_map(|&b| decoder.process_scancode(b)).collect()
    }

    #[test]
    fn letter_press_and_release() {
        let mut d = ScancodeDecoder::new();
        let events = feed(&mut d, &[0x1E, 0x9E]);
        assert_eq!(
            events,
            [
                KeyEvent::press(b'a', b'a', Meta::empty()),
                KeyEvent::release(b'a', b'a', Meta::empty()),
            ]
        );
    }

    #[test]
    fn shift_changes_char_but_not_code() {
        let mut d = ScancodeDecoder::new();
        let events = feed(&mut d, &[0x2A, 0x03, 0xAA]);
        assert_eq!(events[0], KeyEvent::press(keycode::SHIFT_LEFT, 0, Meta::SHIFT));
        assert_eq!(events[1], KeyEvent::press(b'2', b'@', Meta::SHIFT));
        assert_eq!(events[2], KeyEvent::release(keycode::SHIFT_LEFT, 0, Meta::empty()));
    }

    #[test]
    fn caps_lock_toggles_letters_only() {
        let mut d = ScancodeDecoder::new();
        feed(&mut d, &[0x3A, 0xBA]);
        assert!(d.meta().contains(Meta::CAPS_LOCK));

        let q = feed(&mut d, &[0x10]);
        assert_eq!(q[0].ch, b'Q');
        let one = feed(&mut d, &[0x02]);
        assert_eq!(one[0].ch, b'1');

        // Shift inverts caps for letters
        let q = feed(&mut d, &[0x36, 0x10]);
        assert_eq!(q[1].ch, b'q');

        feed(&mut d, &[0xB6, 0x3A, 0xBA]);
        assert!(!d.meta().contains(Meta::CAPS_LOCK));
    }

    #[test]
    fn alt_digit_has_no_char() {
        let mut d = ScancodeDecoder::new();
        let events = feed(&mut d, &[0x38, 0x03, 0x83, 0xB8]);
        assert_eq!(events[1], KeyEvent::press(b'2', 0, Meta::ALT));
        assert_eq!(events[2], KeyEvent::release(b'2', 0, Meta::ALT));
        assert_eq!(events[3], KeyEvent::release(keycode::ALT, 0, Meta::empty()));
    }

    #[test]
    fn right_alt_is_extended_and_tracked_separately() {
        let mut d = ScancodeDecoder::new();
        feed(&mut d, &[0x38, 0xE0, 0x38]);
        assert!(d.meta().contains(Meta::ALT));
        feed(&mut d, &[0xB8]);
        assert!(d.meta().contains(Meta::ALT), "right alt still held");
        feed(&mut d, &[0xE0, 0xB8]);
        assert!(!d.meta().contains(Meta::ALT));
    }

    #[test]
    fn extended_arrows_and_fake_shift() {
        let mut d = ScancodeDecoder::new();
        let events = feed(&mut d, &[0xE0, 0x48, 0xE0, 0xC8, 0xE0, 0x2A]);
        assert_eq!(
            events,
            [
                KeyEvent::press(keycode::UP, 0, Meta::empty()),
                KeyEvent::release(keycode::UP, 0, Meta::empty()),
            ]
        );
        assert!(!d.meta().contains(Meta::SHIFT));
    }

    #[test]
    fn keypad_follows_num_lock() {
        let mut d = ScancodeDecoder::new();
        assert_eq!(feed(&mut d, &[0x4F])[0], KeyEvent::press(keycode::END, 0, Meta::empty()));
        feed(&mut d, &[0x45, 0xC5]);
        let events = feed(&mut d, &[0x4F]);
        assert_eq!(events[0], KeyEvent::press(b'1', b'1', Meta::NUM_LOCK));
    }

    #[test]
    fn pause_sequence_is_swallowed() {
        let mut d = ScancodeDecoder::new();
        let events = feed(&mut d, &[0xE1, 0x1D, 0x45, 0xE1, 0x9D, 0xC5, 0x1E]);
        assert_eq!(events, [KeyEvent::press(b'a', b'a', Meta::empty())]);
        assert!(!d.meta().contains(Meta::CTRL));
    }

    #[test]
    fn controller_bytes_and_unknown_codes_are_ignored() {
        let mut d = ScancodeDecoder::new();
        assert!(feed(&mut d, &[0xFA, 0xFE, 0x00, 0x59, 0x7F]).is_empty());
    }

    #[test]
    fn ctrl_suppresses_char() {
        let mut d = ScancodeDecoder::new();
        let events = feed(&mut d, &[0x1D, 0x2E]);
        assert_eq!(events[1], KeyEvent::press(b'c', 0, Meta::CTRL));
    }
}
