//! # Key Event Types
//!
//! A [`KeyEvent`] is one decoded keyboard transition. The keyboard driver
//! produces them; the dispatch loop consumes each exactly once through a
//! [`KeySource`].
//!
//! ## Key codes
//!
//! Printable keys use their unshifted ASCII value, so the `2` key is `b'2'`
//! whatever the shift state. Keys with no ASCII form use codes from `0x80`
//! upwards (see [`keycode`]).

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held (or lock keys toggled on) when the event was decoded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Meta: u8 {
        const SHIFT       = 1 << 0;
        const CTRL        = 1 << 1;
        const ALT         = 1 << 2;
        const CAPS_LOCK   = 1 << 3;
        const NUM_LOCK    = 1 << 4;
        const SCROLL_LOCK = 1 << 5;
    }
}

/// Alt modifier bit, the one the console-switch gesture keys on.
pub const META_ALT: Meta = Meta::ALT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key code (ASCII for printable keys, `keycode::*` otherwise).
    pub code: u8,
    /// Resolved character, 0 when the key has none in the current state.
    pub ch: u8,
    pub meta: Meta,
    /// `true` for a release, `false` for a press.
    pub brk: bool,
}

impl KeyEvent {
    pub const fn press(code: u8, ch: u8, meta: Meta) -> Self {
        Self { code, ch, meta, brk: false }
    }

    pub const fn release(code: u8, ch: u8, meta: Meta) -> Self {
        Self { code, ch, meta, brk: true }
    }

    pub fn is_press(&self) -> bool {
        !self.brk
    }
}

/// Non-blocking supplier of key events, oldest first.
pub trait KeySource {
    /// Next queued event, or `None` when nothing is pending.
    fn get_key(&mut self) -> Option<KeyEvent>;
}

/// Codes for keys without an ASCII representation.
pub mod keycode {
    pub const BACKSPACE: u8 = 0x08;
    pub const TAB: u8 = b'\t';
    pub const ENTER: u8 = b'\n';
    pub const SPACE: u8 = b' ';

    pub const ESCAPE: u8 = 0x80;
    pub const CTRL: u8 = 0x81;
    pub const SHIFT_LEFT: u8 = 0x82;
    pub const SHIFT_RIGHT: u8 = 0x83;
    pub const ALT: u8 = 0x84;
    pub const CAPS_LOCK: u8 = 0x85;
    pub const NUM_LOCK: u8 = 0x86;
    pub const SCROLL_LOCK: u8 = 0x87;
    pub const KP_STAR: u8 = 0x88;

    /// F1 is `F1`, F10 is `F1 + 9`; F11/F12 follow.
    pub const F1: u8 = 0x90;
    pub const F11: u8 = 0x9A;
    pub const F12: u8 = 0x9B;

    pub const UP: u8 = 0xA0;
    pub const DOWN: u8 = 0xA1;
    pub const LEFT: u8 = 0xA2;
    pub const RIGHT: u8 = 0xA3;
    pub const HOME: u8 = 0xA4;
    pub const END: u8 = 0xA5;
    pub const PAGE_UP: u8 = 0xA6;
    pub const PAGE_DOWN: u8 = 0xA7;
    pub const INSERT: u8 = 0xA8;
    pub const DELETE: u8 = 0xA9;
    pub const KP_ENTER: u8 = 0xAA;
    pub const KP_SLASH: u8 = 0xAB;
    pub const KP_CENTER: u8 = 0xAC;
}
