//! The 16-entry text palette shared by every virtual console.

use crate::devices::framebuffer::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TextColor {
    Black = 0x0,
    Blue = 0x1,
    Green = 0x2,
    Cyan = 0x3,
    Red = 0x4,
    Magenta = 0x5,
    Brown = 0x6,
    LightGray = 0x7,
    Gray = 0x8,
    LightBlue = 0x9,
    LightGreen = 0xA,
    LightCyan = 0xB,
    LightRed = 0xC,
    LightMagenta = 0xD,
    Yellow = 0xE,
    White = 0xF,
}

impl TextColor {
    const ALL: [TextColor; 16] = [
        TextColor::Black,
        TextColor::Blue,
        TextColor::Green,
        TextColor::Cyan,
        TextColor::Red,
        TextColor::Magenta,
        TextColor::Brown,
        TextColor::LightGray,
        TextColor::Gray,
        TextColor::LightBlue,
        TextColor::LightGreen,
        TextColor::LightCyan,
        TextColor::LightRed,
        TextColor::LightMagenta,
        TextColor::Yellow,
        TextColor::White,
    ];

    /// Color for the low four bits of `nibble`.
    pub const fn from_nibble(nibble: u8) -> Self {
        Self::ALL[(nibble & 0xF) as usize]
    }

    /// Parses the single hex digit used by the `ESC [ X ]` color escape.
    pub fn from_hex_digit(digit: u8) -> Option<Self> {
        let value = match digit {
            b'0'..=b'9' => digit - b'0',
            b'a'..=b'f' => digit - b'a' + 10,
            b'A'..=b'F' => digit - b'A' + 10,
            _ => return None,
        };
        Some(Self::from_nibble(value))
    }

    pub fn rgb(self) -> Color {
        match self {
            TextColor::Black => Color::BLACK,
            TextColor::Blue => Color::from_hex(0x0000AA),
            TextColor::Green => Color::from_hex(0x00AA00),
            TextColor::Cyan => Color::from_hex(0x00AAAA),
            TextColor::Red => Color::from_hex(0xAA0000),
            TextColor::Magenta => Color::from_hex(0xAA00AA),
            TextColor::Brown => Color::from_hex(0xAA5500),
            TextColor::LightGray => Color::from_hex(0xAAAAAA),
            TextColor::Gray => Color::from_hex(0x555555),
            TextColor::LightBlue => Color::from_hex(0x5555FF),
            TextColor::LightGreen => Color::from_hex(0x55FF55),
            TextColor::LightCyan => Color::from_hex(0x55FFFF),
            TextColor::LightRed => Color::from_hex(0xFF5555),
            TextColor::LightMagenta => Color::from_hex(0xFF55FF),
            TextColor::Yellow => Color::from_hex(0xFFFF55),
            TextColor::White => Color::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_digits_map_onto_palette_order() {
        assert_eq!(TextColor::from_hex_digit(b'2'), Some(TextColor::Green));
        assert_eq!(TextColor::from_hex_digit(b'e'), Some(TextColor::Yellow));
        assert_eq!(TextColor::from_hex_digit(b'F'), Some(TextColor::White));
        assert_eq!(TextColor::from_hex_digit(b'-'), None);
        for n in 0..16u8 {
            assert_eq!(TextColor::from_nibble(n) as u8, n);
        }
    }
}
