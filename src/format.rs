//! Allocation-free formatting for console output.

use core::fmt::{self, Write};

use crate::devices::input::KeyEvent;

/// `fmt::Write` sink over a borrowed byte slice. A write that does not fit
/// fails as a whole and leaves earlier output intact.
pub struct FmtBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> FmtBuf<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        FmtBuf { buf, pos: 0 }
    }

    pub fn into_str(self) -> &'a str {
        let FmtBuf { buf, pos } = self;
        // Only whole `&str`s are ever copied in.
        unsafe { core::str::from_utf8_unchecked(&buf[..pos]) }
    }
}

impl<'a> Write for FmtBuf<'a> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        if self.pos + bytes.len() > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }
}

/// Lowercase hex digit for `value` in `0..=15`. Callers mask first; anything
/// larger still yields a character, just not a hex one.
#[inline]
pub const fn hexchar(value: u8) -> char {
    if value <= 9 {
        (value + b'0') as char
    } else {
        (value.wrapping_sub(10).wrapping_add(b'a')) as char
    }
}

/// Room for the longest diagnostic line, including a non-ASCII `ch`.
pub const KEY_LINE_CAPACITY: usize = 40;

/// Renders the per-event diagnostic line:
///
/// ```text
/// Keycode: ESC[B]CC ESC[-] meta=MM 'c'\n     (ch != 0)
/// Keycode: ESC[B]CC ESC[-] meta=MM\n         (ch == 0)
/// ```
///
/// `B` is the console color nibble for the code field: `e` (yellow) for a
/// release, `2` (green) for a press.
pub fn format_key_line<'a>(
    buf: &'a mut [u8; KEY_LINE_CAPACITY],
    key: &KeyEvent,
) -> Result<&'a str, fmt::Error> {
    let brk = if key.brk { 'e' } else { '2' };
    let meta = key.meta.bits();
    let mut f = FmtBuf::new(buf);
    write!(
        f,
        "Keycode: \x1b[{}]{}{}\x1b[-] meta={}{}",
        brk,
        hexchar(key.code >> 4),
        hexchar(key.code & 0xf),
        hexchar(meta >> 4),
        hexchar(meta & 0xf),
    )?;
    if key.ch != 0 {
        write!(f, " '{}'", key.ch as char)?;
    }
    f.write_char('\n')?;
    Ok(f.into_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::input::Meta;

    fn line(key: KeyEvent) -> std::string::String {
        let mut buf = [0u8; KEY_LINE_CAPACITY];
        format_key_line(&mut buf, &key).unwrap().into()
    }

    #[test]
    fn hexchar_covers_every_nibble() {
        let digits: std::string::String = (0u8..16).map(hexchar).collect();
        assert_eq!(digits, "0123456789abcdef");
    }

    #[test]
    fn press_with_character() {
        let key = KeyEvent { code: 0x1E, ch: b'a', meta: Meta::empty(), brk: false };
        assert_eq!(line(key), "Keycode: \x1b[2]1e\x1b[-] meta=00 'a'\n");
    }

    #[test]
    fn release_without_character() {
        let key = KeyEvent { code: b'2', ch: 0, meta: Meta::ALT, brk: true };
        assert_eq!(line(key), "Keycode: \x1b[e]32\x1b[-] meta=04\n");
    }

    #[test]
    fn layout_is_fixed_width() {
        let a = line(KeyEvent { code: 0x00, ch: 0, meta: Meta::empty(), brk: false });
        let b = line(KeyEvent { code: 0xff, ch: 0, meta: Meta::all(), brk: true });
        assert_eq!(a.len(), b.len());
        assert_eq!(a.len(), 28);

        let c = line(KeyEvent { code: 0x80, ch: b'~', meta: Meta::SHIFT, brk: false });
        assert_eq!(c.len(), 32);
        assert_eq!(&c[9..13], "\x1b[2]");
        assert_eq!(&c[13..15], "80");
        assert_eq!(&c[25..27], "01");
        assert!(c.ends_with(" '~'\n"));
    }

    #[test]
    fn fmt_buf_refuses_to_overflow() {
        let mut buf = [0u8; 4];
        let mut f = FmtBuf::new(&mut buf);
        assert!(write!(f, "{}", "too long").is_err());
        assert_eq!(f.into_str(), "");

        let mut buf = [0u8; 8];
        let mut f = FmtBuf::new(&mut buf);
        write!(f, "{}-{}", 1, 2).unwrap();
        assert_eq!(f.into_str(), "1-2");
    }
}
