//! Steady-state event loop: sleep until an interrupt, then drain every
//! queued key event.

use log::{trace, warn};

use crate::console::{ConsoleId, Consoles};
use crate::devices::input::{KeyEvent, KeySource, META_ALT};
use crate::format::{format_key_line, KEY_LINE_CAPACITY};
use crate::kernel::platform::Platform;

pub const CONSOLE_ACTIVATED: &str = "Console activated.\n";

/// Target console of an Alt+'1'..'4' press, if `key` is one.
pub fn switch_target(key: &KeyEvent) -> Option<ConsoleId> {
    if !key.is_press() || !key.meta.contains(META_ALT) {
        return None;
    }
    match key.code {
        b'1'..=b'4' => Some((key.code - b'1') as ConsoleId),
        _ => None,
    }
}

/// Prints the diagnostic line for `key` on the active console, then applies
/// the console-switch gesture. The two are checked independently.
pub fn handle_key<C: Consoles>(consoles: &mut C, key: &KeyEvent) {
    let mut buf = [0u8; KEY_LINE_CAPACITY];
    match format_key_line(&mut buf, key) {
        Ok(line) => {
            let active = consoles.active();
            consoles.print(active, line);
        }
        Err(_) => warn!("diagnostic line overflow for {:?}", key),
    }

    if let Some(id) = switch_target(key) {
        consoles.activate(id);
        consoles.print(id, CONSOLE_ACTIVATED);
    }
}

/// Handles queued events oldest first until the source is empty.
pub fn drain<K, C>(keys: &mut K, consoles: &mut C) -> usize
where
    K: KeySource,
    C: Consoles,
{
    let mut handled = 0;
    while let Some(key) = keys.get_key() {
        handle_key(consoles, &key);
        handled += 1;
    }
    if handled > 0 {
        trace!("drained {} key events", handled);
    }
    handled
}

/// One halt/drain cycle.
pub fn step<P, K, C>(platform: &mut P, keys: &mut K, consoles: &mut C) -> usize
where
    P: Platform,
    K: KeySource,
    C: Consoles,
{
    platform.halt();
    drain(keys, consoles)
}

pub fn run<P, K, C>(platform: &mut P, keys: &mut K, consoles: &mut C) -> !
where
    P: Platform,
    K: KeySource,
    C: Consoles,
{
    loop {
        step(platform, keys, consoles);
    }
}
