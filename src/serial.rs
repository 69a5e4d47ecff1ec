//! COM1 serial output and the `println!` macro.

use spin::{Lazy, Mutex};
use uart_16550::SerialPort;

pub static SERIAL: Lazy<Mutex<SerialPort>> = Lazy::new(|| {
    let mut port = unsafe { SerialPort::new(0x3F8) };
    port.init();
    Mutex::new(port)
});

#[macro_export]
macro_rules! println {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        $crate::serial::without_interrupts(|| {
            let mut serial = $crate::serial::SERIAL.lock();
            let _ = writeln!(serial, $($arg)*);
        });
    }};
}

/// Runs `f` with interrupts masked so an ISR that logs cannot spin on the
/// port lock held by the code it interrupted.
#[cfg(not(test))]
pub fn without_interrupts<R>(f: impl FnOnce() -> R) -> R {
    x86_64::instructions::interrupts::without_interrupts(f)
}

// Host tests run in user mode where `cli`/`sti` fault.
#[cfg(test)]
pub fn without_interrupts<R>(f: impl FnOnce() -> R) -> R {
    f()
}
