//! Hardware seam between the kernel core and the x86_64 machine.
//!
//! The boot sequencer and dispatch loop only see [`Platform`]; [`X86Platform`]
//! is the real implementation, tests substitute a recorder.

use crate::devices::drivers::ps2_keyboard;
use crate::devices::input::{KeyEvent, KeySource};
use crate::interrupts;
use crate::syscalls;

/// One-shot machine setup plus the idle primitive.
pub trait Platform {
    fn syscall_init(&mut self) -> Result<(), &'static str>;
    /// Interrupt tables and controller; leaves interrupts disabled.
    fn interrupts_init(&mut self) -> Result<(), &'static str>;
    fn keyboard_init(&mut self) -> Result<(), &'static str>;
    fn timer_init(&mut self, frequency_hz: u32) -> Result<(), &'static str>;
    fn interrupts_enable(&mut self);
    /// Sleeps until any interrupt arrives.
    fn halt(&mut self);
}

/// PC hardware: PIC, PIT, PS/2 keyboard, `syscall` MSRs.
pub struct X86Platform;

impl Platform for X86Platform {
    fn syscall_init(&mut self) -> Result<(), &'static str> {
        syscalls::init()
    }

    fn interrupts_init(&mut self) -> Result<(), &'static str> {
        interrupts::init()
    }

    fn keyboard_init(&mut self) -> Result<(), &'static str> {
        ps2_keyboard::init()
    }

    fn timer_init(&mut self, frequency_hz: u32) -> Result<(), &'static str> {
        interrupts::timer::init(frequency_hz)
    }

    fn interrupts_enable(&mut self) {
        interrupts::enable();
    }

    fn halt(&mut self) {
        interrupts::halt();
    }
}

impl KeySource for X86Platform {
    fn get_key(&mut self) -> Option<KeyEvent> {
        ps2_keyboard::get_key()
    }
}
