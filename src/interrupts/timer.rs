//! 8253/8254 PIT channel 0 as the periodic tick source.

use core::sync::atomic::{AtomicU64, Ordering};

use x86_64::instructions::port::Port;

use crate::interrupts::pic;

const PIT_FREQUENCY_HZ: u32 = 1_193_182;
const CHANNEL0_PORT: u16 = 0x40;
const COMMAND_PORT: u16 = 0x43;
/// Channel 0, lobyte/hibyte access, mode 3 (square wave), binary.
const CHANNEL0_SQUARE_WAVE: u8 = 0x36;
const TIMER_IRQ: u8 = 0;

pub static TIMER_TICKS: AtomicU64 = AtomicU64::new(0);

/// Programs channel 0 to fire `frequency_hz` times a second and unmasks IRQ0.
pub fn init(frequency_hz: u32) -> Result<(), &'static str> {
    let divisor = pit_divisor(frequency_hz)?;

    let mut command = Port::<u8>::new(COMMAND_PORT);
    let mut channel0 = Port::<u8>::new(CHANNEL0_PORT);
    unsafe {
        command.write(CHANNEL0_SQUARE_WAVE);
        channel0.write((divisor & 0xFF) as u8);
        channel0.write((divisor >> 8) as u8);
    }

    pic::unmask(TIMER_IRQ);
    Ok(())
}

/// Reload value for the requested rate, clamped to what 16 bits can hold.
pub fn pit_divisor(frequency_hz: u32) -> Result<u16, &'static str> {
    if frequency_hz == 0 {
        return Err("timer frequency must be non-zero");
    }
    Ok((PIT_FREQUENCY_HZ / frequency_hz).clamp(1, u16::MAX as u32) as u16)
}

/// Called from the IRQ0 handler.
pub fn tick() {
    TIMER_TICKS.fetch_add(1, Ordering::Relaxed);
}

pub fn ticks() -> u64 {
    TIMER_TICKS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_hertz_divisor() {
        assert_eq!(pit_divisor(20), Ok(59659));
    }

    #[test]
    fn divisor_is_clamped() {
        assert_eq!(pit_divisor(1), Ok(u16::MAX));
        assert_eq!(pit_divisor(5_000_000), Ok(1));
        assert!(pit_divisor(0).is_err());
    }
}
