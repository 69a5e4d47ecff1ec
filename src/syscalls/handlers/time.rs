//! # Time System Call Handlers
//!
//! - `sys_ticks`: timer interrupts since boot
//! - `sys_uptime_ms`: the same count in milliseconds
//!
//! Resolution is one PIT period, `1000 / TIMER_HZ` ms.

use crate::config::TIMER_HZ;
use crate::interrupts::timer;
use crate::syscalls::dispatcher::SyscallResult;

pub fn sys_ticks() -> SyscallResult {
    Ok(timer::ticks())
}

pub fn sys_uptime_ms() -> SyscallResult {
    Ok(ticks_to_ms(timer::ticks()))
}

fn ticks_to_ms(ticks: u64) -> u64 {
    ticks.saturating_mul(1000) / u64::from(TIMER_HZ)
}
