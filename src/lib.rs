//! MonkOS kernel library.
//!
//! Everything except the bootloader entry point lives here so that the
//! hardware-independent parts (key decoding, the event queue, virtual
//! consoles, the boot sequencer and dispatch loop) can be unit-tested on the
//! host with `cargo test --lib`.

#![cfg_attr(not(test), no_std)]
#![feature(abi_x86_interrupt)]

pub mod config;
pub mod console;
pub mod devices;
pub mod format;
pub mod interrupts;
pub mod kernel;
pub mod logger;
pub mod serial;
pub mod syscalls;
