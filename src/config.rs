//! # Kernel Configuration
//!
//! Compile-time knobs. There is no runtime configuration source at this
//! layer: no command line, no environment, nothing persisted.

use log::LevelFilter;

/// Number of virtual consoles owned by the console multiplexer.
pub const MAX_CONSOLES: usize = 4;

/// PIT tick rate. Also the upper bound on how long the main loop sleeps.
pub const TIMER_HZ: u32 = 20;

/// Slots in the keyboard ISR → main loop queue. One slot stays empty to
/// tell "full" from "empty", so the usable depth is one less.
pub const KEY_QUEUE_CAPACITY: usize = 64;

/// Text grid of each virtual console.
pub const CONSOLE_COLS: usize = 80;
pub const CONSOLE_ROWS: usize = 25;

/// Font cell size in pixels (`FONT_10X20`).
pub const CHAR_WIDTH: usize = 10;
pub const CHAR_HEIGHT: usize = 20;

/// Maximum level forwarded to the serial logger.
pub const LOG_LEVEL: LevelFilter = LevelFilter::Debug;

/// Kernel stack requested from the bootloader.
pub const KERNEL_STACK_SIZE: u64 = 256 * 1024;
