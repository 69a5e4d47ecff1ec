//! Device Subsystem
//!
//! Hardware device drivers and abstractions:
//! - `drivers`: PS/2 keyboard driver
//! - `framebuffer`: Graphics output via linear framebuffer
//! - `input`: Key event types and the ISR → main loop queue

pub mod drivers;
pub mod framebuffer;
pub mod input;
