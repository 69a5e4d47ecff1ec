//! # Framebuffer Graphics Module
//!
//! Provides framebuffer access for the console renderer.
//!
//! ## Modules
//!
//! - `framebuffer`: `FramebufferWriter`, an embedded-graphics `DrawTarget`
//!   over the linear framebuffer handed over by the bootloader
//! - `color`: `Color` type with common color constants

pub mod framebuffer;
pub mod color;
