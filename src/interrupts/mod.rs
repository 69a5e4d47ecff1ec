//! # Interrupt Handling Module
//!
//! Provides interrupt infrastructure for the kernel including:
//!
//! - **GDT**: Global Descriptor Table with TSS for stack switching
//! - **IDT**: Interrupt Descriptor Table with exception and hardware interrupt handlers
//! - **PIC**: 8259 Programmable Interrupt Controller initialization and EOI
//! - **Timer**: PIT programming and tick tracking
//!
//! ## Interrupt Vector Layout
//!
//! | Vector | Type                   | Handler                    |
//! |--------|------------------------|----------------------------|
//! | 0-31   | CPU Exceptions         | divide, page fault, etc.   |
//! | 32     | Timer (IRQ0)           | timer_interrupt_handler    |
//! | 33     | Keyboard (IRQ1)        | keyboard_interrupt_handler |
//!
//! ## Usage
//!
//! ```ignore
//! use crate::interrupts;
//! interrupts::gdt::init();  // once, at entry
//! interrupts::init();       // IDT + PIC, interrupts still off
//! interrupts::enable();
//! loop { interrupts::halt(); /* ... */ }
//! ```

use crate::interrupts::interrupts::init_idt;

pub mod gdt;
pub mod interrupts;
pub mod pic;
pub mod timer;

/// Loads the IDT and remaps the PICs. Interrupts stay disabled.
pub fn init() -> Result<(), &'static str> {
    if x86_64::instructions::interrupts::are_enabled() {
        return Err("interrupts enabled before the IDT was loaded");
    }
    init_idt();
    pic::init();
    Ok(())
}

pub fn enable() {
    x86_64::instructions::interrupts::enable();
}

/// Parks the CPU until the next interrupt.
pub fn halt() {
    x86_64::instructions::hlt();
}
