//! # Programmable Interrupt Controller (8259 PIC)
//!
//! Configures the legacy 8259 PIC chips for interrupt routing.
//!
//! ## PIC Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │   PIC 1     │     │   PIC 2     │
//! │  (Master)   │────▶│  (Slave)    │
//! │ IRQ 0-7     │     │ IRQ 8-15    │
//! └─────────────┘     └─────────────┘
//!       │
//!       ▼
//!     CPU
//! ```
//!
//! ## Vector Remapping
//!
//! By default, IRQ 0-15 conflict with CPU exception vectors.
//! We remap them:
//! - PIC 1: vectors 32-39 (IRQ 0-7)
//! - PIC 2: vectors 40-47 (IRQ 8-15)
//!
//! Every line starts masked; drivers unmask their own IRQ in `init`.
//!
//! ## Interrupt Assignments
//!
//! | IRQ | Vector | Device    |
//! |-----|--------|-----------|
//! | 0   | 32     | Timer     |
//! | 1   | 33     | Keyboard  |

use pic8259::ChainedPics;
use spin::Mutex;

pub const PIC_1_OFFSET: u8 = 32; // Primary PIC handles IRQs 0-7
pub const PIC_2_OFFSET: u8 = 40; // Secondary PIC handles IRQs 8-15
const CASCADE_IRQ: u8 = 2;

pub static PICS: Mutex<ChainedPics> =
    Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

// Interrupt indices - these are the actual vector numbers the CPU sees
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum InterruptIndex {
    Timer = PIC_1_OFFSET,        // 32 - IRQ0
    Keyboard = PIC_1_OFFSET + 1, // 33 - IRQ1
}

impl InterruptIndex {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Remaps both chips and masks every line.
pub fn init() {
    let mut pics = PICS.lock();
    unsafe {
        pics.initialize();
        pics.write_masks(0xFF, 0xFF);
    }
}

/// Lets `irq` (0-15) through. Lines on the secondary chip also open the
/// cascade line on the primary.
pub fn unmask(irq: u8) {
    let mut pics = PICS.lock();
    let [primary, secondary] = unmasked(unsafe { pics.read_masks() }, irq);
    unsafe { pics.write_masks(primary, secondary) };
}

fn unmasked(masks: [u8; 2], irq: u8) -> [u8; 2] {
    let [mut primary, mut secondary] = masks;
    if irq < 8 {
        primary &= !(1 << irq);
    } else {
        secondary &= !(1 << (irq & 7));
        primary &= !(1 << CASCADE_IRQ);
    }
    [primary, secondary]
}

pub fn end_of_interrupt(index: InterruptIndex) {
    unsafe {
        PICS.lock().notify_end_of_interrupt(index.as_u8());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_lines_clear_one_bit() {
        assert_eq!(unmasked([0xFF, 0xFF], 0), [0xFE, 0xFF]);
        assert_eq!(unmasked([0xFE, 0xFF], 1), [0xFC, 0xFF]);
    }

    #[test]
    fn secondary_lines_open_the_cascade() {
        assert_eq!(unmasked([0xFF, 0xFF], 12), [0xFB, 0xEF]);
    }

    #[test]
    fn vectors_follow_the_remap() {
        assert_eq!(InterruptIndex::Timer.as_u8(), 32);
        assert_eq!(InterruptIndex::Keyboard.as_u8(), 33);
    }
}
