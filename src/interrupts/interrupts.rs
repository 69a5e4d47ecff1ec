//! # Interrupt Descriptor Table and Handlers
//!
//! Defines the IDT and all interrupt/exception handlers for the kernel.
//!
//! ## Exception Handlers
//!
//! | Exception              | Action                              |
//! |------------------------|-------------------------------------|
//! | Breakpoint (#BP)       | Log and continue                    |
//! | Page Fault (#PF)       | Panic with CR2 and error code       |
//! | Divide Error (#DE)     | Panic                               |
//! | Invalid Opcode (#UD)   | Panic                               |
//! | General Protection     | Panic with error code               |
//! | Double Fault (#DF)     | Panic (uses IST stack)              |
//!
//! ## Hardware Interrupts
//!
//! | IRQ  | Vector | Handler                              |
//! |------|--------|--------------------------------------|
//! | IRQ0 | 32     | Timer (increments tick)              |
//! | IRQ1 | 33     | Keyboard (decode + enqueue KeyEvent) |
//!
//! Both hardware handlers exist to wake the main loop out of `hlt`; only
//! the keyboard one produces anything it will look at.

use log::warn;
use spin::Lazy;
use x86_64::instructions::port::Port;
use x86_64::structures::idt::{InterruptDescriptorTable, InterruptStackFrame, PageFaultErrorCode};

use crate::devices::drivers::ps2_keyboard;
use crate::interrupts::{gdt, pic, pic::InterruptIndex, timer};

static IDT: Lazy<InterruptDescriptorTable> = Lazy::new(|| {
    let mut idt = InterruptDescriptorTable::new();

    // CPU EXCEPTIONS (0-31)
    idt.breakpoint.set_handler_fn(breakpoint_handler);
    idt.page_fault.set_handler_fn(page_fault_handler);
    idt.divide_error.set_handler_fn(divide_error_handler);
    idt.invalid_opcode.set_handler_fn(invalid_opcode_handler);
    idt.general_protection_fault.set_handler_fn(general_protection_fault_handler);
    // Double fault needs its own stack to avoid cascading failures
    unsafe {
        idt.double_fault
            .set_handler_fn(double_fault_handler)
            .set_stack_index(gdt::DOUBLE_FAULT_IST_INDEX);
    }
    // HARDWARE INTERRUPTS (32-47 after remapping)
    idt[InterruptIndex::Timer.as_u8()].set_handler_fn(timer_interrupt_handler);
    idt[InterruptIndex::Keyboard.as_u8()].set_handler_fn(keyboard_interrupt_handler);

    idt
});

pub fn init_idt() {
    IDT.load();
}

extern "x86-interrupt" fn breakpoint_handler(stack_frame: InterruptStackFrame) {
    warn!("breakpoint at {:#x}", stack_frame.instruction_pointer.as_u64());
}

extern "x86-interrupt" fn divide_error_handler(stack_frame: InterruptStackFrame) {
    panic!("divide error\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn invalid_opcode_handler(stack_frame: InterruptStackFrame) {
    panic!("invalid opcode\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn general_protection_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: u64,
) {
    panic!("general protection fault ({:#x})\n{:#?}", error_code, stack_frame);
}

extern "x86-interrupt" fn double_fault_handler(stack_frame: InterruptStackFrame, error_code: u64) -> ! {
    panic!("double fault ({:#x})\n{:#?}", error_code, stack_frame);
}

// Nothing is paged in on demand, so any page fault is a kernel bug.
extern "x86-interrupt" fn page_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: PageFaultErrorCode,
) {
    use x86_64::registers::control::Cr2;

    panic!(
        "page fault at {:?} ({:?})\n{:#?}",
        Cr2::read(),
        error_code,
        stack_frame
    );
}

extern "x86-interrupt" fn timer_interrupt_handler(_stack_frame: InterruptStackFrame) {
    timer::tick();
    pic::end_of_interrupt(InterruptIndex::Timer);
}

extern "x86-interrupt" fn keyboard_interrupt_handler(_stack_frame: InterruptStackFrame) {
    let mut port = Port::<u8>::new(0x60);
    let scancode: u8 = unsafe { port.read() };

    ps2_keyboard::handle_scancode(scancode);

    pic::end_of_interrupt(InterruptIndex::Keyboard);
}
