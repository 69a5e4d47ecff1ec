//! # System Call Interface
//!
//! Fast `syscall`/`sysret` entry. `init` enables the extension in EFER and
//! programs the three MSRs:
//!
//! | MSR    | Value                                         |
//! |--------|-----------------------------------------------|
//! | STAR   | kernel CS/SS on entry, user CS/SS on `sysret` |
//! | LSTAR  | `syscall_entry`                               |
//! | SFMASK | IF, so handlers start with interrupts off     |
//!
//! `sysretq` always returns to ring 3, so `syscall_entry` only becomes
//! reachable once user mode exists; kernel code never executes `syscall`.
//! Until then the stub is a placeholder: it stays on the caller's stack and
//! does not swap GS.

pub mod dispatcher;
pub mod handlers;
pub mod numbers;

use core::arch::global_asm;

use log::debug;
use x86_64::registers::model_specific::{Efer, EferFlags, LStar, SFMask, Star};
use x86_64::registers::rflags::RFlags;
use x86_64::VirtAddr;

use crate::interrupts::gdt;
use dispatcher::{dispatch_syscall, to_raw, SyscallContext};

global_asm!(
    ".global syscall_entry",
    "syscall_entry:",
    "push rcx",
    "push r11",
    "push rbp",
    "mov rbp, rsp",
    "and rsp, -16",
    "mov rcx, rdx",
    "mov rdx, rsi",
    "mov rsi, rdi",
    "mov rdi, rax",
    "call {dispatch}",
    "mov rsp, rbp",
    "pop rbp",
    "pop r11",
    "pop rcx",
    "sysretq",
    dispatch = sym syscall_dispatch,
);

extern "C" {
    fn syscall_entry();
}

extern "C" fn syscall_dispatch(rax: u64, rdi: u64, rsi: u64, rdx: u64) -> i64 {
    to_raw(dispatch_syscall(SyscallContext::from_registers(rax, rdi, rsi, rdx)))
}

/// Initialize syscall support. The GDT must already be loaded.
pub fn init() -> Result<(), &'static str> {
    let selectors = gdt::selectors();
    Star::write(
        selectors.user_code,
        selectors.user_data,
        selectors.kernel_code,
        selectors.kernel_data,
    )
    .map_err(|_| "GDT selectors not in STAR order")?;
    LStar::write(VirtAddr::new(syscall_entry as usize as u64));
    SFMask::write(RFlags::INTERRUPT_FLAG);

    unsafe {
        Efer::update(|flags| flags.insert(EferFlags::SYSTEM_CALL_EXTENSIONS));
    }

    debug!("syscall entry at {:#x}", syscall_entry as usize);
    Ok(())
}
