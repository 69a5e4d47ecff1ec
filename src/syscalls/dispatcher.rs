use log::trace;

use crate::syscalls::handlers;
use crate::syscalls::numbers::SyscallNumber;

/// System call result type
pub type SyscallResult = Result<u64, SyscallError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallError {
    NotImplemented,
}

impl SyscallError {
    pub fn as_errno(self) -> i64 {
        match self {
            Self::NotImplemented => -38, // ENOSYS
        }
    }
}

/// Registers captured by the entry stub.
///
/// `syscall` convention: rax = number, rdi/rsi/rdx = first three arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallContext {
    pub syscall_num: u64,
    pub arg0: u64,
    pub arg1: u64,
    pub arg2: u64,
}

impl SyscallContext {
    pub const fn from_registers(rax: u64, rdi: u64, rsi: u64, rdx: u64) -> Self {
        Self {
            syscall_num: rax,
            arg0: rdi,
            arg1: rsi,
            arg2: rdx,
        }
    }
}

pub fn dispatch_syscall(ctx: SyscallContext) -> SyscallResult {
    let syscall = SyscallNumber::from(ctx.syscall_num);
    trace!(
        "SYSCALL: {:?}({:#x}, {:#x}, {:#x})",
        syscall,
        ctx.arg0,
        ctx.arg1,
        ctx.arg2
    );

    match syscall {
        SyscallNumber::Ticks => handlers::time::sys_ticks(),
        SyscallNumber::Uptime => handlers::time::sys_uptime_ms(),
        SyscallNumber::Unknown => Err(SyscallError::NotImplemented),
    }
}

/// Folds a result into the value returned in `rax`: the value itself, or a
/// negative errno.
pub fn to_raw(result: SyscallResult) -> i64 {
    match result {
        Ok(value) => value as i64,
        Err(err) => err.as_errno(),
    }
}
