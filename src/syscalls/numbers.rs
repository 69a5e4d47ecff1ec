//! System call numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum SyscallNumber {
    /// Timer interrupts since boot.
    Ticks = 0,
    /// Milliseconds since boot, derived from the tick count.
    Uptime = 1,

    Unknown = u64::MAX,
}

impl From<u64> for SyscallNumber {
    fn from(num: u64) -> Self {
        match num {
            0 => Self::Ticks,
            1 => Self::Uptime,
            _ => Self::Unknown,
        }
    }
}
