//! Kernel core: boot sequencing and the steady-state event loop.
pub mod dispatch;
pub mod init;
pub mod platform;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::{drain, handle_key, run, switch_target, CONSOLE_ACTIVATED};
pub use init::{boot, BootError, WELCOME_BANNER};
pub use platform::{Platform, X86Platform};
pub use status::{InitStatus, StatusTable};
