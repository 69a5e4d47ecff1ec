//! # System Call Handlers
//!
//! Each handler takes its arguments already decoded from registers and
//! returns a [`SyscallResult`](super::dispatcher::SyscallResult).

pub mod time;
