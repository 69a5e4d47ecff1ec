//! # Input Device Module
//!
//! Key events and the queue that carries them out of interrupt context.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   push (IRQ1)   ┌──────────────┐
//! │  Keyboard    │────────────────▶│  EventQueue  │
//! │  ISR         │                 │  (SPSC ring) │
//! └──────────────┘                 └──────┬───────┘
//!                                         │ get_key()
//!                                         ▼
//!                                 ┌──────────────────┐
//!                                 │  Dispatch loop   │
//!                                 │  (KeySource)     │
//!                                 └──────────────────┘
//! ```

/// Key event and modifier types
pub mod events;
pub mod queue;

pub use events::*;
pub use queue::EventQueue;
