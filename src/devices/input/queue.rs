//! Lock-free single-producer / single-consumer ring.
//!
//! The keyboard ISR is the only producer and the dispatch loop the only
//! consumer. Neither side ever blocks: a push into a full ring is dropped and
//! counted, a pop from an empty ring returns `None`.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicUsize, Ordering};

use super::events::{KeyEvent, KeySource};

pub struct EventQueue<T: Copy, const N: usize> {
    buf: UnsafeCell<[MaybeUninit<T>; N]>,
    head: AtomicUsize,
    tail: AtomicUsize,
    dropped: AtomicUsize,
}

// Slots between `tail` and `head` belong to the consumer, the rest to the
// producer; the acquire/release pairs on the indices hand them over.
unsafe impl<T: Copy + Send, const N: usize> Sync for EventQueue<T, N> {}

impl<T: Copy, const N: usize> EventQueue<T, N> {
    pub const fn new() -> Self {
        assert!(N >= 2, "an SPSC ring needs at least two slots");
        Self {
            buf: UnsafeCell::new([const { MaybeUninit::uninit() }; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
        }
    }

    /// Producer side. Hands the value back if the ring is full.
    pub fn push(&self, value: T) -> Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) % N;
        if next == self.tail.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return Err(value);
        }
        unsafe {
            (*self.buf.get())[head].write(value);
        }
        self.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Consumer side.
    pub fn pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        let value = unsafe { (*self.buf.get())[tail].assume_init() };
        self.tail.store((tail + 1) % N, Ordering::Release);
        Some(value)
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Acquire) == self.head.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + N - tail) % N
    }

    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Pushes rejected because the ring was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<T: Copy, const N: usize> Default for EventQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> KeySource for &EventQueue<KeyEvent, N> {
    fn get_key(&mut self) -> Option<KeyEvent> {
        self.pop()
    }
}
