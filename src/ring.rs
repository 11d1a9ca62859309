//! Round-robin record buffer
//!
//! Keeps the last `capacity` records of a repeating measurement, e.g. a
//! sensor log. Storage is allocated once; when full, each add overwrites
//! the oldest record. No errors, no notification on overwrite.
//!
//! Two ways to walk the live records, oldest to newest:
//! - [`CircularBuffer::iter`] borrows the buffer and yields `(slot, &T)`.
//! - [`CircularBuffer::iter_begin`] / [`CircularBuffer::iter_next`] keep one
//!   resumable cursor inside the buffer, for loops that are spread over
//!   several main-loop passes.
//!
//! Author: Moroya Sakamoto

use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::error::Error;

/// Fixed-capacity overwrite-oldest buffer
pub struct CircularBuffer<T> {
    /// Record storage; grows to `capacity` once, then is written in place
    slots: Vec<T>,
    /// Number of slots (≥ 2)
    capacity: usize,
    /// Most recently written slot (None = empty)
    write: Option<usize>,
    /// Set once the write cursor has lapped back to slot 0
    wrapped: bool,
    /// Cursor of the active `iter_begin` session (None = not iterating)
    read: Option<usize>,
}

impl<T> CircularBuffer<T> {
    /// Allocate a buffer holding `capacity` records
    ///
    /// Capacities below 2 are a misconfiguration and rejected.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity <= 1 {
            warn!("circular buffer capacity {} rejected, need at least 2", capacity);
            return Err(Error::InvalidCapacity);
        }
        Ok(Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            write: None,
            wrapped: false,
            read: None,
        })
    }

    #[inline(always)]
    fn incr(&self, slot: usize) -> usize {
        (slot + 1) % self.capacity
    }

    /// Add a record, overwriting the oldest one when full
    ///
    /// Returns the slot index written.
    pub fn add(&mut self, record: T) -> usize {
        let slot = match self.write {
            Some(prev) => {
                let next = self.incr(prev);
                if next < prev {
                    self.wrapped = true;
                }
                next
            }
            None => 0,
        };

        if slot < self.slots.len() {
            self.slots[slot] = record;
        } else {
            self.slots.push(record);
        }
        self.write = Some(slot);
        slot
    }

    /// Most recently added record
    pub fn most_recent(&self) -> Option<&T> {
        self.write.map(|slot| &self.slots[slot])
    }

    /// Slot of the oldest live record
    fn oldest(&self) -> Option<usize> {
        let write = self.write?;
        if self.wrapped {
            Some(self.incr(write))
        } else {
            Some(0)
        }
    }

    /// Start a cursor session at the oldest live record
    ///
    /// Returns `None` if nothing has been added yet.
    pub fn iter_begin(&mut self) -> Option<(usize, &T)> {
        self.read = self.oldest();
        self.read.map(|slot| (slot, &self.slots[slot]))
    }

    /// Advance the cursor session
    ///
    /// Returns `None` once the newest record has been returned, or if no
    /// session was started. The session then stays finished until the next
    /// [`iter_begin`](Self::iter_begin).
    pub fn iter_next(&mut self) -> Option<(usize, &T)> {
        let (Some(read), Some(write)) = (self.read, self.write) else {
            self.read = None;
            return None;
        };

        // Single record: already returned by iter_begin
        if !self.wrapped && write == 0 {
            self.read = None;
            return None;
        }

        if read != write {
            let slot = self.incr(read);
            self.read = Some(slot);
            Some((slot, &self.slots[slot]))
        } else {
            self.read = None;
            None
        }
    }

    /// Borrowing iterator over live records, oldest first
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            next: self.oldest(),
            remaining: self.len(),
        }
    }

    /// Drop all live records; storage and capacity are kept
    pub fn clear(&mut self) {
        self.slots.clear();
        self.write = None;
        self.wrapped = false;
        self.read = None;
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Nothing added yet (or cleared)?
    pub fn is_empty(&self) -> bool {
        self.write.is_none()
    }

    /// Every slot holds a live record?
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Fixed number of slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Has the write cursor lapped at least once?
    pub fn has_wrapped(&self) -> bool {
        self.wrapped
    }
}

impl<'a, T> IntoIterator for &'a CircularBuffer<T> {
    type Item = (usize, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`CircularBuffer::iter`]
pub struct Iter<'a, T> {
    buffer: &'a CircularBuffer<T>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.next?;
        self.remaining -= 1;
        self.next = if Some(slot) == self.buffer.write {
            None
        } else {
            Some(self.buffer.incr(slot))
        };
        Some((slot, &self.buffer.slots[slot]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: fmt::Display> fmt::Display for CircularBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "no records");
        }
        for (slot, record) in self {
            writeln!(f, "[{}] {}", slot, record)?;
        }
        Ok(())
    }
}
