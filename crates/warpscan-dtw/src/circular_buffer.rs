//! Fixed-capacity ring buffer used as the monotonic deque of the envelope builder.

/// Double-ended queue over a preallocated ring. Never grows.
#[derive(Debug, Clone)]
pub struct CircularBuffer<T: Copy + Default> {
    slots: Vec<T>,
    head: usize,
    len: usize,
}

impl<T: Copy + Default> CircularBuffer<T> {
    /// Create an empty buffer holding at most `capacity` items. `capacity` must be at least 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 1, "circular buffer needs a non-zero capacity");
        Self {
            slots: vec![T::default(); capacity],
            head: 0,
            len: 0,
        }
    }

    /// Maximum number of items.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of items currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if the buffer holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every item without touching the storage.
    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    fn slot(&self, offset: usize) -> usize {
        (self.head + offset) % self.slots.len()
    }

    /// Append at the back. Pushing into a full buffer is a caller bug.
    pub fn push_back(&mut self, value: T) {
        debug_assert!(self.len < self.slots.len(), "circular buffer overflow");
        let idx = self.slot(self.len);
        self.slots[idx] = value;
        self.len += 1;
    }

    /// Remove and return the front item.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.slots[self.head];
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        Some(value)
    }

    /// Remove and return the back item.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.slots[self.slot(self.len)])
    }

    #[must_use]
    pub fn front(&self) -> Option<T> {
        (self.len > 0).then(|| self.slots[self.head])
    }

    #[must_use]
    pub fn back(&self) -> Option<T> {
        (self.len > 0).then(|| self.slots[self.slot(self.len - 1)])
    }
}
