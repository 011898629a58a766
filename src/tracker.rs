//! LifoStack: write-append, read-by-draining occupancy tracker.
//!
//! The map records the index of every occupied slot here so that teardown and
//! rehash can walk O(live) entries instead of scanning O(capacity) slots. It
//! is not a general index: there is no delete-by-value, and consumers must
//! validate slot state for every index they drain rather than trusting
//! membership alone.

/// A plain LIFO stack. `pop` drains in reverse push order.
#[derive(Debug, Default)]
pub struct LifoStack<T> {
    entries: Vec<T>,
}

impl<T> LifoStack<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: T) {
        self.entries.push(value);
    }

    /// Remove and return the most recently pushed value; `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::LifoStack;

    /// Invariant: pop returns pushed values in reverse order and empties the
    /// stack; popping an empty stack reports `None` rather than failing.
    #[test]
    fn push_pop_lifo_order() {
        let mut stack = LifoStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);

        for i in 0..5usize {
            stack.push(i);
        }
        assert_eq!(stack.len(), 5);

        for expected in (0..5usize).rev() {
            assert_eq!(stack.pop(), Some(expected));
        }
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);
    }

    /// Invariant: interleaved push/pop tracks the live top correctly.
    #[test]
    fn interleaved_operations() {
        let mut stack = LifoStack::with_capacity(4);
        stack.push(1usize);
        stack.push(2);
        assert_eq!(stack.pop(), Some(2));
        stack.push(3);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
    }
}
