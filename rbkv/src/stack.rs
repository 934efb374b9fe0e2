//! A LIFO stack behind a single mutex.

use parking_lot::Mutex;

/// A thread-safe stack. Every operation takes the lock once.
///
/// Assigning one stack over another is deliberately unsupported; build a new
/// one with [`Clone`] instead.
pub struct SyncStack<T> {
    items: Mutex<Vec<T>>,
}

impl<T> SyncStack<T> {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Push `value` on top.
    pub fn push(&self, value: T) {
        self.items.lock().push(value);
    }

    /// Pop the top value, or `None` if the stack is empty.
    pub fn pop(&self) -> Option<T> {
        self.items.lock().pop()
    }

    /// Pop the top value into `slot`. Returns `false` and leaves `slot`
    /// untouched if the stack is empty.
    pub fn pop_into(&self, slot: &mut T) -> bool {
        match self.items.lock().pop() {
            Some(value) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Number of values on the stack.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }
}

impl<T: Clone> SyncStack<T> {
    /// Copy of the top value.
    pub fn peek(&self) -> Option<T> {
        self.items.lock().last().cloned()
    }
}

impl<T> Default for SyncStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for SyncStack<T> {
    fn clone(&self) -> Self {
        let items = self.items.lock().clone();
        Self {
            items: Mutex::new(items),
        }
    }
}
