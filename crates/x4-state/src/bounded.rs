//! Capped, newest-first history.
//!
//! Used for the logbook (cap 1000) and command results (cap 100).
//! Single-item pushes always respect the cap; a bulk replace is a trusted
//! full snapshot and is stored as given, even when longer than the cap.

use std::collections::VecDeque;

/// An ordered sequence capped at a maximum length, newest item first.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    cap: usize,
}

impl<T> BoundedHistory<T> {
    /// Create an empty history holding at most `cap` items on push.
    pub const fn new(cap: usize) -> Self {
        Self {
            items: VecDeque::new(),
            cap,
        }
    }

    /// The nominal cap applied by [`push_front`](Self::push_front).
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Insert at the head, evicting from the tail down to the cap.
    pub fn push_front(&mut self, item: T) {
        self.items.push_front(item);
        self.items.truncate(self.cap);
    }

    /// Replace the whole history with `items`, in the given order.
    ///
    /// The cap is not applied.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = VecDeque::from(items);
    }

    /// The first `limit` items (most recent first), or all of them when
    /// `limit` is `None`.
    pub fn slice(&self, limit: Option<usize>) -> Vec<&T> {
        let take = limit.unwrap_or(self.items.len());
        self.items.iter().take(take).collect()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_front_orders_newest_first() {
        let mut history = BoundedHistory::new(3);
        history.push_front(1);
        history.push_front(2);
        assert_eq!(history.slice(None), vec![&2, &1]);
        assert_eq!(history.slice(Some(1)), vec![&2]);
    }

    #[test]
    fn push_front_evicts_oldest() {
        let mut history = BoundedHistory::new(3);
        for i in 0..5 {
            history.push_front(i);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.slice(None), vec![&4, &3, &2]);
    }

    #[test]
    fn replace_all_ignores_cap() {
        let mut history = BoundedHistory::new(2);
        history.replace_all(vec![10, 9, 8, 7]);
        assert_eq!(history.len(), 4);

        // The next trickle push trims back to the cap.
        history.push_front(11);
        assert_eq!(history.slice(None), vec![&11, &10]);
    }

    #[test]
    fn slice_does_not_mutate() {
        let mut history = BoundedHistory::new(10);
        history.replace_all(vec![3, 2, 1]);
        assert_eq!(history.slice(Some(2)), vec![&3, &2]);
        assert_eq!(history.slice(Some(50)).len(), 3);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn new_history_is_empty() {
        let history: BoundedHistory<&str> = BoundedHistory::new(5);
        assert!(history.is_empty());
        assert!(history.slice(None).is_empty());
        assert_eq!(history.cap(), 5);
    }
}
