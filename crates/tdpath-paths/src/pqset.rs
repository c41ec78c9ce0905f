//! A min-priority queue whose items are unique by key.
//!
//! Items have two separate notions of comparison: a key, used for
//! deduplication and membership, and a priority order, supplied as a
//! comparator when the queue is built. Two items with the same key can never
//! be queued at the same time even if their priorities differ.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use thiserror::Error;

/// Items that can be stored in a [`PriorityQueueSet`].
pub trait Keyed {
    /// Identity of the item.
    type Key: Clone + Eq + Hash;

    /// The item's key.
    fn key(&self) -> Self::Key;
}

/// Errors returned by [`PriorityQueueSet`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// `pop_smallest` was called on an empty queue.
    #[error("pop from an empty priority queue")]
    EmptyQueue,
}

/// Combined priority queue and set.
///
/// Membership tests are O(1) and popping the smallest item is O(log n).
/// Adding a new key is O(log n); lowering the priority of a key already in
/// the queue needs a linear scan of the heap and is O(n).
pub struct PriorityQueueSet<T: Keyed, C> {
    heap: Vec<T>,
    items: HashMap<T::Key, T>,
    cmp: C,
}

impl<T, C> PriorityQueueSet<T, C>
where
    T: Keyed + Clone,
    C: Fn(&T, &T) -> Ordering,
{
    /// Create an empty queue ordered by `cmp` (smallest first).
    pub fn new(cmp: C) -> Self {
        Self {
            heap: Vec::new(),
            items: HashMap::new(),
            cmp,
        }
    }

    /// Number of queued items.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether an item with `key` is queued.
    #[inline]
    pub fn has_item(&self, key: &T::Key) -> bool {
        self.items.contains_key(key)
    }

    /// Add `item`, or lower the priority of the queued item with the same key.
    ///
    /// Returns `true` if `item` was inserted or replaced a queued item with a
    /// strictly worse priority, `false` if the queue is unchanged.
    pub fn add(&mut self, item: T) -> bool {
        let key = item.key();
        let Some(old) = self.items.get(&key) else {
            self.items.insert(key, item.clone());
            self.heap.push(item);
            self.sift_up(self.heap.len() - 1);
            return true;
        };
        if (self.cmp)(&item, old) != Ordering::Less {
            return false;
        }
        let Some(idx) = self.heap.iter().position(|queued| queued.key() == key) else {
            return false;
        };
        self.items.insert(key, item.clone());
        self.heap[idx] = item;
        self.sift_up(idx);
        true
    }

    /// Remove and return the item with the smallest priority.
    pub fn pop_smallest(&mut self) -> Result<T, QueueError> {
        if self.heap.is_empty() {
            return Err(QueueError::EmptyQueue);
        }
        let smallest = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        self.items.remove(&smallest.key());
        Ok(smallest)
    }

    // -----------------------------------------------------------------------
    // Heap maintenance
    // -----------------------------------------------------------------------

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        (self.cmp)(&self.heap[a], &self.heap[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if !self.less(idx, parent) {
                break;
            }
            self.heap.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.heap.swap(idx, smallest);
            idx = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Job {
        name: &'static str,
        rank: i32,
    }

    impl Keyed for Job {
        type Key = &'static str;

        fn key(&self) -> &'static str {
            self.name
        }
    }

    fn job(name: &'static str, rank: i32) -> Job {
        Job { name, rank }
    }

    fn by_rank(a: &Job, b: &Job) -> Ordering {
        a.rank.cmp(&b.rank)
    }

    type JobQueue = PriorityQueueSet<Job, fn(&Job, &Job) -> Ordering>;

    fn drain(q: &mut JobQueue) -> Vec<(&'static str, i32)> {
        let mut out = Vec::new();
        while let Ok(j) = q.pop_smallest() {
            out.push((j.name, j.rank));
        }
        out
    }

    fn queue() -> JobQueue {
        PriorityQueueSet::new(by_rank as fn(&Job, &Job) -> Ordering)
    }

    #[test]
    fn pops_in_priority_order() {
        let mut q = queue();
        for (name, rank) in [("e", 5), ("a", 1), ("d", 4), ("c", 3), ("b", 2), ("f", 6)] {
            assert!(q.add(job(name, rank)));
        }
        assert_eq!(q.len(), 6);
        let names: Vec<_> = drain(&mut q).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e", "f"]);
        assert!(q.is_empty());
    }

    #[test]
    fn empty_pop_is_an_error() {
        let mut q = queue();
        assert_eq!(q.pop_smallest(), Err(QueueError::EmptyQueue));
        q.add(job("a", 1));
        assert!(q.pop_smallest().is_ok());
        assert_eq!(q.pop_smallest(), Err(QueueError::EmptyQueue));
    }

    #[test]
    fn membership_by_key() {
        let mut q = queue();
        q.add(job("a", 10));
        assert!(q.has_item(&"a"));
        assert!(!q.has_item(&"b"));
        q.pop_smallest().unwrap();
        assert!(!q.has_item(&"a"));
    }

    #[test]
    fn worse_priority_is_ignored() {
        let mut q = queue();
        q.add(job("a", 2));
        q.add(job("b", 3));
        assert!(!q.add(job("a", 7)));
        assert!(!q.add(job("a", 2)));
        assert_eq!(q.len(), 2);
        assert_eq!(drain(&mut q), vec![("a", 2), ("b", 3)]);
    }

    #[test]
    fn better_priority_replaces() {
        let mut q = queue();
        q.add(job("a", 2));
        q.add(job("b", 3));
        q.add(job("c", 9));
        assert!(q.add(job("c", 1)));
        assert_eq!(q.len(), 3);
        assert_eq!(drain(&mut q), vec![("c", 1), ("a", 2), ("b", 3)]);
    }

    #[test]
    fn readd_after_pop() {
        let mut q = queue();
        q.add(job("a", 1));
        q.pop_smallest().unwrap();
        assert!(q.add(job("a", 5)));
        assert_eq!(q.len(), 1);
    }
}
