//! Bounded history window over (checksum, revision) pairs
//!
//! The window remembers the last `capacity` insertions in arrival order and
//! answers three questions about them: has this checksum been seen, which
//! revision carried it most recently, and which revisions arrived after that.
//!
//! # Design
//!
//! ```text
//!   entries (ring, oldest → newest)          positions (digest → seqs)
//! ┌──────┬──────┬──────┬──────┐
//! │ a:1  │ b:2  │ a:3  │ c:4  │            a → [0, 2]
//! └──────┴──────┴──────┴──────┘            b → [1]
//!  seq 0   seq 1  seq 2  seq 3             c → [3]
//! ```
//!
//! Every insertion gets an absolute sequence number. The slot of a sequence
//! number inside the ring is `seq - first_seq`, where `first_seq` is the
//! sequence number of the oldest retained entry. Eviction pops the front of
//! the ring and the front of that digest's sequence list; an emptied list is
//! removed so no dangling keys remain. Unknown checksums occupy ring slots
//! but are never indexed, so they can never be found.

use crate::checksum::Checksum;
use crate::error::{Result, RevertError};
use std::collections::{HashMap, VecDeque};
use std::ops::Index;

/// Fixed-capacity, insertion-ordered multimap from checksum to revision
///
/// # Example
/// ```
/// use revertir::{Checksum, HistoryWindow};
///
/// let mut window = HistoryWindow::new(3).unwrap();
/// window.insert(Checksum::from("foo"), "bar1");
/// window.insert(Checksum::from("foo"), "bar2");
/// window.insert(Checksum::from("bar"), "foo1");
///
/// let evicted = window.insert(Checksum::from("bar"), "foo2");
/// assert_eq!(evicted.map(|(_, rev)| rev), Some("bar1"));
/// assert_eq!(window[&Checksum::from("foo")], "bar2");
/// ```
#[derive(Debug, Clone)]
pub struct HistoryWindow<T> {
    capacity: usize,
    entries: VecDeque<(Checksum, T)>,
    positions: HashMap<Vec<u8>, VecDeque<u64>>,
    next_seq: u64,
}

impl<T> HistoryWindow<T> {
    /// Create an empty window holding at most `capacity` entries
    ///
    /// # Errors
    ///
    /// Returns [`RevertError::InvalidCapacity`] if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(RevertError::InvalidCapacity);
        }

        Ok(Self {
            capacity,
            entries: VecDeque::new(),
            positions: HashMap::new(),
            next_seq: 0,
        })
    }

    /// Append an entry, evicting and returning the oldest one when full
    pub fn insert(&mut self, checksum: Checksum, payload: T) -> Option<(Checksum, T)> {
        let evicted = if self.entries.len() == self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        if let Some(digest) = checksum.digest() {
            self.positions
                .entry(digest.to_vec())
                .or_default()
                .push_back(self.next_seq);
        }
        self.entries.push_back((checksum, payload));
        self.next_seq += 1;

        debug_assert!(self.entries.len() <= self.capacity);
        evicted
    }

    /// True if at least one revision with this checksum is retained
    pub fn contains(&self, checksum: &Checksum) -> bool {
        checksum
            .digest()
            .is_some_and(|digest| self.positions.contains_key(digest))
    }

    /// Most recently inserted revision carrying `checksum`
    pub fn latest(&self, checksum: &Checksum) -> Option<&T> {
        let seq = self.latest_seq(checksum)?;
        self.entries.get(self.slot(seq)).map(|(_, payload)| payload)
    }

    /// Revisions inserted after the most recent occurrence of `checksum`
    ///
    /// Yields most-recent-first and stops before the matching entry. If the
    /// checksum is not retained, the whole window is yielded.
    pub fn values_since(&self, checksum: &Checksum) -> impl Iterator<Item = &T> + '_ {
        let start = self
            .latest_seq(checksum)
            .map_or(0, |seq| self.slot(seq) + 1);

        self.entries.range(start..).rev().map(|(_, payload)| payload)
    }

    /// Retained entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = (&Checksum, &T)> + '_ {
        self.entries.iter().map(|(checksum, payload)| (checksum, payload))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_oldest(&mut self) -> Option<(Checksum, T)> {
        let (checksum, payload) = self.entries.pop_front()?;

        if let Some(digest) = checksum.digest() {
            if let Some(seqs) = self.positions.get_mut(digest) {
                seqs.pop_front();
                if seqs.is_empty() {
                    self.positions.remove(digest);
                }
            }
        }

        Some((checksum, payload))
    }

    fn latest_seq(&self, checksum: &Checksum) -> Option<u64> {
        let digest = checksum.digest()?;
        self.positions.get(digest)?.back().copied()
    }

    fn first_seq(&self) -> u64 {
        self.next_seq - self.entries.len() as u64
    }

    fn slot(&self, seq: u64) -> usize {
        (seq - self.first_seq()) as usize
    }
}

impl<T> Index<&Checksum> for HistoryWindow<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `checksum` is not retained. Check [`HistoryWindow::contains`]
    /// first.
    fn index(&self, checksum: &Checksum) -> &T {
        match self.latest(checksum) {
            Some(payload) => payload,
            None => panic!("key not found: {}", checksum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs(s: &str) -> Checksum {
        Checksum::from(s)
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            HistoryWindow::<u32>::new(0),
            Err(RevertError::InvalidCapacity)
        ));
    }

    #[test]
    fn test_insert_and_evict() {
        let mut window = HistoryWindow::new(3).unwrap();

        assert!(!window.contains(&cs("foo")));

        assert_eq!(window.insert(cs("foo"), "bar1"), None);
        assert!(window.contains(&cs("foo")));
        assert_eq!(window[&cs("foo")], "bar1");

        assert_eq!(window.insert(cs("foo"), "bar2"), None);
        assert_eq!(window[&cs("foo")], "bar2");

        assert_eq!(window.insert(cs("bar"), "foo1"), None);
        assert_eq!(window[&cs("bar")], "foo1");

        let (evicted_checksum, evicted_payload) = window.insert(cs("bar"), "foo2").unwrap();
        assert_eq!(evicted_checksum, cs("foo"));
        assert_eq!(evicted_payload, "bar1");
        assert_eq!(window[&cs("bar")], "foo2");
        assert_eq!(window[&cs("foo")], "bar2");
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_eviction_drops_empty_keys() {
        let mut window = HistoryWindow::new(2).unwrap();
        window.insert(cs("a"), 1);
        window.insert(cs("b"), 2);
        window.insert(cs("c"), 3);

        assert!(!window.contains(&cs("a")));
        assert!(window.positions.get(b"a".as_slice()).is_none());
        assert_eq!(window.positions.len(), 2);
    }

    #[test]
    fn test_values_since_most_recent_first() {
        let mut window = HistoryWindow::new(5).unwrap();
        window.insert(cs("a"), 1);
        window.insert(cs("b"), 2);
        window.insert(cs("a"), 3);
        window.insert(cs("c"), 4);
        window.insert(cs("d"), 5);

        // Stops at the most recent "a" (payload 3), not the first one
        let since: Vec<_> = window.values_since(&cs("a")).copied().collect();
        assert_eq!(since, vec![5, 4]);

        let since_latest: Vec<_> = window.values_since(&cs("d")).copied().collect();
        assert!(since_latest.is_empty());
    }

    #[test]
    fn test_values_since_absent_exhausts_window() {
        let mut window = HistoryWindow::new(3).unwrap();
        window.insert(cs("a"), 1);
        window.insert(cs("b"), 2);

        let since: Vec<_> = window.values_since(&cs("z")).copied().collect();
        assert_eq!(since, vec![2, 1]);
    }

    #[test]
    fn test_unknown_never_indexed() {
        let mut window = HistoryWindow::new(3).unwrap();
        window.insert(Checksum::unknown(), 1);

        assert_eq!(window.len(), 1);
        assert!(!window.contains(&Checksum::unknown()));
        assert_eq!(window.latest(&Checksum::unknown()), None);

        // Evicting an unknown entry leaves the index untouched
        window.insert(cs("a"), 2);
        window.insert(cs("b"), 3);
        let (evicted, payload) = window.insert(cs("c"), 4).unwrap();
        assert!(evicted.is_unknown());
        assert_eq!(payload, 1);
        assert_eq!(window.positions.len(), 3);
    }

    #[test]
    fn test_slots_track_after_wraparound() {
        let mut window = HistoryWindow::new(2).unwrap();
        for i in 0..10u32 {
            window.insert(cs(if i % 2 == 0 { "even" } else { "odd" }), i);
        }
        assert_eq!(window.latest(&cs("even")), Some(&8));
        assert_eq!(window.latest(&cs("odd")), Some(&9));
        let order: Vec<_> = window.iter().map(|(_, p)| *p).collect();
        assert_eq!(order, vec![8, 9]);
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn test_index_missing_key_panics() {
        let window = HistoryWindow::<u32>::new(1).unwrap();
        let _ = window[&cs("missing")];
    }
}
