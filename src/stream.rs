//! Lazy revert detection over a whole revision sequence
//!
//! [`detect`] wraps a fresh [`Detector`] around any iterator of
//! `(checksum, revision)` pairs. Each call to `next()` pulls input only until
//! the next revert is found, so dropping the iterator early stops consuming
//! the input.

use crate::checksum::Checksum;
use crate::detector::Detector;
use crate::error::Result;
use crate::revert::Revert;

/// Iterator over the reverts found in a sequence of revisions
///
/// Created by [`detect`] or [`DetectExt::detect_reverts`].
#[derive(Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Detect<I, T> {
    revisions: I,
    detector: Detector<T>,
}

impl<I, T> Iterator for Detect<I, T>
where
    I: Iterator<Item = (Checksum, T)>,
    T: Clone,
{
    type Item = Revert<T>;

    fn next(&mut self) -> Option<Self::Item> {
        for (checksum, revision) in self.revisions.by_ref() {
            if let Some(revert) = self.detector.process(checksum, revision) {
                return Some(revert);
            }
        }
        None
    }
}

/// Detect reverts in a chronologically ordered sequence of revisions
///
/// # Errors
///
/// Returns [`crate::RevertError::InvalidRadius`] if `radius` is 0.
///
/// # Example
/// ```
/// use revertir::{detect, Checksum};
///
/// let revisions = vec![
///     (Checksum::from("aaa"), 1),
///     (Checksum::from("bbb"), 2),
///     (Checksum::from("aaa"), 3),
///     (Checksum::from("ccc"), 4),
/// ];
///
/// let reverts: Vec<_> = detect(revisions, 15).unwrap().collect();
/// assert_eq!(reverts.len(), 1);
/// assert_eq!(reverts[0], (3, vec![2], 1));
/// ```
pub fn detect<I, T>(revisions: I, radius: usize) -> Result<Detect<I::IntoIter, T>>
where
    I: IntoIterator<Item = (Checksum, T)>,
    T: Clone,
{
    Ok(Detect {
        revisions: revisions.into_iter(),
        detector: Detector::new(radius)?,
    })
}

/// Adapter for running detection directly on an iterator
pub trait DetectExt<T>: Iterator<Item = (Checksum, T)> + Sized {
    fn detect_reverts(self, radius: usize) -> Result<Detect<Self, T>>;
}

impl<I, T> DetectExt<T> for I
where
    I: Iterator<Item = (Checksum, T)>,
    T: Clone,
{
    fn detect_reverts(self, radius: usize) -> Result<Detect<Self, T>> {
        detect(self, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RevertError;
    use std::cell::Cell;

    fn pairs(items: &[(&str, u32)]) -> Vec<(Checksum, u32)> {
        items
            .iter()
            .map(|(checksum, id)| (Checksum::from(*checksum), *id))
            .collect()
    }

    #[test]
    fn test_detect_emits_in_input_order() {
        let input = pairs(&[
            ("a", 1),
            ("b", 2),
            ("c", 3),
            ("a", 4),
            ("d", 5),
            ("b", 6),
            ("a", 7),
        ]);

        let expected: Vec<(u32, Vec<u32>, u32)> = vec![(4, vec![3, 2], 1), (7, vec![6, 5], 4)];
        let reverts: Vec<_> = detect(input, 2).unwrap().collect();
        assert_eq!(reverts.len(), expected.len());
        for (revert, expected) in reverts.iter().zip(&expected) {
            assert_eq!(revert, expected);
        }
    }

    #[test]
    fn test_detect_rejects_zero_radius() {
        let result = detect(pairs(&[("a", 1)]), 0);
        assert!(matches!(result, Err(RevertError::InvalidRadius(0))));
    }

    #[test]
    fn test_detect_is_lazy() {
        let pulled = Cell::new(0);
        let input = pairs(&[("a", 1), ("b", 2), ("a", 3), ("c", 4), ("d", 5)]);
        let counted = input.into_iter().inspect(|_| pulled.set(pulled.get() + 1));

        let mut reverts = detect(counted, 3).unwrap();
        assert_eq!(pulled.get(), 0);

        let first = reverts.next().unwrap();
        assert_eq!(first, (3, vec![2], 1));
        assert_eq!(pulled.get(), 3);

        assert!(reverts.next().is_none());
        assert_eq!(pulled.get(), 5);
    }

    #[test]
    fn test_detect_over_infinite_input() {
        let cycle = ["a", "b"].iter().cycle().zip(0u64..);
        let reverts: Vec<_> = cycle
            .map(|(checksum, id)| (Checksum::from(*checksum), id))
            .detect_reverts(2)
            .unwrap()
            .take(3)
            .collect();

        assert_eq!(reverts[0], (2, vec![1], 0));
        assert_eq!(reverts[1], (3, vec![2], 1));
        assert_eq!(reverts[2], (4, vec![3], 2));
    }
}
