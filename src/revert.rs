//! Revert record

use serde::Serialize;

/// A detected identity revert
///
/// `reverteds` is never empty and is ordered most-recent-first: the revision
/// immediately preceding `reverting` comes first.
///
/// # Example
/// ```
/// use revertir::Revert;
///
/// let revert = Revert::new(3, vec![2], 1).unwrap();
/// assert_eq!(revert, (3, vec![2], 1));
/// assert!(Revert::new(3, vec![], 1).is_none());
/// assert_eq!(revert.reverted_to(), &1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revert<T> {
    reverting: T,
    reverteds: Vec<T>,
    reverted_to: T,
}

impl<T> Revert<T> {
    /// Build a revert record, or `None` if `reverteds` is empty
    pub fn new(reverting: T, reverteds: Vec<T>, reverted_to: T) -> Option<Self> {
        if reverteds.is_empty() {
            return None;
        }
        Some(Self {
            reverting,
            reverteds,
            reverted_to,
        })
    }

    /// The revision that restored earlier content
    pub fn reverting(&self) -> &T {
        &self.reverting
    }

    /// The revisions that were undone, most recent first
    pub fn reverteds(&self) -> &[T] {
        &self.reverteds
    }

    /// The revision whose content was restored
    pub fn reverted_to(&self) -> &T {
        &self.reverted_to
    }

    /// Consume into a `(reverting, reverteds, reverted_to)` triple
    pub fn into_parts(self) -> (T, Vec<T>, T) {
        (self.reverting, self.reverteds, self.reverted_to)
    }

    /// Map every revision in the record, keeping its shape
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Revert<U> {
        Revert {
            reverting: f(self.reverting),
            reverteds: self.reverteds.into_iter().map(&mut f).collect(),
            reverted_to: f(self.reverted_to),
        }
    }
}

impl<T: PartialEq> PartialEq<(T, Vec<T>, T)> for Revert<T> {
    fn eq(&self, other: &(T, Vec<T>, T)) -> bool {
        self.reverting == other.0 && self.reverteds == other.1 && self.reverted_to == other.2
    }
}

impl<T> From<Revert<T>> for (T, Vec<T>, T) {
    fn from(revert: Revert<T>) -> Self {
        revert.into_parts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_equivalence() {
        let revert = Revert::new("c", vec!["b"], "a").unwrap();
        assert_eq!(revert, ("c", vec!["b"], "a"));
        assert_ne!(revert, ("c", vec!["b"], "z"));
    }

    #[test]
    fn test_map_preserves_order() {
        let revert = Revert::new(4u32, vec![3, 2], 1)
            .unwrap()
            .map(|id| id * 10);
        assert_eq!(revert.into_parts(), (40, vec![30, 20], 10));
    }

    #[test]
    fn test_empty_reverteds_rejected() {
        assert_eq!(Revert::new(2u32, Vec::new(), 1), None);
        assert!(Revert::new(2u32, vec![1], 1).is_some());
    }

    #[test]
    fn test_serialize_shape() {
        let revert = Revert::new(3, vec![2], 1).unwrap();
        let json = serde_json::to_value(&revert).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"reverting": 3, "reverteds": [2], "reverted_to": 1})
        );
    }
}
