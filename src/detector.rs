//! Streaming identity revert detection
//!
//! A [`Detector`] scans one document's revisions in chronological order. For
//! each new revision it checks whether the same checksum was seen within the
//! last `radius` revisions. If it was, and at least one revision lies in
//! between, those in-between revisions were undone and a [`Revert`] is
//! reported.
//!
//! The match test runs before the new revision is inserted, so a revision can
//! still match the entry that its own insertion is about to evict. With
//! `radius = 1` the sequence `a, b, a` is a revert.
//!
//! See <https://meta.wikimedia.org/wiki/R:Identity_revert>

use crate::checksum::Checksum;
use crate::config::DetectorConfig;
use crate::error::{Result, RevertError};
use crate::revert::Revert;
use crate::window::HistoryWindow;

/// Detects reverts in a stream of revisions to the same document
///
/// Call [`Detector::process`] once per revision, oldest first. The revision
/// payload is opaque; it is cloned into the [`Revert`] when one is found.
///
/// # Example
/// ```
/// use revertir::{Checksum, Detector};
///
/// let mut detector = Detector::new(15).unwrap();
///
/// assert!(detector.process(Checksum::from("aaa"), 1).is_none());
/// assert!(detector.process(Checksum::from("bbb"), 2).is_none());
/// let revert = detector.process(Checksum::from("aaa"), 3).unwrap();
/// assert_eq!(revert, (3, vec![2], 1));
/// assert!(detector.process(Checksum::from("ccc"), 4).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Detector<T> {
    radius: usize,
    window: HistoryWindow<T>,
}

impl<T: Clone> Detector<T> {
    /// Create a detector that finds reverts spanning at most `radius` revisions
    ///
    /// # Errors
    ///
    /// Returns [`RevertError::InvalidRadius`] if `radius` is 0.
    pub fn new(radius: usize) -> Result<Self> {
        if radius < 1 {
            return Err(RevertError::InvalidRadius(radius));
        }

        let capacity = radius
            .checked_add(1)
            .ok_or(RevertError::InvalidRadius(radius))?;

        Ok(Self {
            radius,
            window: HistoryWindow::new(capacity)?,
        })
    }

    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        Self::new(config.radius)
    }

    /// Process the next revision and report a revert if it restored content
    pub fn process(&mut self, checksum: Checksum, revision: T) -> Option<Revert<T>> {
        let mut revert = None;

        if self.window.contains(&checksum) {
            let reverteds: Vec<T> = self.window.values_since(&checksum).cloned().collect();

            // No revisions in between is a null edit, not a revert
            if !reverteds.is_empty() {
                if let Some(reverted_to) = self.window.latest(&checksum) {
                    tracing::debug!(
                        checksum = %checksum,
                        reverted = reverteds.len(),
                        "identity revert detected"
                    );
                    revert = Revert::new(revision.clone(), reverteds, reverted_to.clone());
                }
            }
        }

        self.window.insert(checksum, revision);
        revert
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Revisions currently remembered, at most `radius + 1`
    pub fn window(&self) -> &HistoryWindow<T> {
        &self.window
    }
}
