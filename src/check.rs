//! Revert status of a single revision
//!
//! Given a target revision, [`check`] loads up to `radius` revisions before
//! it and up to `radius` after it from a [`RevisionSource`], runs detection
//! over that neighbourhood and reports the role the target played:
//!
//! - **reverting**: the target restored an earlier revision
//! - **reverted**: the target was undone by a later revision
//! - **reverted_to**: a later revision restored the target's content
//!
//! The forward search can be bounded in time, either with an absolute
//! `before` timestamp or with a `window` measured from the target's own
//! timestamp. Fetching revisions from a live wiki or a database is left to
//! other `RevisionSource` implementations; [`MemorySource`] serves an
//! in-memory history.

use crate::checksum::Checksum;
use crate::config::DEFAULT_RADIUS;
use crate::error::{Result, RevertError};
use crate::revert::Revert;
use crate::stream::detect;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::BufRead;

/// Revision metadata needed to check revert status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: u64,
    pub page_id: u64,
    pub timestamp: DateTime<Utc>,
    /// Content checksum; absent when the content is suppressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
}

impl Revision {
    pub fn checksum(&self) -> Checksum {
        Checksum::from(self.sha1.as_deref())
    }
}

/// Page-scoped access to revision history
///
/// All returned lists are ordered oldest to newest. Returning fewer than `n`
/// revisions is normal at either end of a page's history; a revision that
/// does not exist is reported as [`RevertError::RevisionNotFound`].
pub trait RevisionSource {
    /// Page that `rev_id` belongs to
    fn page_of(&self, rev_id: u64) -> Result<u64>;

    /// Up to `n` revisions ending with `rev_id` itself
    fn revisions_before(&self, page_id: u64, rev_id: u64, n: usize) -> Result<Vec<Revision>>;

    /// Up to `n` revisions strictly after `rev_id`, saved no later than
    /// `before` when it is given
    fn revisions_after(
        &self,
        page_id: u64,
        rev_id: u64,
        n: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Revision>>;
}

/// Options for [`check`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Maximum number of revisions a revert can span
    pub radius: usize,
    /// Page of the target revision; looked up when absent
    pub page_id: Option<u64>,
    /// Only consider reverting revisions saved at or before this time
    pub before: Option<DateTime<Utc>>,
    /// Only consider reverting revisions saved within this long after the
    /// target. Ignored when `before` is set.
    pub window: Option<TimeDelta>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            page_id: None,
            before: None,
            window: None,
        }
    }
}

/// Roles a revision played in nearby reverts
///
/// Each slot holds the first matching revert in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevertStatus {
    pub reverting: Option<Revert<Revision>>,
    pub reverted: Option<Revert<Revision>>,
    pub reverted_to: Option<Revert<Revision>>,
}

impl RevertStatus {
    pub fn is_clean(&self) -> bool {
        self.reverting.is_none() && self.reverted.is_none() && self.reverted_to.is_none()
    }
}

/// Check whether a revision reverted, was reverted, or was reverted to
///
/// # Errors
///
/// - [`RevertError::InvalidRadius`] if `options.radius` is 0 or `usize::MAX`
/// - [`RevertError::RevisionNotFound`] if the source has no such revision
pub fn check<S>(source: &S, rev_id: u64, options: &CheckOptions) -> Result<RevertStatus>
where
    S: RevisionSource + ?Sized,
{
    let span = match options.radius.checked_add(1) {
        Some(span) if options.radius >= 1 => span,
        _ => return Err(RevertError::InvalidRadius(options.radius)),
    };

    let page_id = match options.page_id {
        Some(page_id) => page_id,
        None => source.page_of(rev_id)?,
    };

    let mut history = source.revisions_before(page_id, rev_id, span)?;
    let current_timestamp = match history.last() {
        Some(current) if current.id == rev_id => current.timestamp,
        _ => return Err(RevertError::RevisionNotFound(rev_id)),
    };

    let before = options.before.or_else(|| {
        options
            .window
            .and_then(|window| current_timestamp.checked_add_signed(window))
    });

    let future = source.revisions_after(page_id, rev_id, options.radius, before)?;
    tracing::debug!(
        rev_id,
        page_id,
        past = history.len() - 1,
        future = future.len(),
        "checking revert status"
    );
    history.extend(future);

    let revisions = history.into_iter().map(|rev| (rev.checksum(), rev));
    let mut status = RevertStatus::default();

    for revert in detect(revisions, options.radius)? {
        let slot = if revert.reverting().id == rev_id {
            &mut status.reverting
        } else if revert.reverteds().iter().any(|rev| rev.id == rev_id) {
            &mut status.reverted
        } else if revert.reverted_to().id == rev_id {
            &mut status.reverted_to
        } else {
            continue;
        };

        if slot.is_none() {
            *slot = Some(revert);
        }
    }

    Ok(status)
}

/// In-memory revision history, grouped by page
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: HashMap<u64, Vec<Revision>>,
}

impl MemorySource {
    /// Build from revisions given oldest first within each page
    pub fn new(revisions: impl IntoIterator<Item = Revision>) -> Self {
        let mut pages: HashMap<u64, Vec<Revision>> = HashMap::new();
        for revision in revisions {
            pages.entry(revision.page_id).or_default().push(revision);
        }
        Self { pages }
    }

    /// Load JSON-lines [`Revision`] records
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut revisions = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let revision = serde_json::from_str::<Revision>(&line).map_err(|source| {
                RevertError::Json {
                    line: index + 1,
                    source,
                }
            })?;
            revisions.push(revision);
        }
        Ok(Self::new(revisions))
    }

    fn locate(&self, page_id: u64, rev_id: u64) -> Result<(&[Revision], usize)> {
        let page = self
            .pages
            .get(&page_id)
            .ok_or(RevertError::RevisionNotFound(rev_id))?;
        let position = page
            .iter()
            .position(|rev| rev.id == rev_id)
            .ok_or(RevertError::RevisionNotFound(rev_id))?;
        Ok((page.as_slice(), position))
    }
}

impl RevisionSource for MemorySource {
    fn page_of(&self, rev_id: u64) -> Result<u64> {
        self.pages
            .iter()
            .find(|(_, revisions)| revisions.iter().any(|rev| rev.id == rev_id))
            .map(|(page_id, _)| *page_id)
            .ok_or(RevertError::RevisionNotFound(rev_id))
    }

    fn revisions_before(&self, page_id: u64, rev_id: u64, n: usize) -> Result<Vec<Revision>> {
        let (page, position) = self.locate(page_id, rev_id)?;
        let start = (position + 1).saturating_sub(n);
        Ok(page[start..=position].to_vec())
    }

    fn revisions_after(
        &self,
        page_id: u64,
        rev_id: u64,
        n: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Revision>> {
        let (page, position) = self.locate(page_id, rev_id)?;
        Ok(page[position + 1..]
            .iter()
            .take_while(|rev| before.map_or(true, |limit| rev.timestamp <= limit))
            .take(n)
            .cloned()
            .collect())
    }
}
