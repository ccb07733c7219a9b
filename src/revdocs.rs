//! Revert extraction from page-partitioned revision documents
//!
//! Input is a sequence of JSON revision documents, one per line, where all
//! revisions of a page are contiguous and ordered oldest first. Each page
//! gets its own [`Detector`]; reverts never span two pages.
//!
//! # Example document
//!
//! ```json
//! {"id": 2, "timestamp": "2015-09-05T10:13:57Z",
//!  "page": {"id": 12, "title": "Anarchism", "namespace": 0},
//!  "sha1": "p0o8x3k1...", "text": "..."}
//! ```

use crate::checksum::Checksum;
use crate::config::DetectorConfig;
use crate::detector::Detector;
use crate::error::{Result, RevertError};
use crate::revert::Revert;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// Page a revision belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDoc {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<i64>,
}

/// A single revision document
///
/// Fields the detector does not use are kept in `extra` and written back out
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionDoc {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub page: PageDoc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RevisionDoc {
    /// Checksum for this document, or `None` if it must be skipped
    ///
    /// With `use_sha1` a missing `sha1` field yields [`Checksum::Unknown`]
    /// so the revision still occupies a slot in the window. Without it, a
    /// document lacking `text` cannot be compared at all.
    pub fn checksum(&self, use_sha1: bool) -> Option<Checksum> {
        if use_sha1 {
            Some(Checksum::from(self.sha1.as_deref()))
        } else {
            self.text.as_deref().map(Checksum::of_text)
        }
    }
}

/// Read JSON-lines revision documents
///
/// Blank lines are skipped. Each malformed line is reported with its
/// 1-based line number.
pub fn read_revdocs<R: BufRead>(reader: R) -> impl Iterator<Item = Result<RevisionDoc>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(serde_json::from_str::<RevisionDoc>(&line).map_err(|source| RevertError::Json {
                line: index + 1,
                source,
            })),
            Err(err) => Some(Err(err.into())),
        })
}

/// Progress through a stream of revision documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress<'a> {
    /// A new page began
    PageStart { title: Option<&'a str> },
    /// A revision was processed; `reverting` is set when it produced a revert
    Revision { reverting: bool },
    /// The current page ended
    PageEnd,
}

/// Iterator over the reverts found in a stream of revision documents
///
/// Created by [`revdocs_to_reverts`]. Read errors are passed through.
pub struct RevdocReverts<I> {
    docs: I,
    config: DetectorConfig,
    page: Option<(u64, Detector<RevisionDoc>)>,
    progress: Option<Box<dyn for<'a> FnMut(Progress<'a>)>>,
}

impl<I> RevdocReverts<I> {
    /// Report page and revision progress to `progress`
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: FnMut(Progress<'_>) + 'static,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    fn emit(&mut self, event: Progress<'_>) {
        if let Some(progress) = self.progress.as_mut() {
            progress(event);
        }
    }

    fn detector_for(&mut self, page: &PageDoc) -> Result<&mut Detector<RevisionDoc>> {
        let detector = match self.page.take() {
            Some((current, detector)) if current == page.id => detector,
            previous => {
                let detector = Detector::from_config(&self.config)?;
                if previous.is_some() {
                    self.emit(Progress::PageEnd);
                }
                tracing::debug!(page_id = page.id, "starting page");
                self.emit(Progress::PageStart {
                    title: page.title.as_deref(),
                });
                detector
            }
        };

        let (_, detector) = self.page.insert((page.id, detector));
        Ok(detector)
    }
}

impl<I> Iterator for RevdocReverts<I>
where
    I: Iterator<Item = Result<RevisionDoc>>,
{
    type Item = Result<Revert<RevisionDoc>>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(doc) = self.docs.next() {
            let doc = match doc {
                Ok(doc) => doc,
                Err(err) => return Some(Err(err)),
            };

            let use_sha1 = self.config.use_sha1;
            let detector = match self.detector_for(&doc.page) {
                Ok(detector) => detector,
                Err(err) => return Some(Err(err)),
            };

            let Some(checksum) = doc.checksum(use_sha1) else {
                tracing::warn!(rev_id = doc.id, "Skipping revision: 'text' field not found");
                continue;
            };

            let revert = detector.process(checksum, doc);
            self.emit(Progress::Revision {
                reverting: revert.is_some(),
            });

            if let Some(revert) = revert {
                return Some(Ok(revert));
            }
        }

        if self.page.take().is_some() {
            self.emit(Progress::PageEnd);
        }
        None
    }
}

/// Convert page-partitioned revision documents into reverts
///
/// # Example
/// ```
/// use revertir::config::DetectorConfig;
/// use revertir::revdocs::{read_revdocs, revdocs_to_reverts};
///
/// let input = r#"
/// {"id": 1, "page": {"id": 7}, "text": "foo"}
/// {"id": 2, "page": {"id": 7}, "text": "vandalism"}
/// {"id": 3, "page": {"id": 7}, "text": "foo"}
/// "#;
///
/// let reverts: Vec<_> = revdocs_to_reverts(read_revdocs(input.as_bytes()), &DetectorConfig::default())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(reverts.len(), 1);
/// assert_eq!(reverts[0].reverting().id, 3);
/// ```
pub fn revdocs_to_reverts<I>(docs: I, config: &DetectorConfig) -> RevdocReverts<I::IntoIter>
where
    I: IntoIterator<Item = Result<RevisionDoc>>,
{
    RevdocReverts {
        docs: docs.into_iter(),
        config: config.clone(),
        page: None,
        progress: None,
    }
}
