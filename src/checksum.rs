//! Content checksums
//!
//! A [`Checksum`] identifies the content of a revision. Two revisions with
//! equal checksums are treated as content-identical. When the content of a
//! revision cannot be hashed (suppressed text, a missing `sha1` field) the
//! caller substitutes [`Checksum::Unknown`], which never compares equal to
//! anything, not even another `Unknown`. That keeps two unrelated revisions
//! with missing content from being paired up as a revert.

use sha2::{Digest, Sha256};
use std::fmt;

/// Content identity of a revision
///
/// Equality is not reflexive for [`Checksum::Unknown`], so this type
/// implements `PartialEq` only. Use [`Checksum::digest`] to get a hashable
/// key for known checksums.
///
/// # Example
/// ```
/// use revertir::Checksum;
///
/// assert_eq!(Checksum::from("aaa"), Checksum::from("aaa"));
/// assert_ne!(Checksum::from("aaa"), Checksum::from("bbb"));
/// assert_ne!(Checksum::unknown(), Checksum::unknown());
/// ```
#[derive(Debug, Clone)]
pub enum Checksum {
    /// Digest bytes of the revision content
    Known(Vec<u8>),
    /// Content could not be hashed
    Unknown,
}

impl Checksum {
    /// Wrap raw digest bytes
    pub fn known(bytes: impl Into<Vec<u8>>) -> Self {
        Checksum::Known(bytes.into())
    }

    /// Sentinel for revisions whose content is unavailable
    pub fn unknown() -> Self {
        Checksum::Unknown
    }

    /// SHA-256 of the UTF-8 revision text
    pub fn of_text(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        Checksum::Known(digest.to_vec())
    }

    /// Digest bytes, or `None` for [`Checksum::Unknown`]
    pub fn digest(&self) -> Option<&[u8]> {
        match self {
            Checksum::Known(bytes) => Some(bytes),
            Checksum::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Checksum::Unknown)
    }
}

impl PartialEq for Checksum {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Checksum::Known(a), Checksum::Known(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Checksum {
    fn from(value: &str) -> Self {
        Checksum::Known(value.as_bytes().to_vec())
    }
}

impl From<String> for Checksum {
    fn from(value: String) -> Self {
        Checksum::Known(value.into_bytes())
    }
}

impl<S: Into<Checksum>> From<Option<S>> for Checksum {
    fn from(value: Option<S>) -> Self {
        value.map_or(Checksum::Unknown, Into::into)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checksum::Known(bytes) => write!(f, "{}", hex::encode(bytes)),
            Checksum::Unknown => write!(f, "unknown"),
        }
    }
}
