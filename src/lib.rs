//! Revertir - streaming identity revert detection
//!
//! This library detects edits that restore the exact content of an earlier
//! revision of the same document, undoing the edits in between. Detection
//! is a single pass over `(checksum, revision)` pairs with a bounded window,
//! so memory stays proportional to the lookback `radius` regardless of how
//! long the history is.
//!
//! ```
//! use revertir::{detect, Checksum};
//!
//! let history = vec![
//!     (Checksum::from("aaa"), "rev 1"),
//!     (Checksum::from("bbb"), "rev 2"),
//!     (Checksum::from("aaa"), "rev 3"),
//! ];
//!
//! let reverts: Vec<_> = detect(history, 15).unwrap().collect();
//! assert_eq!(reverts[0], ("rev 3", vec!["rev 2"], "rev 1"));
//! ```

pub mod check;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod revdocs;
pub mod revert;
pub mod stream;
pub mod window;

pub use checksum::Checksum;
pub use detector::Detector;
pub use error::RevertError;
pub use revert::Revert;
pub use stream::{detect, Detect, DetectExt};
pub use window::HistoryWindow;
