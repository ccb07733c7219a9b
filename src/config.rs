//! Detector configuration
//!
//! Settings can come from a `revertir.toml` file; command-line flags take
//! precedence over file values.
//!
//! # Example revertir.toml
//!
//! ```toml
//! # Maximum number of revisions a revert can span
//! radius = 15
//!
//! # Compare upstream sha1 fields instead of hashing revision text
//! use_sha1 = false
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default maximum revert distance
pub const DEFAULT_RADIUS: usize = 15;

/// Configuration shared by the detector and the document processor
///
/// # Example
/// ```
/// use revertir::config::DetectorConfig;
///
/// let config = DetectorConfig::default();
/// assert_eq!(config.radius, 15);
/// assert!(!config.use_sha1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum number of revisions separating a reverting revision from the
    /// revision it restores
    pub radius: usize,

    /// Use the `sha1` field of revision documents even when text is present
    pub use_sha1: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            use_sha1: false,
        }
    }
}

impl DetectorConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields with values supplied on the command line
    pub fn with_overrides(mut self, radius: Option<usize>, use_sha1: bool) -> Self {
        if let Some(radius) = radius {
            self.radius = radius;
        }
        self.use_sha1 |= use_sha1;
        self
    }

    /// Reject settings the detector cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.radius < 1 {
            anyhow::bail!(
                "Invalid radius: {} (must be a positive integer)",
                self.radius
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config = DetectorConfig::from_toml_str("radius = 3\nuse_sha1 = true\n").unwrap();
        assert_eq!(
            config,
            DetectorConfig {
                radius: 3,
                use_sha1: true
            }
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = DetectorConfig::from_toml_str("use_sha1 = true").unwrap();
        assert_eq!(config.radius, DEFAULT_RADIUS);
        assert!(config.use_sha1);

        let empty = DetectorConfig::from_toml_str("").unwrap();
        assert_eq!(empty, DetectorConfig::default());
    }

    #[test]
    fn test_zero_radius_rejected() {
        let err = DetectorConfig::from_toml_str("radius = 0").unwrap_err();
        assert!(err.to_string().contains("Invalid radius"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = DetectorConfig::from_toml_str("radius = \"many\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = DetectorConfig::default().with_overrides(Some(4), true);
        assert_eq!(config.radius, 4);
        assert!(config.use_sha1);

        let unchanged = DetectorConfig::default().with_overrides(None, false);
        assert_eq!(unchanged, DetectorConfig::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "radius = 7").unwrap();

        let config = DetectorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.radius, 7);
    }

    #[test]
    fn test_from_missing_file() {
        let err = DetectorConfig::from_file("/nonexistent/revertir.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
