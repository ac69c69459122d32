use serde::{Deserialize, Serialize};

use crate::error::ReconError;

pub const DEFAULT_FAILURE_MARKER: &str = "failed";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run options. Every key is optional; an empty document is the default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    /// How the merged header is chosen when output files disagree.
    #[serde(default)]
    pub header_policy: HeaderPolicy,
    /// Remarks containing this text (case-insensitive) mark a row failed.
    #[serde(default = "default_failure_marker")]
    pub failure_marker: String,
    /// Map failed rows back to input rows and add them to the rerun list.
    #[serde(default = "default_include_failed")]
    pub include_failed: bool,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            header_policy: HeaderPolicy::default(),
            failure_marker: default_failure_marker(),
            include_failed: default_include_failed(),
        }
    }
}

fn default_failure_marker() -> String {
    DEFAULT_FAILURE_MARKER.into()
}

fn default_include_failed() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Header policy
// ---------------------------------------------------------------------------

/// Which header the merged output table carries.
///
/// Rows are always matched to the merged header by column name: fields a
/// row lacks render empty, fields outside the merged header are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderPolicy {
    /// The first output file's header, verbatim.
    #[default]
    FirstFile,
    /// The first file's header followed by names first seen in later files.
    Union,
}

impl std::fmt::Display for HeaderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstFile => write!(f, "first_file"),
            Self::Union => write!(f, "union"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.failure_marker.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "failure_marker must not be blank".into(),
            ));
        }
        Ok(())
    }

    /// True when `remarks` marks its row as failed.
    pub fn is_failure(&self, remarks: &str) -> bool {
        remarks
            .to_lowercase()
            .contains(&self.failure_marker.to_lowercase())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
