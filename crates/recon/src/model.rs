use std::collections::HashMap;

use serde::Serialize;

pub const MERGED_VALID_FILE: &str = "merged_valid_records.csv";
pub const MISSED_FILE: &str = "missed_addresses_rerun.csv";
pub const RERUN_FILE: &str = "addresses_for_rerun.csv";

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// One data row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `column`, or `""` when the record has no such field.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Values laid out in `headers` order, empty string for absent fields.
    pub fn values_in(&self, headers: &[String]) -> Vec<String> {
        headers.iter().map(|h| self.get(h).to_string()).collect()
    }

    /// Copy of this record restricted to `headers`; absent fields become empty.
    pub fn project(&self, headers: &[String]) -> Record {
        let mut fields = HashMap::with_capacity(headers.len());
        for h in headers {
            fields.insert(h.clone(), self.get(h).to_string());
        }
        Record { fields }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Header list plus rows in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Raw text of one uploaded file. `name` is only used for diagnostics.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub name: String,
    pub text: String,
}

impl SourceText {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

/// Everything one reconciliation run consumes.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    /// Job output files, in upload order.
    pub outputs: Vec<SourceText>,
    /// The original input list.
    pub input: Option<SourceText>,
}

// ---------------------------------------------------------------------------
// Engine output
// ---------------------------------------------------------------------------

/// Column names the engine resolved, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumns {
    pub location: String,
    pub remarks: Option<String>,
    pub address: String,
    pub suite: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
}

/// Tables produced by one engine run. Counters are derived from these.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Merged rows whose remarks did not mark them failed.
    pub valid: Table,
    /// Merged rows removed as failed.
    pub failed: Table,
    /// The decoded input list.
    pub input: Table,
    /// Input rows whose address never appeared among valid locations.
    pub missed: Table,
    /// Input rows located from failed output rows (duplicates kept).
    pub failed_for_rerun: Vec<Record>,
    /// Missed rows plus failed back-mapped rows, de-duplicated.
    pub rerun: Table,
    pub columns: ResolvedColumns,
}

// ---------------------------------------------------------------------------
// Summary + Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_output: usize,
    pub failed_removed: usize,
    pub valid_records: usize,
    pub total_input: usize,
    pub missed_count: usize,
    pub failed_for_rerun: usize,
    pub total_rerun: usize,
}

impl ReconSummary {
    /// Input rows whose address was found among valid output locations.
    pub fn matched_count(&self) -> usize {
        self.total_input - self.missed_count
    }
}

/// An encoded CSV ready to hand to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub file_name: String,
    pub rows: usize,
    #[serde(skip)]
    pub contents: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub summary: ReconSummary,
    pub columns: ResolvedColumns,
    pub merged_valid: Artifact,
    pub missed: Artifact,
    /// Present only when at least one address needs a rerun.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerun: Option<Artifact>,
}

impl ReconReport {
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        [Some(&self.merged_valid), Some(&self.missed), self.rerun.as_ref()]
            .into_iter()
            .flatten()
    }
}
