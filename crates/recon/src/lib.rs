//! `rerun-recon` reconciles address-job output runs against the original input list.
//!
//! Pure engine crate: receives raw CSV text, returns tables, counters and
//! encoded artifacts. No CLI or filesystem dependencies.

pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod report;
pub mod table;

pub use config::{HeaderPolicy, ReconConfig};
pub use engine::run;
pub use error::ReconError;
pub use model::{Artifact, ReconInput, ReconReport, ReconSummary, Reconciliation, Record, SourceText, Table};
pub use normalize::normalize_address;
pub use report::reconcile;
