use crate::config::ReconConfig;
use crate::engine;
use crate::error::ReconError;
use crate::model::{
    Artifact, ReconInput, ReconReport, ReconSummary, Reconciliation, Table, MERGED_VALID_FILE,
    MISSED_FILE, RERUN_FILE,
};
use crate::table::encode_table;

/// Compute summary counters from the engine's tables.
pub fn compute_summary(recon: &Reconciliation) -> ReconSummary {
    ReconSummary {
        total_output: recon.valid.len() + recon.failed.len(),
        failed_removed: recon.failed.len(),
        valid_records: recon.valid.len(),
        total_input: recon.input.len(),
        missed_count: recon.missed.len(),
        failed_for_rerun: recon.failed_for_rerun.len(),
        total_rerun: recon.rerun.len(),
    }
}

/// Package counters and encoded artifacts. The rerun artifact is only
/// produced when something needs a rerun.
pub fn build_report(recon: &Reconciliation) -> ReconReport {
    let summary = compute_summary(recon);

    ReconReport {
        summary,
        columns: recon.columns.clone(),
        merged_valid: artifact(MERGED_VALID_FILE, &recon.valid),
        missed: artifact(MISSED_FILE, &recon.missed),
        rerun: (summary.total_rerun > 0).then(|| artifact(RERUN_FILE, &recon.rerun)),
    }
}

/// Run the engine and build the report in one step.
pub fn reconcile(config: &ReconConfig, input: &ReconInput) -> Result<ReconReport, ReconError> {
    let recon = engine::run(config, input)?;
    Ok(build_report(&recon))
}

fn artifact(file_name: &str, table: &Table) -> Artifact {
    Artifact {
        file_name: file_name.to_string(),
        rows: table.len(),
        contents: encode_table(table),
    }
}
