use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use crate::columns::{InputColumns, OutputColumns};
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::merge::merge_tables;
use crate::model::{Reconciliation, ReconInput, Record, ResolvedColumns, Table};
use crate::normalize::{full_address, normalize_address};
use crate::table::decode;

/// Run reconciliation. Returns the valid, failed, missed and rerun tables.
///
/// Fails without partial output when no output files or no input file are
/// supplied, or when the location / address columns cannot be resolved.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<Reconciliation, ReconError> {
    if input.outputs.is_empty() {
        return Err(ReconError::MissingOutputFiles);
    }
    let input_source = input.input.as_ref().ok_or(ReconError::MissingInputFile)?;

    // Merge every output run
    let tables: Vec<Table> = input
        .outputs
        .iter()
        .map(|source| {
            let table = decode(&source.text);
            debug!("decoded output {}: {} column(s), {} row(s)", source.name, table.headers.len(), table.len());
            table
        })
        .collect();
    let merged = merge_tables(&tables, config.header_policy);

    let output_cols = OutputColumns::resolve(&merged.headers)?;
    if output_cols.remarks.is_none() {
        warn!("no remarks column in output files; no row will be treated as failed");
    }

    let (valid, failed) = split_failures(merged, output_cols.remarks.as_deref(), config);

    // Original input list
    let input_table = decode(&input_source.text);
    debug!(
        "decoded input {}: {} column(s), {} row(s)",
        input_source.name,
        input_table.headers.len(),
        input_table.len()
    );
    let input_cols = InputColumns::resolve(&input_table.headers)?;

    let input_keys: Vec<String> = input_table
        .rows
        .iter()
        .map(|row| normalize_address(&full_address(row, &input_cols)))
        .collect();

    let processed = processed_addresses(&valid, &output_cols.location);

    let mut missed = Table::new(input_table.headers.clone());
    for (row, key) in input_table.rows.iter().zip(&input_keys) {
        if !processed.contains(key) {
            missed.rows.push(row.clone());
        }
    }

    let failed_for_rerun = if config.include_failed {
        locate_failed_inputs(&failed, &output_cols.location, &input_table, &input_keys)
    } else {
        Vec::new()
    };

    let rerun = build_rerun(&input_table.headers, &missed.rows, &failed_for_rerun);

    info!(
        "{} output file(s): {} valid, {} failed; {} of {} input address(es) missed; {} queued for rerun",
        input.outputs.len(),
        valid.len(),
        failed.len(),
        missed.len(),
        input_table.len(),
        rerun.len(),
    );

    let columns = ResolvedColumns {
        location: output_cols.location,
        remarks: output_cols.remarks,
        address: input_cols.address,
        suite: input_cols.suite,
        city: input_cols.city,
        state: input_cols.state,
        zip: input_cols.zip,
    };

    Ok(Reconciliation {
        valid,
        failed,
        input: input_table,
        missed,
        failed_for_rerun,
        rerun,
        columns,
    })
}

/// Partition merged rows into (valid, failed). Without a remarks column
/// every row is valid.
fn split_failures(merged: Table, remarks: Option<&str>, config: &ReconConfig) -> (Table, Table) {
    let mut valid = Table::new(merged.headers.clone());
    let mut failed = Table::new(merged.headers);

    for row in merged.rows {
        match remarks {
            Some(col) if config.is_failure(row.get(col)) => failed.rows.push(row),
            _ => valid.rows.push(row),
        }
    }

    (valid, failed)
}

/// Normalized, non-empty locations of valid rows.
fn processed_addresses(valid: &Table, location: &str) -> HashSet<String> {
    valid
        .rows
        .iter()
        .map(|row| row.get(location))
        .filter(|loc| !loc.is_empty())
        .map(normalize_address)
        .collect()
}

/// For each failed row, the first input row whose full address matches its
/// location. Repeated failures of the same address yield repeated rows.
fn locate_failed_inputs(
    failed: &Table,
    location: &str,
    input: &Table,
    input_keys: &[String],
) -> Vec<Record> {
    let mut first_by_key: HashMap<&str, usize> = HashMap::new();
    for (idx, key) in input_keys.iter().enumerate() {
        first_by_key.entry(key.as_str()).or_insert(idx);
    }

    failed
        .rows
        .iter()
        .map(|row| row.get(location))
        .filter(|loc| !loc.is_empty())
        .filter_map(|loc| first_by_key.get(normalize_address(loc).as_str()).copied())
        .map(|idx| input.rows[idx].clone())
        .collect()
}

/// Missed rows followed by failed back-mapped rows, keeping the first of
/// any rows whose values are identical.
fn build_rerun(headers: &[String], missed: &[Record], failed: &[Record]) -> Table {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut rerun = Table::new(headers.to_vec());

    for row in missed.iter().chain(failed) {
        if seen.insert(row.values_in(headers)) {
            rerun.rows.push(row.clone());
        }
    }

    rerun
}
