//! `rerun run` / `rerun validate` / `rerun normalize`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use rerun_recon::model::{ReconInput, ReconReport, ReconSummary, ResolvedColumns, SourceText};
use rerun_recon::{normalize_address, reconcile, HeaderPolicy, ReconConfig, ReconError};

use crate::exit_codes::{recon_exit_code, EXIT_INVALID_CONFIG, EXIT_IO, EXIT_MISSED};
use crate::files::read_file_as_utf8;
use crate::CliError;

/// Options for `rerun run`, collected from clap.
pub struct RunArgs {
    pub outputs: Vec<PathBuf>,
    pub input: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub summary: Option<PathBuf>,
    pub fail_on_missed: bool,
    pub quiet: bool,
}

// ---------------------------------------------------------------------------
// JSON report envelope
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct RunReport<'a> {
    meta: RunMeta,
    summary: &'a ReconSummary,
    columns: &'a ResolvedColumns,
    artifacts: Vec<WrittenArtifact>,
}

#[derive(Serialize)]
struct RunMeta {
    engine_version: String,
    run_at: String,
    output_files: Vec<String>,
    input_file: String,
    header_policy: HeaderPolicy,
}

#[derive(Serialize)]
struct WrittenArtifact {
    file_name: String,
    path: String,
    rows: usize,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ReconConfig::default(),
    };

    // Read everything up front; any failure aborts before artifacts are written.
    let outputs = args
        .outputs
        .iter()
        .map(|path| read_source(path))
        .collect::<Result<Vec<_>, _>>()?;
    let input = args.input.as_deref().map(read_source).transpose()?;

    let recon_input = ReconInput { outputs, input };
    let report = reconcile(&config, &recon_input).map_err(recon_err)?;

    std::fs::create_dir_all(&args.out_dir).map_err(|e| {
        CliError::io(format!("cannot create {}: {e}", args.out_dir.display()))
    })?;

    let mut written = Vec::new();
    for artifact in report.artifacts() {
        let path = args.out_dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.contents)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
        written.push(WrittenArtifact {
            file_name: artifact.file_name.clone(),
            path: path.display().to_string(),
            rows: artifact.rows,
        });
    }

    if args.json || args.summary.is_some() {
        let envelope = RunReport {
            meta: RunMeta {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
                output_files: args.outputs.iter().map(|p| p.display().to_string()).collect(),
                input_file: args.input.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
                header_policy: config.header_policy,
            },
            summary: &report.summary,
            columns: &report.columns,
            artifacts: written,
        };
        let json_str = serde_json::to_string_pretty(&envelope)
            .map_err(|e| CliError::format(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = args.summary {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
        }
        if args.json {
            println!("{json_str}");
        }
    }

    if !args.quiet {
        print_summary(&report, &args.out_dir);
    }

    if args.fail_on_missed && report.summary.missed_count > 0 {
        return Err(CliError {
            code: EXIT_MISSED,
            message: format!("{} address(es) missed", report.summary.missed_count),
            hint: None,
        });
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    eprintln!(
        "config ok: header_policy={} failure_marker={:?} include_failed={}",
        config.header_policy, config.failure_marker, config.include_failed
    );
    Ok(())
}

pub fn cmd_normalize(addresses: Vec<String>) -> Result<(), CliError> {
    for address in &addresses {
        println!("{}", normalize_address(address));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: &Path) -> Result<ReconConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_IO,
        message: format!("cannot read config {}: {e}", path.display()),
        hint: None,
    })?;
    ReconConfig::from_toml(&text).map_err(|e| CliError {
        code: EXIT_INVALID_CONFIG,
        message: format!("{}: {e}", path.display()),
        hint: None,
    })
}

fn read_source(path: &Path) -> Result<SourceText, CliError> {
    let text = read_file_as_utf8(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
    Ok(SourceText::new(path.display().to_string(), text))
}

fn recon_err(err: ReconError) -> CliError {
    let hint = match &err {
        ReconError::MissingOutputFiles => Some("pass one or more job output files with --output"),
        ReconError::MissingInputFile => Some("pass the original input list with --input"),
        ReconError::UnresolvableLocationColumn { .. } => {
            Some("the first output file's header needs a column whose name contains 'location'")
        }
        ReconError::UnresolvableAddressSchema { .. } => {
            Some("input columns are matched by name: one containing 'address', 'city' and 'state'")
        }
        _ => None,
    };
    CliError {
        code: recon_exit_code(&err),
        message: err.to_string(),
        hint: hint.map(str::to_string),
    }
}

fn print_summary(report: &ReconReport, out_dir: &Path) {
    let s = &report.summary;
    eprintln!(
        "output: {} records — {} failed removed, {} valid",
        s.total_output, s.failed_removed, s.valid_records,
    );
    eprintln!(
        "input:  {} addresses — {} matched, {} missed",
        s.total_input,
        s.matched_count(),
        s.missed_count,
    );
    if s.total_rerun > 0 {
        eprintln!(
            "rerun:  {} addresses (from {} missed + {} failed, duplicates removed)",
            s.total_rerun, s.missed_count, s.failed_for_rerun,
        );
    } else {
        eprintln!("no addresses need rerun");
    }
    for artifact in report.artifacts() {
        eprintln!("wrote {}", out_dir.join(&artifact.file_name).display());
    }
}
