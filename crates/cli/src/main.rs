// rerun CLI - reconcile address-job output runs against the original input list

mod exit_codes;
mod files;
mod logging;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_IO, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "rerun")]
#[command(about = "Find input addresses that never made it through an address-processing job")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Log engine progress to stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge output runs, drop failures, and list input addresses to rerun
    #[command(after_help = "\
Examples:
  rerun run -o run1.csv -o run2.csv -i input.csv
  rerun run -o run1.csv -i input.csv --out-dir results --json
  rerun run -o run*.csv -i input.csv --config rerun.toml --fail-on-missed")]
    Run {
        /// Job output file (repeat for each run, in upload order)
        #[arg(long = "output", short = 'o', value_name = "FILE", num_args = 1..)]
        outputs: Vec<PathBuf>,

        /// Original input list the job was run against
        #[arg(long, short = 'i', value_name = "FILE")]
        input: Option<PathBuf>,

        /// Directory the CSV artifacts are written to
        #[arg(long, short = 'd', default_value = ".")]
        out_dir: PathBuf,

        /// TOML config (header_policy, failure_marker, include_failed)
        #[arg(long, short = 'c', env = "RERUN_CONFIG")]
        config: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long, value_name = "FILE")]
        summary: Option<PathBuf>,

        /// Exit with code 7 when any input address was missed
        #[arg(long)]
        fail_on_missed: bool,

        /// Suppress the human summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  rerun validate rerun.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },

    /// Print the comparison key used to match an address
    #[command(after_help = "\
Examples:
  rerun normalize '123 N. Main St., #4'
  rerun normalize '12 Elm St - Rear' '12 ELM ST REAR'")]
    Normalize {
        /// Addresses to normalize
        #[arg(required = true)]
        addresses: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show usage
            eprintln!("Usage: rerun <command> [options]");
            eprintln!("       rerun --help for more information");
            Ok(())
        }
        Some(Commands::Run {
            outputs,
            input,
            out_dir,
            config,
            json,
            summary,
            fail_on_missed,
            quiet,
        }) => recon::cmd_run(recon::RunArgs {
            outputs,
            input,
            out_dir,
            config,
            json,
            summary,
            fail_on_missed,
            quiet,
        }),
        Some(Commands::Validate { config }) => recon::cmd_validate(config),
        Some(Commands::Normalize { addresses }) => recon::cmd_normalize(addresses),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }
}
