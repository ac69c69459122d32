//! CLI Exit Code Registry
//!
//! Single source of truth for `rerun` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Success                                        |
//! | 1    | General error (unspecified)                    |
//! | 2    | Usage error (bad args)                         |
//! | 3    | File read/write failure                        |
//! | 4    | Invalid config                                 |
//! | 5    | Missing output or input files                  |
//! | 6    | Column schema could not be resolved            |
//! | 7    | Missed addresses found (`--fail-on-missed`)    |

use rerun_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Cannot read an input file or write an artifact.
pub const EXIT_IO: u8 = 3;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// No output files, or no input file, were supplied.
pub const EXIT_MISSING_FILES: u8 = 5;

/// Location column (output) or address/city/state columns (input) not found.
pub const EXIT_SCHEMA: u8 = 6;

/// Run succeeded but some input addresses need a rerun.
pub const EXIT_MISSED: u8 = 7;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::MissingOutputFiles | ReconError::MissingInputFile => EXIT_MISSING_FILES,
        ReconError::UnresolvableLocationColumn { .. }
        | ReconError::UnresolvableAddressSchema { .. } => EXIT_SCHEMA,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
    }
}
